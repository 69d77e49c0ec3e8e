//! Structural similarity ranking against a candidate pool.

use chemlink_chem::{ChemToolkit, Fingerprint};
use chemlink_core::{Annotated, Result, Scored};
use tracing::debug;

use crate::record::{CandidateRecord, SimilarityMatch};

/// Number of matches returned when the caller does not say.
pub const DEFAULT_TOP_N: usize = 5;

/// Rank `candidates` by Tanimoto similarity to `query`, best first.
///
/// The query must parse; candidates without a structure or whose structure
/// does not parse are skipped. Equal scores keep candidate order. At most
/// `top_n` matches are returned.
pub fn rank_similar(
    toolkit: &ChemToolkit,
    query: &str,
    candidates: &[CandidateRecord],
    top_n: usize,
) -> Result<Vec<SimilarityMatch>> {
    let query_fp = toolkit.fingerprint_notation(query)?;

    let scored = score_candidates(toolkit, &query_fp, candidates)?;
    let parseable = scored.len();
    let mut matches: Vec<SimilarityMatch> = scored
        .into_iter()
        .map(|(idx, similarity)| {
            let candidate = &candidates[idx];
            SimilarityMatch {
                name: candidate.name.clone(),
                smiles: candidate.smiles.clone().unwrap_or_default(),
                similarity,
            }
        })
        .collect();

    // Stable, so ties keep input order.
    matches.sort_by(|a, b| b.score().total_cmp(&a.score()));
    matches.truncate(top_n);

    debug!(
        query,
        candidates = candidates.len(),
        parseable,
        returned = matches.len(),
        best = matches.first().map(|m| m.name()),
        "ranked candidates"
    );
    Ok(matches)
}

/// Fingerprint one candidate; `None` when it has no usable structure.
fn candidate_fingerprint(toolkit: &ChemToolkit, candidate: &CandidateRecord) -> Option<Fingerprint> {
    let smiles = candidate.smiles.as_deref()?;
    match toolkit.fingerprint_notation(smiles) {
        Ok(fp) => Some(fp),
        Err(e) => {
            debug!(smiles, error = %e, "candidate skipped");
            None
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn score_candidates(
    toolkit: &ChemToolkit,
    query: &Fingerprint,
    candidates: &[CandidateRecord],
) -> Result<Vec<(usize, f64)>> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| candidate_fingerprint(toolkit, c).map(|fp| (idx, fp)))
        .map(|(idx, fp)| Ok((idx, toolkit.similarity(query, &fp)?)))
        .collect()
}

#[cfg(feature = "parallel")]
fn score_candidates(
    toolkit: &ChemToolkit,
    query: &Fingerprint,
    candidates: &[CandidateRecord],
) -> Result<Vec<(usize, f64)>> {
    use rayon::prelude::*;

    // Indexed collect keeps candidate order.
    let fingerprints: Vec<Option<Fingerprint>> =
        candidates.par_iter().map(|c| candidate_fingerprint(toolkit, c)).collect();
    fingerprints
        .into_iter()
        .enumerate()
        .filter_map(|(idx, fp)| fp.map(|fp| (idx, fp)))
        .map(|(idx, fp)| Ok((idx, toolkit.similarity(query, &fp)?)))
        .collect()
}
