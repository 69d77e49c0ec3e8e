//! Conversion of stage results into output tables.

use chemlink_chem::ChemToolkit;
use chemlink_core::Result;
use chemlink_io::Table;

use crate::record::{AggregatedCompound, SimilarityMatch};

pub const IDENTITY_COLUMN: &str = "InChI";
pub const HASH_COLUMN: &str = "InChIKey";

/// `InChI`, `Compound`, `Source`: one row per aggregated compound.
pub fn aggregated_table(compounds: &[AggregatedCompound]) -> Result<Table> {
    let rows = compounds
        .iter()
        .map(|c| {
            vec![
                c.identity.as_ref().map(|id| id.to_string()),
                Some(c.joined_names()),
                Some(c.source_labels()),
            ]
        })
        .collect();
    Table::from_rows("aggregated", columns(&[IDENTITY_COLUMN, "Compound", "Source"]), rows)
}

/// `InChI` and, when a toolkit is given, `InChIKey`.
pub fn identity_table(name: &str, compounds: &[AggregatedCompound], toolkit: Option<&ChemToolkit>) -> Result<Table> {
    let identities = Table::from_rows(
        name,
        columns(&[IDENTITY_COLUMN]),
        compounds.iter().map(|c| vec![c.identity.as_ref().map(|id| id.to_string())]).collect(),
    )?;
    match toolkit {
        Some(toolkit) => {
            let mut table = identities;
            table.add_column(HASH_COLUMN, hashes(compounds, toolkit, false))?;
            Ok(table)
        }
        None => Ok(identities),
    }
}

/// A single `InChIKey` column, optionally with the display prefix
/// (`InChIKey=` for standard identities, `ChemLinkKey=` for native ones).
pub fn hash_table(name: &str, compounds: &[AggregatedCompound], toolkit: &ChemToolkit, prefixed: bool) -> Result<Table> {
    Table::from_rows(
        name,
        columns(&[HASH_COLUMN]),
        hashes(compounds, toolkit, prefixed).into_iter().map(|h| vec![h]).collect(),
    )
}

fn hashes(compounds: &[AggregatedCompound], toolkit: &ChemToolkit, prefixed: bool) -> Vec<Option<String>> {
    compounds
        .iter()
        .map(|c| {
            let hash = toolkit.to_identity_hash(c.identity.as_ref()?)?;
            Some(if prefixed { hash.prefixed() } else { hash.to_string() })
        })
        .collect()
}

/// `Name`, `SMILES`, `Similarity`.
pub fn ranking_table(matches: &[SimilarityMatch]) -> Result<Table> {
    let rows = matches
        .iter()
        .map(|m| vec![m.name.clone(), Some(m.smiles.clone()), Some(m.similarity.to_string())])
        .collect();
    Table::from_rows("ranking", columns(&["Name", "SMILES", "Similarity"]), rows)
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
