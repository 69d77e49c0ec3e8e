//! Cross-source aggregation by canonical identity.

use chemlink_chem::CanonicalIdentity;
use chemlink_core::{ChemlinkError, Result};
use indexmap::IndexMap;
use tracing::debug;

use crate::normalize::LabeledSource;
use crate::record::{AggregatedCompound, LABEL_DELIMITER};

/// Group every source's rows by identity.
///
/// Sources are folded in the order given, so each compound lists its
/// contributing labels in that order. Output follows the order in which
/// identities are first seen. A contribution without a display name adds
/// neither its name nor its label. Records without an identity form one
/// group of their own.
///
/// Labels containing the `", "` delimiter would make joined label strings
/// ambiguous and are rejected.
pub fn aggregate(sources: &[LabeledSource]) -> Result<Vec<AggregatedCompound>> {
    if let Some(bad) = sources.iter().find(|s| s.label.contains(LABEL_DELIMITER)) {
        return Err(ChemlinkError::InvalidInput(format!(
            "source label '{}' contains the label delimiter '{LABEL_DELIMITER}'",
            bad.label
        )));
    }

    let mut groups: IndexMap<Option<CanonicalIdentity>, AggregatedCompound> = IndexMap::new();
    for contribution in sources.iter().flat_map(LabeledSource::contributions) {
        let compound = groups
            .entry(contribution.identity.clone())
            .or_insert_with(|| AggregatedCompound::new(contribution.identity));
        if let Some(name) = &contribution.name {
            compound.push(&contribution.label, name);
        }
    }

    debug!(sources = sources.len(), compounds = groups.len(), "aggregated sources");
    Ok(groups.into_values().collect())
}
