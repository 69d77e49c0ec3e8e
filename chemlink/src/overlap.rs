//! Selection of compounds shared by a configured combination of sources.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::{AggregatedCompound, LABEL_DELIMITER};

/// How a compound's labels are compared with a wanted combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMode {
    /// The joined label string equals a wanted string exactly, order included.
    #[default]
    Literal,
    /// The compound carries every label of a wanted combination, possibly
    /// among others, in any order.
    ContainsAll,
}

/// Compounds whose joined label string is exactly one of `wanted`.
///
/// `"A, B"` and `"B, A"` are different combinations. Compounds without an
/// identity are never selected.
pub fn select_overlap(aggregated: &[AggregatedCompound], wanted: &BTreeSet<String>) -> Vec<AggregatedCompound> {
    select_overlap_with(aggregated, wanted, OverlapMode::Literal)
}

pub fn select_overlap_with(
    aggregated: &[AggregatedCompound],
    wanted: &BTreeSet<String>,
    mode: OverlapMode,
) -> Vec<AggregatedCompound> {
    let combinations: Vec<BTreeSet<&str>> = match mode {
        OverlapMode::Literal => Vec::new(),
        OverlapMode::ContainsAll => wanted.iter().map(|w| w.split(LABEL_DELIMITER).collect()).collect(),
    };

    aggregated
        .iter()
        .filter(|c| c.identity.is_some())
        .filter(|c| match mode {
            OverlapMode::Literal => wanted.contains(&c.source_labels()),
            OverlapMode::ContainsAll => {
                let labels: BTreeSet<&str> = c.labels().iter().map(String::as_str).collect();
                combinations.iter().any(|combo| combo.is_subset(&labels))
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemlink_chem::CanonicalIdentity;

    fn compound(identity: Option<&str>, labels: &[&str]) -> AggregatedCompound {
        let mut c = AggregatedCompound::new(identity.map(CanonicalIdentity::from_raw));
        for label in labels {
            c.push(label, "name");
        }
        c
    }

    fn wanted(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn literal_match_is_order_sensitive() {
        let pool = [compound(Some("InChI=1S/X"), &["A", "B"])];
        assert_eq!(select_overlap(&pool, &wanted(&["A, B"])).len(), 1);
        assert!(select_overlap(&pool, &wanted(&["B, A"])).is_empty());
    }

    #[test]
    fn literal_match_rejects_supersets() {
        let pool = [compound(Some("InChI=1S/X"), &["A", "B", "C"])];
        assert!(select_overlap(&pool, &wanted(&["A, B"])).is_empty());
        let hits = select_overlap_with(&pool, &wanted(&["B, A"]), OverlapMode::ContainsAll);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn absent_identity_never_selected() {
        let pool = [compound(None, &["A", "B"]), compound(Some("InChI=1S/Y"), &["A", "B"])];
        for mode in [OverlapMode::Literal, OverlapMode::ContainsAll] {
            let hits = select_overlap_with(&pool, &wanted(&["A, B"]), mode);
            assert_eq!(hits.len(), 1);
            assert!(hits[0].identity.is_some());
        }
    }

    #[test]
    fn any_wanted_combination_selects() {
        let pool = [
            compound(Some("InChI=1S/X"), &["Drug Central", "Chemical Probes"]),
            compound(Some("InChI=1S/Y"), &["SGC", "Chemical Probes"]),
            compound(Some("InChI=1S/Z"), &["SGC"]),
        ];
        let hits = select_overlap(&pool, &wanted(&["Drug Central, Chemical Probes", "SGC, Chemical Probes"]));
        assert_eq!(hits.len(), 2);
        assert!(select_overlap(&pool, &BTreeSet::new()).is_empty());
    }
}
