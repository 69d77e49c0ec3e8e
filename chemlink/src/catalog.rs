//! Matching a virtual compound catalog against aggregated identities.

use std::collections::HashSet;

use chemlink_chem::ChemToolkit;
use chemlink_core::Result;
use chemlink_io::Table;
use tracing::{debug, info};

use crate::config::CatalogSpec;
use crate::record::{AggregatedCompound, CandidateRecord};

/// Catalog entries matching an aggregated identity, in catalog order, as
/// ranking candidates.
///
/// A row matches when its identity column equals a known identity. With
/// `match_structures` set, a row also matches when its SMILES canonicalizes
/// to one, which covers catalogs whose identities came from another InChI
/// implementation.
pub fn merge_with_aggregates(
    catalog: &Table,
    aggregated: &[AggregatedCompound],
    spec: &CatalogSpec,
    toolkit: &ChemToolkit,
) -> Result<Vec<CandidateRecord>> {
    let inchi_idx = catalog.column_index(&spec.inchi_column)?;
    let smiles_idx = catalog.column_index(&spec.smiles_column)?;
    let name_idx = catalog.column_index(&spec.name_column)?;

    let known: HashSet<&str> = aggregated
        .iter()
        .filter_map(|c| c.identity.as_ref().map(|id| id.as_str()))
        .collect();

    let mut by_structure = 0usize;
    let candidates: Vec<CandidateRecord> = catalog
        .rows()
        .iter()
        .filter(|row| {
            if row[inchi_idx].as_deref().is_some_and(|id| known.contains(id)) {
                return true;
            }
            if !spec.match_structures {
                return false;
            }
            let matched = toolkit
                .to_canonical_identity(row[smiles_idx].as_deref())
                .is_some_and(|id| known.contains(id.as_str()));
            if matched {
                debug!(smiles = row[smiles_idx].as_deref(), "catalog row matched by structure");
                by_structure += 1;
            }
            matched
        })
        .map(|row| CandidateRecord { name: row[name_idx].clone(), smiles: row[smiles_idx].clone() })
        .collect();

    info!(
        catalog = catalog.len(),
        matched = candidates.len(),
        by_structure,
        "merged catalog with aggregated compounds"
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemlink_chem::{CanonicalIdentity, ToolkitConfig};

    fn toolkit() -> ChemToolkit {
        ChemToolkit::new(ToolkitConfig::default()).unwrap()
    }

    #[test]
    fn keeps_only_known_identities() {
        let spec = CatalogSpec { match_structures: false, ..CatalogSpec::default() };
        let catalog = Table::from_rows(
            "cv",
            vec![spec.inchi_column.clone(), spec.smiles_column.clone(), spec.name_column.clone()],
            vec![
                vec![Some("InChI=1S/CH4/h1H4".into()), Some("C".into()), Some("methane".into())],
                vec![Some("InChI=1S/H2O/h1H2".into()), Some("O".into()), Some("water".into())],
                vec![None, Some("CC".into()), Some("ethane".into())],
            ],
        )
        .unwrap();

        let mut known = AggregatedCompound::new(Some(CanonicalIdentity::from_raw("InChI=1S/H2O/h1H2")));
        known.push("A", "water");
        let unresolved = AggregatedCompound::new(None);

        let candidates = merge_with_aggregates(&catalog, &[known, unresolved], &spec, &toolkit()).unwrap();
        assert_eq!(candidates, vec![CandidateRecord { name: Some("water".into()), smiles: Some("O".into()) }]);
    }

    #[test]
    fn standard_inchi_rows_match_by_structure() {
        let tk = toolkit();
        let spec = CatalogSpec::default();
        let catalog = Table::from_rows(
            "cv",
            vec![spec.inchi_column.clone(), spec.smiles_column.clone(), spec.name_column.clone()],
            vec![
                vec![
                    Some("InChI=1S/C2H6O/c1-2-3/h3H,2H2,1H3".into()),
                    Some("OCC".into()),
                    Some("ethanol".into()),
                ],
                vec![
                    Some("InChI=1S/C3H8O/c1-2-3-4/h4H,2-3H2,1H3".into()),
                    Some("CCCO".into()),
                    Some("propanol".into()),
                ],
                vec![Some("InChI=1S/CH4/h1H4".into()), Some("C(".into()), Some("broken".into())],
            ],
        )
        .unwrap();

        let mut ethanol = AggregatedCompound::new(tk.to_canonical_identity(Some("CCO")));
        ethanol.push("A", "ethanol");

        let candidates = merge_with_aggregates(&catalog, &[ethanol.clone()], &spec, &tk).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name.as_deref(), Some("ethanol"));

        let literal = CatalogSpec { match_structures: false, ..CatalogSpec::default() };
        assert!(merge_with_aggregates(&catalog, &[ethanol], &literal, &tk).unwrap().is_empty());
    }

    #[test]
    fn missing_catalog_column() {
        let catalog = Table::new("cv", vec!["InChI".into()]);
        assert!(merge_with_aggregates(&catalog, &[], &CatalogSpec::default(), &toolkit()).is_err());
    }
}
