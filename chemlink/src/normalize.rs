//! Per-source normalization: one (identity, name) row per distinct identity.

use std::collections::HashSet;

use chemlink_chem::{CanonicalIdentity, ChemToolkit};
use chemlink_core::Result;
use chemlink_io::Table;
use tracing::debug;

use crate::config::SourceSpec;
use crate::record::{CompoundRecord, SourceContribution};

/// One normalized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub identity: Option<CanonicalIdentity>,
    pub name: Option<String>,
}

/// A normalized source: its label plus deduplicated rows in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSource {
    pub label: String,
    pub rows: Vec<NormalizedRow>,
}

impl LabeledSource {
    /// Long-form view: every row tagged with this source's label.
    pub fn contributions(&self) -> impl Iterator<Item = SourceContribution> + '_ {
        self.rows.iter().map(|row| SourceContribution {
            identity: row.identity.clone(),
            label: self.label.clone(),
            name: row.name.clone(),
        })
    }

    /// Rows whose structure could not be canonicalized.
    pub fn unresolved_count(&self) -> usize {
        self.rows.iter().filter(|r| r.identity.is_none()).count()
    }
}

/// Pull raw records out of a source table using the columns `spec` names.
///
/// Fails with `MissingColumn` when the structure, name or ID column is
/// absent.
pub fn records_from_table(table: &Table, spec: &SourceSpec) -> Result<Vec<CompoundRecord>> {
    let smiles_idx = table.column_index(&spec.smiles_column)?;
    let name_idx = table.column_index(&spec.name_column)?;
    let id_idx = spec.id_column.as_deref().map(|c| table.column_index(c)).transpose()?;

    let records = table
        .rows()
        .iter()
        .map(|row| CompoundRecord {
            id: id_idx.and_then(|i| row[i].clone()),
            smiles: row[smiles_idx].clone(),
            name: row[name_idx].clone(),
            metadata: table
                .columns()
                .iter()
                .zip(row)
                .enumerate()
                .filter(|&(i, _)| i != smiles_idx && i != name_idx && Some(i) != id_idx)
                .filter_map(|(_, (column, value))| Some((column.clone(), value.clone()?)))
                .collect(),
        })
        .collect();
    Ok(records)
}

/// Canonicalize and deduplicate one source's records.
///
/// The first record seen for each identity wins; records that fail to
/// canonicalize share the absent identity, so only the first of them is
/// kept. Blank rows and, when required, rows without a structure are
/// dropped first.
pub fn normalize_records(records: &[CompoundRecord], spec: &SourceSpec, toolkit: &ChemToolkit) -> LabeledSource {
    let mut seen: HashSet<Option<CanonicalIdentity>> = HashSet::new();
    let mut rows = Vec::new();
    let mut considered = 0usize;

    for record in records {
        if spec.skip_blank_rows && record.is_blank() {
            continue;
        }
        if spec.require_structure && record.smiles.is_none() {
            continue;
        }
        considered += 1;
        let identity = toolkit.to_canonical_identity(record.smiles.as_deref());
        if seen.insert(identity.clone()) {
            rows.push(NormalizedRow { identity, name: record.name.clone() });
        }
    }

    debug!(
        source = %spec.label,
        records = records.len(),
        considered,
        distinct = rows.len(),
        "normalized source"
    );
    LabeledSource { label: spec.label.clone(), rows }
}

/// [`records_from_table`] followed by [`normalize_records`].
pub fn normalize_source(table: &Table, spec: &SourceSpec, toolkit: &ChemToolkit) -> Result<LabeledSource> {
    let records = records_from_table(table, spec)?;
    Ok(normalize_records(&records, spec, toolkit))
}
