//! Approval flagging and the drug-target join.

use std::collections::HashSet;

use chemlink_core::Result;
use chemlink_io::Table;
use tracing::info;

use crate::join::{join, JoinKind};

/// Name of the column holding the approval flag.
pub const APPROVED_COLUMN: &str = "Approved";

/// Compound table with its approval flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedCompounds {
    pub table: Table,
    /// Rows flagged `1`.
    pub approved: usize,
}

/// Left-join the approval list onto the compounds by `id_column` and add an
/// `Approved` column: `1` when the compound's ID is on the list, else `0`.
pub fn flag_approved(compounds: &Table, approved: &Table, id_column: &str) -> Result<FlaggedCompounds> {
    let approved_ids: HashSet<&str> = approved.column(id_column)?.into_iter().flatten().collect();

    let mut table = join(compounds, approved, id_column, id_column, JoinKind::Left)?;
    let flags: Vec<Option<String>> = table
        .column(id_column)?
        .into_iter()
        .map(|id| {
            let on_list = id.is_some_and(|id| approved_ids.contains(id));
            Some(if on_list { "1" } else { "0" }.to_string())
        })
        .collect();
    let approved_count = flags.iter().filter(|f| f.as_deref() == Some("1")).count();
    table.add_column(APPROVED_COLUMN, flags)?;

    info!(compounds = table.len(), approved = approved_count, "flagged approved compounds");
    Ok(FlaggedCompounds { table, approved: approved_count })
}

/// Left-join flagged compounds onto drug-target records
/// (`targets[target_key] == compounds[compound_key]`) and drop `dropped`.
pub fn join_targets(
    targets: &Table,
    compounds: &Table,
    target_key: &str,
    compound_key: &str,
    dropped: &[&str],
) -> Result<Table> {
    let joined = join(targets, compounds, target_key, compound_key, JoinKind::Left)?;
    Ok(joined.without_columns(dropped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            "t",
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| (!v.is_empty()).then(|| v.to_string())).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn flags_members_of_the_approval_list() {
        let compounds = table(&["ID", "INN", "SMILES"], &[&["1", "aspirin", "CC(=O)Oc1ccccc1C(=O)O"], &["2", "x", "CCO"], &["3", "y", ""]]);
        let approved = table(&["ID", "Drug Name"], &[&["1", "ASPIRIN"], &["3", "Y"]]);
        let flagged = flag_approved(&compounds, &approved, "ID").unwrap();
        assert_eq!(flagged.approved, 2);
        assert_eq!(flagged.table.column("Approved").unwrap(), vec![Some("1"), Some("0"), Some("1")]);
        assert_eq!(flagged.table.get(0, "Drug Name").unwrap(), Some("ASPIRIN"));
    }

    #[test]
    fn target_join_drops_redundant_columns() {
        let compounds = table(&["ID", "INN", "SMILES", "Drug Name", "Approved"], &[&["1", "aspirin", "CCO", "ASPIRIN", "1"]]);
        let targets = table(&["STRUCT_ID", "DRUG_NAME", "TARGET_NAME"], &[&["1", "aspirin", "COX-1"], &["5", "unknown", "X"]]);
        let joined = join_targets(&targets, &compounds, "STRUCT_ID", "ID", &["Drug Name", "INN"]).unwrap();
        assert_eq!(joined.columns(), ["STRUCT_ID", "DRUG_NAME", "TARGET_NAME", "ID", "SMILES", "Approved"]);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.get(0, "SMILES").unwrap(), Some("CCO"));
        assert_eq!(joined.get(1, "SMILES").unwrap(), None);
    }
}
