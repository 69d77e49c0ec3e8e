//! Key joins between tables.

use std::collections::HashMap;

use chemlink_core::Result;
use chemlink_io::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Every left row, matched or not.
    Left,
    /// Only left rows with at least one match.
    Inner,
}

/// Join `right` onto `left` where `left[left_on] == right[right_on]`.
///
/// A left row matching several right rows appears once per match. Missing
/// keys never match. Output columns are the left columns followed by the
/// right ones; when both keys share a name the right key is not repeated,
/// and other shared names get `_x` / `_y` suffixes.
pub fn join(left: &Table, right: &Table, left_on: &str, right_on: &str, kind: JoinKind) -> Result<Table> {
    let left_key = left.column_index(left_on)?;
    let right_key = right.column_index(right_on)?;

    let right_cols: Vec<usize> = (0..right.columns().len())
        .filter(|&i| !(i == right_key && left_on == right_on))
        .collect();

    let mut columns: Vec<String> = left.columns().to_vec();
    let mut extra: Vec<String> = right_cols.iter().map(|&i| right.columns()[i].clone()).collect();
    for name in &mut extra {
        if let Some(pos) = columns.iter().position(|c| c == name) {
            columns[pos] = format!("{name}_x");
            *name = format!("{name}_y");
        }
    }
    columns.extend(extra);

    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        if let Some(key) = row[right_key].as_deref() {
            index.entry(key).or_default().push(i);
        }
    }

    let mut out = Table::new(left.name(), columns);
    for row in left.rows() {
        let matches = row[left_key].as_deref().and_then(|k| index.get(k));
        match matches {
            Some(hits) => {
                for &r in hits {
                    let mut joined = row.clone();
                    joined.extend(right_cols.iter().map(|&i| right.rows()[r][i].clone()));
                    out.push_row(joined)?;
                }
            }
            None if kind == JoinKind::Left => {
                let mut joined = row.clone();
                joined.resize(row.len() + right_cols.len(), None);
                out.push_row(joined)?;
            }
            None => {}
        }
    }
    Ok(out)
}
