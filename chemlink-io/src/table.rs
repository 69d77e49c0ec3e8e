//! In-memory string table with missing values.

use chemlink_core::{ChemlinkError, Result, Summarizable};

/// A named table of optional string cells, row-major.
///
/// Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// An empty table with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table { name: name.into(), columns, rows: Vec::new() }
    }

    /// Build a table, checking that every row matches the column count.
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self> {
        let mut table = Table::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ChemlinkError::InvalidInput(format!(
                "table '{}': row has {} cells, expected {}",
                self.name,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of a column, or [`ChemlinkError::MissingColumn`].
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns.iter().position(|c| c == column).ok_or_else(|| {
            ChemlinkError::MissingColumn { table: self.name.clone(), column: column.to_string() }
        })
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, column: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// A single cell by row number and column name.
    pub fn get(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let idx = self.column_index(column)?;
        let row = self.rows.get(row).ok_or_else(|| {
            ChemlinkError::InvalidInput(format!("table '{}' has no row {row}", self.name))
        })?;
        Ok(row[idx].as_deref())
    }

    /// Rename columns in place; names not present are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for column in &mut self.columns {
            if let Some((_, to)) = renames.iter().find(|(from, _)| from == column) {
                *column = to.to_string();
            }
        }
    }

    /// Copy of the table without the named columns. Names not present are
    /// ignored.
    pub fn without_columns(&self, drop: &[&str]) -> Table {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !drop.contains(&self.columns[i].as_str()))
            .collect();
        Table {
            name: self.name.clone(),
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Append a column; `values` must have one entry per row.
    pub fn add_column(&mut self, column: impl Into<String>, values: Vec<Option<String>>) -> Result<()> {
        let column = column.into();
        if values.len() != self.rows.len() {
            return Err(ChemlinkError::InvalidInput(format!(
                "table '{}': column '{column}' has {} values, expected {}",
                self.name,
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(column);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Keep only rows for which `keep` returns true.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Option<String>]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }
}

impl Summarizable for Table {
    fn summary(&self) -> String {
        format!("{}: {} rows x {} columns", self.name, self.rows.len(), self.columns.len())
    }
}
