//! CSV reading and writing for in-memory tables.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use ::csv::{ReaderBuilder, WriterBuilder};
use chemlink_core::{ChemlinkError, Result};
use tracing::debug;

use crate::table::Table;

/// How to interpret a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// First (non-skipped) record holds column names.
    pub has_headers: bool,
    /// Raw lines to discard before the header, e.g. a banner row.
    pub skip_rows: usize,
    /// Column names for headerless files. Without them columns are named
    /// by position (`"0"`, `"1"`, ...).
    pub column_names: Option<Vec<String>>,
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions { has_headers: true, skip_rows: 0, column_names: None, delimiter: b',' }
    }
}

impl ReadOptions {
    /// Headerless file with the given column names.
    pub fn headerless<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReadOptions {
            has_headers: false,
            column_names: Some(names.into_iter().map(Into::into).collect()),
            ..ReadOptions::default()
        }
    }

    pub fn skip_rows(mut self, n: usize) -> Self {
        self.skip_rows = n;
        self
    }
}

/// Read a CSV file into a [`Table`] named after the file stem.
pub fn read_csv(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ChemlinkError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let table = read_csv_from(file, &name, options)?;
    debug!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "read table");
    Ok(table)
}

/// Read CSV data from any reader.
///
/// Empty fields and the literal `NaN` become missing values. Records
/// shorter than the header are padded with missing values; longer ones are
/// a parse error.
pub fn read_csv_from<R: Read>(reader: R, name: &str, options: &ReadOptions) -> Result<Table> {
    let mut reader = BufReader::new(reader);
    let mut discarded = String::new();
    for _ in 0..options.skip_rows {
        discarded.clear();
        if reader.read_line(&mut discarded)? == 0 {
            break;
        }
    }

    let mut csv = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut columns: Vec<String> = if options.has_headers {
        csv.headers()?.iter().map(|h| h.trim().to_string()).collect()
    } else {
        options.column_names.clone().unwrap_or_default()
    };
    let named_by_position = !options.has_headers && options.column_names.is_none();

    let mut rows = Vec::new();
    for (line, record) in csv.records().enumerate() {
        let record = record?;
        if named_by_position && record.len() > columns.len() {
            columns.extend((columns.len()..record.len()).map(|i| i.to_string()));
        }
        if record.len() > columns.len() {
            return Err(ChemlinkError::Parse(format!(
                "{name}: record {} has {} fields, expected {}",
                line + 1,
                record.len(),
                columns.len()
            )));
        }
        let mut row: Vec<Option<String>> = record.iter().map(cell).collect();
        row.resize(columns.len(), None);
        rows.push(row);
    }
    // Rows read before positional columns grew need padding too.
    for row in &mut rows {
        row.resize(columns.len(), None);
    }

    Table::from_rows(name, columns, rows)
}

fn cell(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == "NaN" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Write a table as CSV with a header row. Missing values are written as
/// empty fields.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        ChemlinkError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })?;
    write_csv_to(table, file)?;
    debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

pub fn write_csv_to<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(table.columns())?;
    for row in table.rows() {
        csv.write_record(row.iter().map(|v| v.as_deref().unwrap_or("")))?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_headers_and_missing_values() {
        let data = "ID,SMILES,INN\n1,CCO,ethanol\n2,,NaN\n";
        let table = read_csv_from(data.as_bytes(), "compounds", &ReadOptions::default()).unwrap();
        assert_eq!(table.columns(), ["ID", "SMILES", "INN"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "SMILES").unwrap(), Some("CCO"));
        assert_eq!(table.get(1, "SMILES").unwrap(), None);
        assert_eq!(table.get(1, "INN").unwrap(), None);
    }

    #[test]
    fn skips_banner_lines() {
        let data = "SGC donated probes, updated 2019\nCompound name,SMILES\nprobe-1,CCN\n";
        let opts = ReadOptions::default().skip_rows(1);
        let table = read_csv_from(data.as_bytes(), "sgc", &opts).unwrap();
        assert_eq!(table.columns(), ["Compound name", "SMILES"]);
        assert_eq!(table.get(0, "Compound name").unwrap(), Some("probe-1"));
    }

    #[test]
    fn headerless_with_names() {
        let data = "4,aspirin\n7,ibuprofen\n";
        let opts = ReadOptions::headerless(["ID", "Drug Name"]);
        let table = read_csv_from(data.as_bytes(), "fda", &opts).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "Drug Name").unwrap(), Some("ibuprofen"));
    }

    #[test]
    fn headerless_positional_names() {
        let data = "a,b\nc,d,e\n";
        let opts = ReadOptions { has_headers: false, ..ReadOptions::default() };
        let table = read_csv_from(data.as_bytes(), "raw", &opts).unwrap();
        assert_eq!(table.columns(), ["0", "1", "2"]);
        assert_eq!(table.get(0, "2").unwrap(), None);
        assert_eq!(table.get(1, "2").unwrap(), Some("e"));
    }

    #[test]
    fn short_rows_are_padded_long_rows_rejected() {
        let table = read_csv_from("a,b\n1\n".as_bytes(), "t", &ReadOptions::default()).unwrap();
        assert_eq!(table.get(0, "b").unwrap(), None);
        assert!(read_csv_from("a,b\n1,2,3\n".as_bytes(), "t", &ReadOptions::default()).is_err());
    }

    #[test]
    fn write_then_read_file() {
        let mut table = Table::new("out", vec!["InChI".into(), "Source".into()]);
        table.push_row(vec![Some("InChI=1S/CH4/h1H4".into()), Some("A, B".into())]).unwrap();
        table.push_row(vec![Some("InChI=1S/H2O/h1H2".into()), None]).unwrap();

        let file = NamedTempFile::with_suffix(".csv").unwrap();
        write_csv(&table, file.path()).unwrap();
        let back = read_csv(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(back.columns(), table.columns());
        assert_eq!(back.rows(), table.rows());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_csv("/nonexistent/file.csv", &ReadOptions::default());
        assert!(matches!(result, Err(ChemlinkError::Io(_))));
    }
}
