//! Table input and output for the chemlink pipeline.
//!
//! Source files are read into an in-memory [`Table`] of optional string
//! cells; stage outputs are written back the same way. Nothing here knows
//! about chemistry.

pub mod csv;
pub mod table;

pub use crate::csv::{read_csv, read_csv_from, write_csv, write_csv_to, ReadOptions};
pub use table::Table;
