//! Roster reading from delimited tables.
//!
//! The roster is a UTF-8 table with a header row. Two named columns carry
//! the given and family name of each recipient.

use crate::config::RosterColumns;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One recipient row of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
    pub given_name: String,
    pub family_name: String,
}

impl RosterRecord {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
        }
    }

    /// Trimmed given and family name joined by a single space.
    ///
    /// The result is trimmed again so a missing half does not leave a
    /// dangling space.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name.trim(), self.family_name.trim())
            .trim()
            .to_string()
    }
}

/// Reads roster records using configured column names.
#[derive(Debug, Clone)]
pub struct RosterReader {
    columns: RosterColumns,
}

impl Default for RosterReader {
    fn default() -> Self {
        Self::new(RosterColumns::default())
    }
}

impl RosterReader {
    pub fn new(columns: RosterColumns) -> Self {
        Self { columns }
    }

    /// Read every record of the table at `path`.
    pub fn read_path(&self, path: &Path) -> Result<Vec<RosterRecord>> {
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read every record from a reader, in file order.
    ///
    /// Fails before yielding anything if a configured column is absent.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<RosterRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let given_idx = column_index(&headers, &self.columns.given)?;
        let family_idx = column_index(&headers, &self.columns.family)?;

        let mut records = Vec::new();
        // Long rows are accepted and their extra fields ignored; short rows
        // missing a configured column are fatal.
        for (idx, row) in csv_reader.records().enumerate() {
            let row = row?;
            let field = |col: usize, name: &str| {
                row.get(col).map(str::to_string).ok_or_else(|| {
                    Error::RosterError(format!("row {} has no {} field", idx + 1, name))
                })
            };
            records.push(RosterRecord::new(
                field(given_idx, &self.columns.given)?,
                field(family_idx, &self.columns.family)?,
            ));
        }

        log::debug!("Read {} roster records", records.len());
        Ok(records)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}
