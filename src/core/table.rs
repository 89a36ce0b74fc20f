use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use super::column::ColumnMetadata;
use super::row::Row;
use super::error::ConvertError;

/// In-memory result set: column metadata plus a stable snapshot of rows.
///
/// Serves as the reference `RowSource` (see `source::memory`) and as the
/// on-disk snapshot format read by `pgr_arrow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Number of times the table has been queried as a row source
    #[serde(skip)]
    pub(crate) executions: usize,
}

impl Table {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMetadata>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            executions: 0,
        }
    }

    pub fn insert(&mut self, row: impl Into<Row>) -> Result<(), ConvertError> {
        let row = row.into();
        if row.len() != self.columns.len() {
            return Err(ConvertError::ColumnCountMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// How many cursors have been opened over this table.
    #[must_use]
    pub const fn executions(&self) -> usize {
        self.executions
    }

    /// Load a table snapshot from a JSON file, validating row widths.
    pub fn load_json(path: &Path) -> Result<Self, ConvertError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;

        let mut table = Self::new(snapshot.name, snapshot.columns);
        for row in snapshot.rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), ConvertError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
