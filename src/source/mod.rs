/// Row source abstraction - what the converter needs from a relational driver
///
/// A `RowSource` stands in for a connection plus a prepared query: every
/// `execute` runs the query again and hands back a fresh forward-only cursor.
/// The converter borrows the source, it never owns or closes it.
pub mod memory;

pub use memory::TableCursor;

use crate::core::{ColumnMetadata, Row, SkipError, SourceError};

/// Forward-only cursor over one execution of a query.
pub trait RowCursor {
    /// Column metadata, available before the first row is read
    fn metadata(&self) -> &[ColumnMetadata];

    /// Next row, or `None` once the result (or its row limit) is exhausted
    fn next_row(&mut self) -> Result<Option<Row>, SourceError>;

    /// Move forward `rows` positions without returning them.
    ///
    /// Returns how many rows were actually skipped, which is smaller than
    /// `rows` when the result ends first. A failure reports how far the
    /// cursor got.
    fn relative(&mut self, rows: usize) -> Result<usize, SkipError> {
        let mut skipped = 0;
        while skipped < rows {
            match self.next_row() {
                Ok(Some(_)) => skipped += 1,
                Ok(None) => break,
                Err(cause) => return Err(SkipError { skipped, cause }),
            }
        }
        Ok(skipped)
    }
}

/// A re-executable query over a stable result snapshot.
pub trait RowSource {
    /// Execute the query, capping the whole result at `max_rows` rows
    /// counted from the first row (the JDBC `setMaxRows` contract).
    fn execute(&mut self, max_rows: Option<usize>) -> Result<Box<dyn RowCursor + '_>, SourceError>;
}
