/// `RowSource` over an in-memory `Table`
use crate::core::{ColumnMetadata, Row, SkipError, SourceError, Table};
use super::{RowCursor, RowSource};

/// Cursor over a borrowed slice of table rows.
pub struct TableCursor<'a> {
    columns: &'a [ColumnMetadata],
    rows: &'a [Row],
    position: usize,
}

impl<'a> TableCursor<'a> {
    pub fn new(columns: &'a [ColumnMetadata], rows: &'a [Row], max_rows: Option<usize>) -> Self {
        let limit = max_rows.map_or(rows.len(), |max| max.min(rows.len()));
        Self {
            columns,
            rows: &rows[..limit],
            position: 0,
        }
    }

    /// Rows left before the cursor is exhausted.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len() - self.position
    }
}

impl RowCursor for TableCursor<'_> {
    fn metadata(&self) -> &[ColumnMetadata] {
        self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>, SourceError> {
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        Ok(row)
    }

    fn relative(&mut self, rows: usize) -> Result<usize, SkipError> {
        let skipped = rows.min(self.remaining());
        self.position += skipped;
        Ok(skipped)
    }
}

impl RowSource for Table {
    fn execute(&mut self, max_rows: Option<usize>) -> Result<Box<dyn RowCursor + '_>, SourceError> {
        self.executions += 1;
        Ok(Box::new(TableCursor::new(&self.columns, &self.rows, max_rows)))
    }
}
