use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

use crate::core::{ConvertError, Result};
use crate::mapping::{ColumnarSchema, TypeMapper};
use crate::materialize::materialize;
use crate::source::RowSource;

/// Rows requested per `fetch_next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    Rows(NonZeroUsize),
    /// Whole remaining result in one page
    Unbounded,
}

impl PageSize {
    /// Limit value meaning "no limit"
    pub const UNBOUNDED: i64 = -1;

    /// Parse the integer form used by configuration and the CLI: a positive
    /// row count, or `-1` for unbounded.
    pub fn from_limit(limit: i64) -> Result<Self> {
        if limit == Self::UNBOUNDED {
            return Ok(Self::Unbounded);
        }
        usize::try_from(limit)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self::Rows)
            .ok_or(ConvertError::InvalidPageSize(limit))
    }

    #[must_use]
    pub const fn rows(self) -> Option<usize> {
        match self {
            Self::Rows(n) => Some(n.get()),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows(n) => write!(f, "{n}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Active,
    /// Terminal, further fetches return empty batches
    Done,
}

/// Position of a paginated session. Only `fetch_next` and `advance` move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCursor {
    pub offset: usize,
    pub page_size: PageSize,
    pub exhausted: bool,
}

/// Pulls successive, contiguous windows of a query result as Arrow batches.
///
/// Each fetch re-executes the query capped at `offset + page_size` rows and
/// skips `offset` rows before materializing. A page shorter than
/// `page_size` ends the session; a full page leaves it active, so a result
/// whose size is an exact multiple of the page size ends with one empty
/// fetch.
pub struct PaginatedFetch<'a, S: RowSource + ?Sized> {
    source: &'a mut S,
    mapper: TypeMapper,
    schema: Option<ColumnarSchema>,
    cursor: FetchCursor,
}

impl<'a, S: RowSource + ?Sized> PaginatedFetch<'a, S> {
    pub fn new(source: &'a mut S, mapper: TypeMapper, page_size: PageSize) -> Self {
        Self {
            source,
            mapper,
            schema: None,
            cursor: FetchCursor {
                offset: 0,
                page_size,
                exhausted: false,
            },
        }
    }

    /// Fetch the next window.
    ///
    /// Once done, returns an empty batch without touching the source. On
    /// error the cursor is left where it was, so the same window can be
    /// fetched again.
    pub fn fetch_next(&mut self) -> Result<RecordBatch> {
        if self.cursor.exhausted {
            let schema = self
                .schema
                .as_ref()
                .map_or_else(|| Arc::new(Schema::empty()), ColumnarSchema::arrow_schema);
            return Ok(RecordBatch::new_empty(schema));
        }

        let FetchCursor { offset, page_size, .. } = self.cursor;
        let max_rows = page_size.rows().map(|rows| offset.saturating_add(rows));
        let mut rows = self.source.execute(max_rows)?;

        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => {
                let schema = self.mapper.map(rows.metadata())?;
                self.schema = Some(schema.clone());
                schema
            }
        };

        let skipped = rows
            .relative(offset)
            .map_err(|err| ConvertError::SourceExhaustedPrematurely {
                row: err.skipped,
                cause: err.cause,
            })?;
        if skipped < offset {
            tracing::debug!(offset, skipped, "result ends before requested offset");
        }

        let batch = materialize(&schema, &mut *rows, page_size.rows())
            .map_err(|err| err.with_row_offset(offset))?;
        drop(rows);

        let fetched = batch.num_rows();
        match page_size {
            PageSize::Rows(n) => {
                self.cursor.offset = offset.saturating_add(n.get());
                self.cursor.exhausted = fetched < n.get();
            }
            PageSize::Unbounded => {
                self.cursor.offset = offset.saturating_add(fetched);
                self.cursor.exhausted = true;
            }
        }

        tracing::debug!(
            offset,
            rows = fetched,
            %page_size,
            exhausted = self.cursor.exhausted,
            "fetched page"
        );
        Ok(batch)
    }

    /// Skip `extra` rows without fetching them. Does not change the state.
    pub fn advance(&mut self, extra: usize) {
        self.cursor.offset = self.cursor.offset.saturating_add(extra);
    }

    #[must_use]
    pub const fn state(&self) -> FetchState {
        if self.cursor.exhausted { FetchState::Done } else { FetchState::Active }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.cursor.exhausted
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.cursor.offset
    }

    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.cursor.page_size
    }

    #[must_use]
    pub const fn cursor(&self) -> FetchCursor {
        self.cursor
    }

    /// Schema of the session, known after the first successful mapping.
    #[must_use]
    pub const fn schema(&self) -> Option<&ColumnarSchema> {
        self.schema.as_ref()
    }

    /// Iterate over the remaining non-empty pages.
    ///
    /// The iterator ends when the session is done or after the first error;
    /// the controller keeps its position, so a failed window can be retried.
    pub fn pages(&mut self) -> Pages<'_, 'a, S> {
        Pages { fetch: self, failed: false }
    }
}

pub struct Pages<'p, 'a, S: RowSource + ?Sized> {
    fetch: &'p mut PaginatedFetch<'a, S>,
    failed: bool,
}

impl<S: RowSource + ?Sized> Iterator for Pages<'_, '_, S> {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.fetch.is_done() {
            return None;
        }
        match self.fetch.fetch_next() {
            Ok(batch) if batch.num_rows() == 0 => None,
            Ok(batch) => Some(Ok(batch)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnMetadata, SqlType, Table, Value};
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;

    fn numbers(rows: i64) -> Table {
        let mut table = Table::new("numbers", vec![ColumnMetadata::new("n", SqlType::BigInt)]);
        for n in 0..rows {
            table.insert(vec![Value::BigInt(n)]).unwrap();
        }
        table
    }

    fn values(batch: &RecordBatch) -> Vec<i64> {
        batch.column(0).as_primitive::<Int64Type>().values().to_vec()
    }

    fn pages_of(rows: usize) -> PageSize {
        PageSize::Rows(NonZeroUsize::new(rows).unwrap())
    }

    #[test]
    fn test_page_size_from_limit() {
        assert_eq!(PageSize::from_limit(-1).unwrap(), PageSize::Unbounded);
        assert_eq!(PageSize::from_limit(3).unwrap(), pages_of(3));
        assert!(matches!(PageSize::from_limit(0), Err(ConvertError::InvalidPageSize(0))));
        assert!(matches!(PageSize::from_limit(-2), Err(ConvertError::InvalidPageSize(-2))));
    }

    #[test]
    fn test_windows_are_contiguous() {
        let mut table = numbers(10);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(3));

        let mut sizes = Vec::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            assert_eq!(fetch.state(), FetchState::Active);
            let batch = fetch.fetch_next().unwrap();
            sizes.push(batch.num_rows());
            seen.extend(values(&batch));
        }
        assert_eq!(sizes, vec![3, 3, 3, 1]);
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(fetch.state(), FetchState::Done);

        let fifth = fetch.fetch_next().unwrap();
        assert_eq!(fifth.num_rows(), 0);
        assert_eq!(fifth.num_columns(), 1);
    }

    #[test]
    fn test_done_does_not_touch_source() {
        let mut table = numbers(2);
        {
            let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(5));
            assert_eq!(fetch.fetch_next().unwrap().num_rows(), 2);
            assert!(fetch.is_done());
            for _ in 0..3 {
                assert_eq!(fetch.fetch_next().unwrap().num_rows(), 0);
            }
        }
        assert_eq!(table.executions(), 1);
    }

    #[test]
    fn test_full_last_page_needs_probe() {
        let mut table = numbers(6);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(3));

        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 3);
        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 3);
        assert_eq!(fetch.state(), FetchState::Active);
        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 0);
        assert_eq!(fetch.state(), FetchState::Done);
        assert_eq!(fetch.offset(), 9);
    }

    #[test]
    fn test_unbounded_takes_everything_once() {
        let mut table = numbers(7);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), PageSize::Unbounded);

        let batch = fetch.fetch_next().unwrap();
        assert_eq!(batch.num_rows(), 7);
        assert!(fetch.is_done());
        assert_eq!(fetch.offset(), 7);
    }

    #[test]
    fn test_advance_skips_rows() {
        let mut table = numbers(10);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(4));

        fetch.advance(5);
        assert_eq!(fetch.state(), FetchState::Active);
        assert_eq!(values(&fetch.fetch_next().unwrap()), vec![5, 6, 7, 8]);
        assert_eq!(values(&fetch.fetch_next().unwrap()), vec![9]);
        assert!(fetch.is_done());

        fetch.advance(100);
        assert!(fetch.is_done());
    }

    #[test]
    fn test_advance_past_end() {
        let mut table = numbers(3);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(2));
        fetch.advance(10);

        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 0);
        assert!(fetch.is_done());
    }

    #[test]
    fn test_failed_window_is_not_consumed() {
        let mut table = Table::new("t", vec![ColumnMetadata::new("n", SqlType::TinyInt)]);
        for v in [1, 2, 3, 1000, 5] {
            table.insert(vec![Value::Integer(v)]).unwrap();
        }
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(2));

        assert_eq!(fetch.fetch_next().unwrap().num_rows(), 2);
        let err = fetch.fetch_next().unwrap_err();
        assert!(err.is_out_of_range());
        assert!(matches!(err, ConvertError::ConversionFailed { row: 3, .. }));
        assert_eq!(fetch.offset(), 2);
        assert_eq!(fetch.state(), FetchState::Active);

        // Same window, same failure
        assert!(fetch.fetch_next().unwrap_err().is_out_of_range());
        assert_eq!(fetch.offset(), 2);
    }

    #[test]
    fn test_schema_cached_after_first_fetch() {
        let mut table = numbers(4);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(3));
        assert!(fetch.schema().is_none());

        let first = fetch.fetch_next().unwrap();
        let cached = fetch.schema().cloned().unwrap();
        let second = fetch.fetch_next().unwrap();
        assert_eq!(first.schema(), second.schema());
        assert_eq!(cached.arrow_schema(), first.schema());
    }

    #[test]
    fn test_pages_iterator() {
        let mut table = numbers(10);
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(5));

        let sizes: Vec<usize> = fetch.pages().map(|b| b.unwrap().num_rows()).collect();
        // Exact multiple: the probing fetch is empty and not yielded
        assert_eq!(sizes, vec![5, 5]);
        assert!(fetch.is_done());
    }

    #[test]
    fn test_empty_metadata_rejected_before_rows() {
        let mut table = Table::new("empty", Vec::new());
        let mut fetch = PaginatedFetch::new(&mut table, TypeMapper::default(), pages_of(5));
        assert!(matches!(fetch.fetch_next(), Err(ConvertError::EmptySchema)));
        assert_eq!(fetch.state(), FetchState::Active);
    }
}
