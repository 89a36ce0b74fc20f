/// Entry points: single-shot conversion and paginated sessions
use arrow::record_batch::RecordBatch;

use crate::config::ConverterConfig;
use crate::core::Result;
use crate::fetch::{PageSize, PaginatedFetch};
use crate::mapping::TypeMapper;
use crate::materialize::materialize;
use crate::source::RowSource;

/// Converts query results from a `RowSource` into Arrow record batches.
///
/// Holds only the mapping policy; sources are borrowed per call and never
/// retained past it.
#[derive(Debug, Clone, Default)]
pub struct ArrowConverter {
    mapper: TypeMapper,
}

impl ArrowConverter {
    #[must_use]
    pub const fn new(mapper: TypeMapper) -> Self {
        Self { mapper }
    }

    #[must_use]
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.type_mapper())
    }

    #[must_use]
    pub const fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// Execute once and materialize the whole result into one batch.
    pub fn convert_all<S: RowSource + ?Sized>(&self, source: &mut S) -> Result<RecordBatch> {
        let mut rows = source.execute(None)?;
        let schema = self.mapper.map(rows.metadata())?;
        let batch = materialize(&schema, &mut *rows, None)?;
        tracing::debug!(rows = batch.num_rows(), columns = batch.num_columns(), "converted result");
        Ok(batch)
    }

    /// Start a paginated session at offset 0.
    pub fn open_paginated<'a, S: RowSource + ?Sized>(
        &self,
        source: &'a mut S,
        page_size: PageSize,
    ) -> PaginatedFetch<'a, S> {
        PaginatedFetch::new(source, self.mapper.clone(), page_size)
    }
}

/// `ArrowConverter::convert_all` with the default mapping policy.
pub fn convert_all<S: RowSource + ?Sized>(source: &mut S) -> Result<RecordBatch> {
    ArrowConverter::default().convert_all(source)
}

/// Open a paginated session with the default mapping policy. `page_size` is
/// a positive row count or `-1` for a single unbounded page.
pub fn open_paginated<S: RowSource + ?Sized>(source: &mut S, page_size: i64) -> Result<PaginatedFetch<'_, S>> {
    let page_size = PageSize::from_limit(page_size)?;
    Ok(ArrowConverter::default().open_paginated(source, page_size))
}
