// PostgrustArrow - relational query results as Apache Arrow record batches
// Type mapping, column materialization and paginated fetch

// Clippy configuration - allow non-critical warnings
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::wildcard_enum_match_arm)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

// Core value model (values, rows, column metadata, errors, in-memory tables)
pub mod core;

// Row source abstraction (cursor + re-executable query)
pub mod source;

// SQL type → Arrow logical type mapping
pub mod mapping;

// Row → column buffers → RecordBatch
pub mod materialize;

// Paginated fetch controller
pub mod fetch;

// Public entry points
pub mod converter;

// File/env configuration
pub mod config;

// Table rendering for the CLI
pub mod render;

// Re-export commonly used types for convenience
pub use crate::core::{ColumnMetadata, ConvertError, Result, Row, SkipError, SourceError, SqlType, Table, Value, ValueError};
pub use crate::source::{RowCursor, RowSource};
pub use crate::mapping::{ColumnDescriptor, ColumnarSchema, LogicalType, TypeMapper};
pub use crate::materialize::materialize;
pub use crate::fetch::{FetchState, PageSize, PaginatedFetch};
pub use crate::converter::{ArrowConverter, convert_all, open_paginated};
pub use crate::config::{ConverterConfig, UnsupportedTypePolicy};
pub use crate::render::render_batch;
