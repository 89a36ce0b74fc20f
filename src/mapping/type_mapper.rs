use std::sync::Arc;

use arrow::datatypes::{DECIMAL128_MAX_PRECISION, TimeUnit};

use crate::config::UnsupportedTypePolicy;
use crate::core::{ColumnMetadata, ConvertError, Result, SqlType};
use super::logical_type::{ColumnDescriptor, ColumnarSchema, LogicalType};

/// Maps driver column metadata onto a columnar schema.
///
/// Stateless apart from its configuration: the same metadata always yields
/// the same schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    policy: UnsupportedTypePolicy,
    default_timezone: Arc<str>,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new(UnsupportedTypePolicy::Fail, "UTC")
    }
}

impl TypeMapper {
    #[must_use]
    pub fn new(policy: UnsupportedTypePolicy, default_timezone: impl Into<Arc<str>>) -> Self {
        Self {
            policy,
            default_timezone: default_timezone.into(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> UnsupportedTypePolicy {
        self.policy
    }

    /// Build the schema for a result. Fails before any row is read when the
    /// metadata is empty or, under `Fail`, names an unsupported type.
    pub fn map(&self, metadata: &[ColumnMetadata]) -> Result<ColumnarSchema> {
        if metadata.is_empty() {
            return Err(ConvertError::EmptySchema);
        }

        let mut descriptors = Vec::with_capacity(metadata.len());
        for (source_index, column) in metadata.iter().enumerate() {
            let Some(logical_type) = self.map_column(column) else {
                match self.policy {
                    UnsupportedTypePolicy::Fail => {
                        return Err(ConvertError::UnsupportedColumnType {
                            column: column.name.clone(),
                            sql_type: column.sql_type,
                        });
                    }
                    UnsupportedTypePolicy::Skip => {
                        tracing::warn!(
                            column = %column.name,
                            sql_type = %column.sql_type,
                            "skipping column with unsupported SQL type"
                        );
                        continue;
                    }
                }
            };

            descriptors.push(ColumnDescriptor {
                name: column.name.clone(),
                logical_type,
                nullable: column.nullable,
                source_index,
            });
        }

        if descriptors.is_empty() {
            return Err(ConvertError::EmptySchema);
        }
        Ok(ColumnarSchema::new(descriptors))
    }

    /// Logical type for a single column, `None` when unsupported.
    #[must_use]
    pub fn map_column(&self, column: &ColumnMetadata) -> Option<LogicalType> {
        let logical_type = match column.sql_type {
            SqlType::TinyInt if column.signed => LogicalType::Int8,
            SqlType::TinyInt => LogicalType::Int16,
            SqlType::SmallInt if column.signed => LogicalType::Int16,
            SqlType::SmallInt => LogicalType::Int32,
            SqlType::Integer if column.signed => LogicalType::Int32,
            // Unsigned BIGINT has no wider target, values above i64::MAX fail at conversion
            SqlType::Integer | SqlType::BigInt => LogicalType::Int64,
            SqlType::Real => LogicalType::Float32,
            SqlType::Float | SqlType::Double => LogicalType::Float64,
            SqlType::Numeric | SqlType::Decimal => return decimal_type(column),
            SqlType::Bit | SqlType::Boolean => LogicalType::Boolean,
            SqlType::Date => LogicalType::Date,
            SqlType::Time => LogicalType::Time(fractional_unit(fractional_digits(column))),
            SqlType::Timestamp => LogicalType::Timestamp {
                unit: fractional_unit(fractional_digits(column)),
                timezone: column.timezone.as_deref().map(Arc::from),
            },
            SqlType::TimestampWithTimezone => LogicalType::Timestamp {
                unit: fractional_unit(fractional_digits(column)),
                timezone: Some(
                    column
                        .timezone
                        .as_deref()
                        .map_or_else(|| Arc::clone(&self.default_timezone), Arc::from),
                ),
            },
            SqlType::Char
            | SqlType::Varchar
            | SqlType::LongVarchar
            | SqlType::NChar
            | SqlType::NVarchar
            | SqlType::LongNVarchar
            | SqlType::Clob
            | SqlType::NClob => LogicalType::Utf8,
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary | SqlType::Blob => {
                LogicalType::Binary
            }
            SqlType::TimeWithTimezone
            | SqlType::Null
            | SqlType::Other
            | SqlType::JavaObject
            | SqlType::Distinct
            | SqlType::Struct
            | SqlType::Array
            | SqlType::Ref
            | SqlType::Datalink
            | SqlType::RowId
            | SqlType::SqlXml
            | SqlType::RefCursor
            | SqlType::Unknown(_) => return None,
        };
        Some(logical_type)
    }
}

fn decimal_type(column: &ColumnMetadata) -> Option<LogicalType> {
    let precision = column
        .precision
        .map(u32::from)
        .filter(|p| *p > 0)
        .or_else(|| column.column_size.filter(|s| *s > 0))
        .unwrap_or(u32::from(DECIMAL128_MAX_PRECISION));
    let precision = u8::try_from(precision)
        .ok()
        .filter(|p| *p <= DECIMAL128_MAX_PRECISION)?;

    let scale = column.scale.or(column.decimal_digits).unwrap_or(0);
    if i16::from(scale) > i16::from(precision) {
        return None;
    }
    Some(LogicalType::Decimal { precision, scale })
}

fn fractional_digits(column: &ColumnMetadata) -> Option<i8> {
    column.scale.or(column.decimal_digits)
}

/// 0 → seconds, 1-3 → millis, 4-6 → micros, 7+ → nanos; undeclared → millis.
const fn fractional_unit(digits: Option<i8>) -> TimeUnit {
    match digits {
        Some(0) => TimeUnit::Second,
        Some(4..=6) => TimeUnit::Microsecond,
        Some(7..) => TimeUnit::Nanosecond,
        _ => TimeUnit::Millisecond,
    }
}
