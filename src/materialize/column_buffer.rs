use std::sync::Arc;

use arrow::array::{
    ArrayBuilder, ArrayRef, BinaryBuilder, BooleanBuilder, Date32Builder, Decimal128Builder,
    Float32Builder, Float64Builder, Int8Builder, Int16Builder, Int32Builder, Int64Builder,
    StringBuilder, Time32MillisecondBuilder, Time32SecondBuilder, Time64MicrosecondBuilder,
    Time64NanosecondBuilder, TimestampMicrosecondBuilder, TimestampMillisecondBuilder,
    TimestampNanosecondBuilder, TimestampSecondBuilder,
};
use arrow::datatypes::TimeUnit;
use arrow::error::ArrowError;

use crate::core::{Value, ValueError};
use crate::mapping::LogicalType;
use super::convert;

/// Average payload bytes reserved per row for text and binary buffers
const VARIABLE_WIDTH_HINT: usize = 16;

/// Growable Arrow builder for one field. One variant per physical layout,
/// so appends dispatch on a closed set.
pub enum ColumnBuffer {
    Int8(Int8Builder),
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Boolean(BooleanBuilder),
    Decimal {
        builder: Decimal128Builder,
        precision: u8,
        scale: i8,
    },
    Date(Date32Builder),
    TimeSecond(Time32SecondBuilder),
    TimeMillisecond(Time32MillisecondBuilder),
    TimeMicrosecond(Time64MicrosecondBuilder),
    TimeNanosecond(Time64NanosecondBuilder),
    TimestampSecond(TimestampSecondBuilder),
    TimestampMillisecond(TimestampMillisecondBuilder),
    TimestampMicrosecond(TimestampMicrosecondBuilder),
    TimestampNanosecond(TimestampNanosecondBuilder),
    Utf8(StringBuilder),
    Binary(BinaryBuilder),
}

impl ColumnBuffer {
    /// Allocate an empty buffer laid out for `logical_type`.
    pub fn new(logical_type: &LogicalType, capacity: usize) -> Result<Self, ArrowError> {
        let buffer = match logical_type {
            LogicalType::Int8 => Self::Int8(Int8Builder::with_capacity(capacity)),
            LogicalType::Int16 => Self::Int16(Int16Builder::with_capacity(capacity)),
            LogicalType::Int32 => Self::Int32(Int32Builder::with_capacity(capacity)),
            LogicalType::Int64 => Self::Int64(Int64Builder::with_capacity(capacity)),
            LogicalType::Float32 => Self::Float32(Float32Builder::with_capacity(capacity)),
            LogicalType::Float64 => Self::Float64(Float64Builder::with_capacity(capacity)),
            LogicalType::Boolean => Self::Boolean(BooleanBuilder::with_capacity(capacity)),
            LogicalType::Decimal { precision, scale } => Self::Decimal {
                builder: Decimal128Builder::with_capacity(capacity)
                    .with_precision_and_scale(*precision, *scale)?,
                precision: *precision,
                scale: *scale,
            },
            LogicalType::Date => Self::Date(Date32Builder::with_capacity(capacity)),
            LogicalType::Time(TimeUnit::Second) => {
                Self::TimeSecond(Time32SecondBuilder::with_capacity(capacity))
            }
            LogicalType::Time(TimeUnit::Millisecond) => {
                Self::TimeMillisecond(Time32MillisecondBuilder::with_capacity(capacity))
            }
            LogicalType::Time(TimeUnit::Microsecond) => {
                Self::TimeMicrosecond(Time64MicrosecondBuilder::with_capacity(capacity))
            }
            LogicalType::Time(TimeUnit::Nanosecond) => {
                Self::TimeNanosecond(Time64NanosecondBuilder::with_capacity(capacity))
            }
            LogicalType::Timestamp { unit, timezone } => {
                let timezone = timezone.as_ref().map(Arc::clone);
                match unit {
                    TimeUnit::Second => Self::TimestampSecond(
                        TimestampSecondBuilder::with_capacity(capacity).with_timezone_opt(timezone),
                    ),
                    TimeUnit::Millisecond => Self::TimestampMillisecond(
                        TimestampMillisecondBuilder::with_capacity(capacity)
                            .with_timezone_opt(timezone),
                    ),
                    TimeUnit::Microsecond => Self::TimestampMicrosecond(
                        TimestampMicrosecondBuilder::with_capacity(capacity)
                            .with_timezone_opt(timezone),
                    ),
                    TimeUnit::Nanosecond => Self::TimestampNanosecond(
                        TimestampNanosecondBuilder::with_capacity(capacity)
                            .with_timezone_opt(timezone),
                    ),
                }
            }
            LogicalType::Utf8 => Self::Utf8(StringBuilder::with_capacity(
                capacity,
                capacity * VARIABLE_WIDTH_HINT,
            )),
            LogicalType::Binary => Self::Binary(BinaryBuilder::with_capacity(
                capacity,
                capacity * VARIABLE_WIDTH_HINT,
            )),
        };
        Ok(buffer)
    }

    /// Convert and append one non-null value. `target` is the logical type
    /// the buffer was created for, used in error messages and for decimal
    /// precision.
    pub fn append(&mut self, value: &Value, target: &LogicalType) -> Result<(), ValueError> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }

        match self {
            Self::Int8(b) => b.append_value(convert::integer(value, target)?),
            Self::Int16(b) => b.append_value(convert::integer(value, target)?),
            Self::Int32(b) => b.append_value(convert::integer(value, target)?),
            Self::Int64(b) => b.append_value(convert::integer(value, target)?),
            Self::Float32(b) => b.append_value(convert::float32(value, target)?),
            Self::Float64(b) => b.append_value(convert::float64(value, target)?),
            Self::Boolean(b) => b.append_value(convert::boolean(value, target)?),
            Self::Decimal { builder, precision, scale } => {
                builder.append_value(convert::decimal(value, *precision, *scale, target)?);
            }
            Self::Date(b) => b.append_value(convert::date32(value, target)?),
            Self::TimeSecond(b) => b.append_value(narrow_time(value, TimeUnit::Second, target)?),
            Self::TimeMillisecond(b) => {
                b.append_value(narrow_time(value, TimeUnit::Millisecond, target)?);
            }
            Self::TimeMicrosecond(b) => {
                b.append_value(convert::time_of_day(value, TimeUnit::Microsecond, target)?);
            }
            Self::TimeNanosecond(b) => {
                b.append_value(convert::time_of_day(value, TimeUnit::Nanosecond, target)?);
            }
            Self::TimestampSecond(b) => {
                b.append_value(convert::timestamp(value, TimeUnit::Second, target)?);
            }
            Self::TimestampMillisecond(b) => {
                b.append_value(convert::timestamp(value, TimeUnit::Millisecond, target)?);
            }
            Self::TimestampMicrosecond(b) => {
                b.append_value(convert::timestamp(value, TimeUnit::Microsecond, target)?);
            }
            Self::TimestampNanosecond(b) => {
                b.append_value(convert::timestamp(value, TimeUnit::Nanosecond, target)?);
            }
            Self::Utf8(b) => match value {
                Value::Text(s) => b.append_value(s),
                Value::Uuid(u) => b.append_value(u.hyphenated().to_string()),
                other => return Err(convert::mismatch(other, target)),
            },
            Self::Binary(b) => match value {
                Value::Bytea(bytes) => b.append_value(bytes),
                Value::Uuid(u) => b.append_value(u.as_bytes()),
                other => return Err(convert::mismatch(other, target)),
            },
        }
        Ok(())
    }

    pub fn append_null(&mut self) {
        match self {
            Self::Int8(b) => b.append_null(),
            Self::Int16(b) => b.append_null(),
            Self::Int32(b) => b.append_null(),
            Self::Int64(b) => b.append_null(),
            Self::Float32(b) => b.append_null(),
            Self::Float64(b) => b.append_null(),
            Self::Boolean(b) => b.append_null(),
            Self::Decimal { builder, .. } => builder.append_null(),
            Self::Date(b) => b.append_null(),
            Self::TimeSecond(b) => b.append_null(),
            Self::TimeMillisecond(b) => b.append_null(),
            Self::TimeMicrosecond(b) => b.append_null(),
            Self::TimeNanosecond(b) => b.append_null(),
            Self::TimestampSecond(b) => b.append_null(),
            Self::TimestampMillisecond(b) => b.append_null(),
            Self::TimestampMicrosecond(b) => b.append_null(),
            Self::TimestampNanosecond(b) => b.append_null(),
            Self::Utf8(b) => b.append_null(),
            Self::Binary(b) => b.append_null(),
        }
    }

    fn builder(&self) -> &dyn ArrayBuilder {
        match self {
            Self::Int8(b) => b,
            Self::Int16(b) => b,
            Self::Int32(b) => b,
            Self::Int64(b) => b,
            Self::Float32(b) => b,
            Self::Float64(b) => b,
            Self::Boolean(b) => b,
            Self::Decimal { builder, .. } => builder,
            Self::Date(b) => b,
            Self::TimeSecond(b) => b,
            Self::TimeMillisecond(b) => b,
            Self::TimeMicrosecond(b) => b,
            Self::TimeNanosecond(b) => b,
            Self::TimestampSecond(b) => b,
            Self::TimestampMillisecond(b) => b,
            Self::TimestampMicrosecond(b) => b,
            Self::TimestampNanosecond(b) => b,
            Self::Utf8(b) => b,
            Self::Binary(b) => b,
        }
    }

    fn builder_mut(&mut self) -> &mut dyn ArrayBuilder {
        match self {
            Self::Int8(b) => b,
            Self::Int16(b) => b,
            Self::Int32(b) => b,
            Self::Int64(b) => b,
            Self::Float32(b) => b,
            Self::Float64(b) => b,
            Self::Boolean(b) => b,
            Self::Decimal { builder, .. } => builder,
            Self::Date(b) => b,
            Self::TimeSecond(b) => b,
            Self::TimeMillisecond(b) => b,
            Self::TimeMicrosecond(b) => b,
            Self::TimeNanosecond(b) => b,
            Self::TimestampSecond(b) => b,
            Self::TimestampMillisecond(b) => b,
            Self::TimestampMicrosecond(b) => b,
            Self::TimestampNanosecond(b) => b,
            Self::Utf8(b) => b,
            Self::Binary(b) => b,
        }
    }

    /// Number of rows appended so far, nulls included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builder().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the appended rows into an Arrow array.
    pub fn finish(&mut self) -> ArrayRef {
        self.builder_mut().finish()
    }
}

/// Time32 variants hold an `i32`; a valid time of day always fits.
fn narrow_time(value: &Value, unit: TimeUnit, target: &LogicalType) -> Result<i32, ValueError> {
    let units = convert::time_of_day(value, unit, target)?;
    i32::try_from(units).map_err(|_| convert::out_of_range(value, target))
}
