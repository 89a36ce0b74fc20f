use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};

/// Target column representation. One variant per buffer layout the
/// materializer knows how to fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    Decimal { precision: u8, scale: i8 },
    /// Days since 1970-01-01
    Date,
    /// Time of day since midnight
    Time(TimeUnit),
    /// Instant since the Unix epoch, UTC-normalized
    Timestamp { unit: TimeUnit, timezone: Option<Arc<str>> },
    Utf8,
    Binary,
}

impl LogicalType {
    #[must_use]
    pub fn to_arrow(&self) -> DataType {
        match self {
            Self::Int8 => DataType::Int8,
            Self::Int16 => DataType::Int16,
            Self::Int32 => DataType::Int32,
            Self::Int64 => DataType::Int64,
            Self::Float32 => DataType::Float32,
            Self::Float64 => DataType::Float64,
            Self::Boolean => DataType::Boolean,
            Self::Decimal { precision, scale } => DataType::Decimal128(*precision, *scale),
            Self::Date => DataType::Date32,
            Self::Time(unit @ (TimeUnit::Second | TimeUnit::Millisecond)) => DataType::Time32(*unit),
            Self::Time(unit) => DataType::Time64(*unit),
            Self::Timestamp { unit, timezone } => DataType::Timestamp(*unit, timezone.clone()),
            Self::Utf8 => DataType::Utf8,
            Self::Binary => DataType::Binary,
        }
    }

    #[must_use]
    pub const fn precision(&self) -> Option<u8> {
        match self {
            Self::Decimal { precision, .. } => Some(*precision),
            _ => None,
        }
    }

    #[must_use]
    pub const fn scale(&self) -> Option<i8> {
        match self {
            Self::Decimal { scale, .. } => Some(*scale),
            _ => None,
        }
    }

    #[must_use]
    pub const fn time_unit(&self) -> Option<TimeUnit> {
        match self {
            Self::Time(unit) | Self::Timestamp { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        match self {
            Self::Timestamp { timezone, .. } => timezone.as_deref(),
            _ => None,
        }
    }
}

const fn unit_name(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Second => "s",
        TimeUnit::Millisecond => "ms",
        TimeUnit::Microsecond => "us",
        TimeUnit::Nanosecond => "ns",
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int8 => write!(f, "int8"),
            Self::Int16 => write!(f, "int16"),
            Self::Int32 => write!(f, "int32"),
            Self::Int64 => write!(f, "int64"),
            Self::Float32 => write!(f, "float32"),
            Self::Float64 => write!(f, "float64"),
            Self::Boolean => write!(f, "boolean"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision}, {scale})"),
            Self::Date => write!(f, "date"),
            Self::Time(unit) => write!(f, "time({})", unit_name(*unit)),
            Self::Timestamp { unit, timezone: Some(tz) } => {
                write!(f, "timestamp({}, {tz})", unit_name(*unit))
            }
            Self::Timestamp { unit, timezone: None } => write!(f, "timestamp({})", unit_name(*unit)),
            Self::Utf8 => write!(f, "utf8"),
            Self::Binary => write!(f, "binary"),
        }
    }
}

/// One output field and the source column it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
    /// Position of the value inside each source row
    pub source_index: usize,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn to_field(&self) -> Field {
        Field::new(&self.name, self.logical_type.to_arrow(), self.nullable)
    }
}

/// Ordered field descriptors plus the equivalent Arrow schema.
///
/// Computed once per query; clones share the same descriptors.
#[derive(Debug, Clone)]
pub struct ColumnarSchema {
    descriptors: Arc<[ColumnDescriptor]>,
    arrow: SchemaRef,
}

impl ColumnarSchema {
    #[must_use]
    pub fn new(descriptors: Vec<ColumnDescriptor>) -> Self {
        let fields: Vec<Field> = descriptors.iter().map(ColumnDescriptor::to_field).collect();
        Self {
            descriptors: descriptors.into(),
            arrow: Arc::new(Schema::new(fields)),
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.descriptors.get(index)
    }

    #[must_use]
    pub fn arrow_schema(&self) -> SchemaRef {
        Arc::clone(&self.arrow)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl PartialEq for ColumnarSchema {
    fn eq(&self, other: &Self) -> bool {
        self.descriptors == other.descriptors
    }
}
