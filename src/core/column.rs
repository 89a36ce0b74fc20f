use serde::{Deserialize, Serialize};
use super::sql_type::SqlType;

/// Per-column result metadata, as a driver reports it before the first row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub sql_type: SqlType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default = "default_true")]
    pub signed: bool,
    /// Declared precision for NUMERIC/DECIMAL
    #[serde(default)]
    pub precision: Option<u8>,
    /// Declared scale for NUMERIC/DECIMAL, fractional second digits for TIME/TIMESTAMP
    #[serde(default)]
    pub scale: Option<i8>,
    /// Fallbacks when precision/scale are not declared
    #[serde(default)]
    pub column_size: Option<u32>,
    #[serde(default)]
    pub decimal_digits: Option<i8>,
    /// Timezone name or offset, e.g. "UTC" or "+02:00"
    #[serde(default)]
    pub timezone: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl ColumnMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            nullable: true,
            signed: true,
            precision: None,
            scale: None,
            column_size: None,
            decimal_digits: None,
            timezone: None,
        }
    }

    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub const fn unsigned(mut self) -> Self {
        self.signed = false;
        self
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: u8, scale: i8) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: i8) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub const fn with_column_size(mut self, column_size: u32, decimal_digits: i8) -> Self {
        self.column_size = Some(column_size);
        self.decimal_digits = Some(decimal_digits);
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}
