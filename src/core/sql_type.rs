use serde::{Deserialize, Serialize};

/// SQL-level column type, numbered like `java.sql.Types` so that driver
/// metadata can be passed through without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum SqlType {
    // Numeric types
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Boolean,
    // Character types
    Char,
    Varchar,
    LongVarchar,
    NChar,
    NVarchar,
    LongNVarchar,
    Clob,
    NClob,
    // Binary types
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    // Date/Time types
    Date,
    Time,
    Timestamp,
    TimeWithTimezone,
    TimestampWithTimezone,
    // Special types
    Null,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Ref,
    Datalink,
    RowId,
    SqlXml,
    RefCursor,
    /// Vendor-specific code with no standard meaning
    Unknown(i32),
}

impl SqlType {
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -7 => Self::Bit,
            -6 => Self::TinyInt,
            5 => Self::SmallInt,
            4 => Self::Integer,
            -5 => Self::BigInt,
            6 => Self::Float,
            7 => Self::Real,
            8 => Self::Double,
            2 => Self::Numeric,
            3 => Self::Decimal,
            16 => Self::Boolean,
            1 => Self::Char,
            12 => Self::Varchar,
            -1 => Self::LongVarchar,
            -15 => Self::NChar,
            -9 => Self::NVarchar,
            -16 => Self::LongNVarchar,
            2005 => Self::Clob,
            2011 => Self::NClob,
            -2 => Self::Binary,
            -3 => Self::VarBinary,
            -4 => Self::LongVarBinary,
            2004 => Self::Blob,
            91 => Self::Date,
            92 => Self::Time,
            93 => Self::Timestamp,
            2013 => Self::TimeWithTimezone,
            2014 => Self::TimestampWithTimezone,
            0 => Self::Null,
            1111 => Self::Other,
            2000 => Self::JavaObject,
            2001 => Self::Distinct,
            2002 => Self::Struct,
            2003 => Self::Array,
            2006 => Self::Ref,
            70 => Self::Datalink,
            -8 => Self::RowId,
            2009 => Self::SqlXml,
            2012 => Self::RefCursor,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Float => 6,
            Self::Real => 7,
            Self::Double => 8,
            Self::Numeric => 2,
            Self::Decimal => 3,
            Self::Boolean => 16,
            Self::Char => 1,
            Self::Varchar => 12,
            Self::LongVarchar => -1,
            Self::NChar => -15,
            Self::NVarchar => -9,
            Self::LongNVarchar => -16,
            Self::Clob => 2005,
            Self::NClob => 2011,
            Self::Binary => -2,
            Self::VarBinary => -3,
            Self::LongVarBinary => -4,
            Self::Blob => 2004,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
            Self::TimeWithTimezone => 2013,
            Self::TimestampWithTimezone => 2014,
            Self::Null => 0,
            Self::Other => 1111,
            Self::JavaObject => 2000,
            Self::Distinct => 2001,
            Self::Struct => 2002,
            Self::Array => 2003,
            Self::Ref => 2006,
            Self::Datalink => 70,
            Self::RowId => -8,
            Self::SqlXml => 2009,
            Self::RefCursor => 2012,
            Self::Unknown(code) => *code,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Boolean => "BOOLEAN",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::LongVarchar => "LONGVARCHAR",
            Self::NChar => "NCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::LongNVarchar => "LONGNVARCHAR",
            Self::Clob => "CLOB",
            Self::NClob => "NCLOB",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::LongVarBinary => "LONGVARBINARY",
            Self::Blob => "BLOB",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimeWithTimezone => "TIME WITH TIME ZONE",
            Self::TimestampWithTimezone => "TIMESTAMP WITH TIME ZONE",
            Self::Null => "NULL",
            Self::Other => "OTHER",
            Self::JavaObject => "JAVA_OBJECT",
            Self::Distinct => "DISTINCT",
            Self::Struct => "STRUCT",
            Self::Array => "ARRAY",
            Self::Ref => "REF",
            Self::Datalink => "DATALINK",
            Self::RowId => "ROWID",
            Self::SqlXml => "SQLXML",
            Self::RefCursor => "REF_CURSOR",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<i32> for SqlType {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<SqlType> for i32 {
    fn from(sql_type: SqlType) -> Self {
        sql_type.code()
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "UNKNOWN({code})"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
