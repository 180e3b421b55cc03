//! Column data-type taxonomy
//!
//! A closed set of MySQL column types keyed by the normalized type name, each
//! carrying the canonical keyword to emit and its width-rendering policy.
//! Type names are validated here once, at load time, so rendering never has
//! to deal with an unmapped type.

use crate::error::{Error, Result};

/// How a column type renders its width suffix in DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthPolicy {
    /// No width suffix: text/blob variants, temporal types and JSON.
    /// These types also never carry `UNSIGNED` or `AUTO_INCREMENT`.
    NoWidth,
    /// Always rendered as `(1)`: BIT and BOOLEAN.
    FixedOne,
    /// Integer family, rendered as `(size + 1)`.
    ///
    /// The off-by-one reproduces the display-width convention of the driver
    /// metadata this tool has always been generated against. Changing it
    /// would change the emitted DDL for every integer column.
    IntegerWidth,
    /// Rendered as `(size,decimal_digits)`: DECIMAL, FLOAT, DOUBLE, REAL.
    PrecisionScale,
    /// Everything else, rendered as `(size)`.
    DefaultWidth,
}

/// Canonical column data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Bit,
    Boolean,
    Decimal,
    Float,
    Double,
    Real,
    Char,
    NChar,
    VarChar,
    NVarChar,
    Binary,
    VarBinary,
    TinyText,
    Text,
    MediumText,
    LongText,
    NText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Date,
    DateTime,
    Time,
    Timestamp,
    Year,
    Json,
}

impl ColumnType {
    /// Look up the taxonomy entry for a normalized (uppercase, first-token)
    /// type name. Unknown names are fatal for the column.
    pub fn from_name(column: &str, type_name: &str) -> Result<Self> {
        let column_type = match type_name {
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "MEDIUMINT" => Self::MediumInt,
            "INT" | "INTEGER" => Self::Int,
            "BIGINT" => Self::BigInt,
            "BIT" => Self::Bit,
            "BOOLEAN" | "BOOL" => Self::Boolean,
            "DECIMAL" | "NUMERIC" => Self::Decimal,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "REAL" => Self::Real,
            "CHAR" => Self::Char,
            "NCHAR" => Self::NChar,
            "VARCHAR" => Self::VarChar,
            "NVARCHAR" => Self::NVarChar,
            "BINARY" => Self::Binary,
            "VARBINARY" => Self::VarBinary,
            "TINYTEXT" => Self::TinyText,
            "TEXT" => Self::Text,
            "MEDIUMTEXT" => Self::MediumText,
            "LONGTEXT" => Self::LongText,
            "NTEXT" => Self::NText,
            "TINYBLOB" => Self::TinyBlob,
            "BLOB" => Self::Blob,
            "MEDIUMBLOB" => Self::MediumBlob,
            "LONGBLOB" => Self::LongBlob,
            "DATE" => Self::Date,
            "DATETIME" => Self::DateTime,
            "TIME" => Self::Time,
            "TIMESTAMP" => Self::Timestamp,
            "YEAR" => Self::Year,
            "JSON" => Self::Json,
            _ => {
                return Err(Error::UnknownColumnType {
                    column: column.to_string(),
                    type_name: type_name.to_string(),
                })
            }
        };
        Ok(column_type)
    }

    /// The canonical keyword emitted in DDL.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::MediumInt => "MEDIUMINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Bit => "BIT",
            Self::Boolean => "BOOLEAN",
            Self::Decimal => "DECIMAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Real => "REAL",
            Self::Char => "CHAR",
            Self::NChar => "NCHAR",
            Self::VarChar => "VARCHAR",
            Self::NVarChar => "NVARCHAR",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::TinyText => "TINYTEXT",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
            Self::NText => "NTEXT",
            Self::TinyBlob => "TINYBLOB",
            Self::Blob => "BLOB",
            Self::MediumBlob => "MEDIUMBLOB",
            Self::LongBlob => "LONGBLOB",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Year => "YEAR",
            Self::Json => "JSON",
        }
    }

    /// The width-rendering policy for this type.
    pub fn width_policy(&self) -> WidthPolicy {
        match self {
            Self::TinyText
            | Self::Text
            | Self::MediumText
            | Self::LongText
            | Self::NText
            | Self::TinyBlob
            | Self::Blob
            | Self::MediumBlob
            | Self::LongBlob
            | Self::Date
            | Self::DateTime
            | Self::Time
            | Self::Timestamp
            | Self::Year
            | Self::Json => WidthPolicy::NoWidth,
            Self::Bit | Self::Boolean => WidthPolicy::FixedOne,
            Self::TinyInt | Self::SmallInt | Self::MediumInt | Self::Int | Self::BigInt => {
                WidthPolicy::IntegerWidth
            }
            Self::Decimal | Self::Float | Self::Double | Self::Real => WidthPolicy::PrecisionScale,
            Self::Char
            | Self::NChar
            | Self::VarChar
            | Self::NVarChar
            | Self::Binary
            | Self::VarBinary => WidthPolicy::DefaultWidth,
        }
    }
}
