//! Reverse conversion: PostgreSQL row → typed raw values
//!
//! This module reads column values out of `tokio_postgres` rows, keeping
//! each value next to the column's type tag so that comparisons can pick a
//! type-specific canonical form later.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres_types::{FromSql, Type};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio_postgres::Row;
use uuid::Uuid;

/// Errors that can occur while reading a PostgreSQL value.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The driver could not decode the column
    #[error("Failed to decode column {column} ({pg_type}): {source}")]
    Decode {
        column: String,
        pg_type: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// The column index is outside the row
    #[error("Column index {0} out of range")]
    ColumnIndex(usize),
}

/// PostgreSQL value with schema information.
///
/// Pairs a raw value with the type tag reported by the server for its
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct PostgreSQLValueWithSchema {
    /// The PostgreSQL column type
    pub pg_type: Type,
    /// The raw value
    pub value: PostgreSQLRawValue,
}

/// Raw value from PostgreSQL.
#[derive(Debug, Clone, PartialEq)]
pub enum PostgreSQLRawValue {
    /// Null value
    Null,
    /// Boolean
    Bool(bool),
    /// 16-bit integer
    Int16(i16),
    /// 32-bit integer
    Int32(i32),
    /// 64-bit integer
    Int64(i64),
    /// 32-bit float
    Float32(f32),
    /// 64-bit float
    Float64(f64),
    /// Decimal
    Decimal(Decimal),
    /// Text/string
    Text(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// UUID
    Uuid(Uuid),
    /// Date
    Date(NaiveDate),
    /// Time
    Time(NaiveTime),
    /// Timestamp (no timezone)
    Timestamp(NaiveDateTime),
    /// Timestamp with timezone
    TimestampTz(DateTime<Utc>),
    /// JSON value
    Json(serde_json::Value),
    /// One-dimensional array
    Array(Vec<PostgreSQLRawValue>),
}

impl PostgreSQLRawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl PostgreSQLValueWithSchema {
    /// Create a new PostgreSQLValueWithSchema.
    pub fn new(pg_type: Type, value: PostgreSQLRawValue) -> Self {
        Self { pg_type, value }
    }

    /// Create a NULL of the given column type.
    pub fn null(pg_type: Type) -> Self {
        Self::new(pg_type, PostgreSQLRawValue::Null)
    }

    /// Create a BOOL value.
    pub fn bool(value: bool) -> Self {
        Self::new(Type::BOOL, PostgreSQLRawValue::Bool(value))
    }

    /// Create an INT4 value.
    pub fn int4(value: i32) -> Self {
        Self::new(Type::INT4, PostgreSQLRawValue::Int32(value))
    }

    /// Create an INT8 value.
    pub fn int8(value: i64) -> Self {
        Self::new(Type::INT8, PostgreSQLRawValue::Int64(value))
    }

    /// Create a FLOAT8 value.
    pub fn float8(value: f64) -> Self {
        Self::new(Type::FLOAT8, PostgreSQLRawValue::Float64(value))
    }

    /// Create a TEXT value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(Type::TEXT, PostgreSQLRawValue::Text(value.into()))
    }

    /// Create a UUID value.
    pub fn uuid(value: Uuid) -> Self {
        Self::new(Type::UUID, PostgreSQLRawValue::Uuid(value))
    }

    /// Create a TIMESTAMP value.
    pub fn timestamp(value: NaiveDateTime) -> Self {
        Self::new(Type::TIMESTAMP, PostgreSQLRawValue::Timestamp(value))
    }

    /// Create a TIMESTAMPTZ value.
    pub fn timestamptz(value: DateTime<Utc>) -> Self {
        Self::new(Type::TIMESTAMPTZ, PostgreSQLRawValue::TimestampTz(value))
    }

    /// Create a JSONB value.
    pub fn jsonb(value: serde_json::Value) -> Self {
        Self::new(Type::JSONB, PostgreSQLRawValue::Json(value))
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Read the value at `index` from a row, using the column's type.
    pub fn from_row(row: &Row, index: usize) -> Result<Self, ConversionError> {
        let column = row
            .columns()
            .get(index)
            .ok_or(ConversionError::ColumnIndex(index))?;
        let pg_type = column.type_().clone();
        let value = convert_postgres_value(row, index, &pg_type).map_err(|source| {
            ConversionError::Decode {
                column: column.name().to_string(),
                pg_type: pg_type.to_string(),
                source,
            }
        })?;
        Ok(Self { pg_type, value })
    }
}

/// Convert a PostgreSQL value to a raw value based on its column type.
///
/// Types without an arm here are read as text when the driver allows it.
/// Anything else, including arrays of such types, is kept as its binary
/// wire bytes and compared as `\x...` hex.
fn convert_postgres_value(
    row: &Row,
    index: usize,
    pg_type: &Type,
) -> Result<PostgreSQLRawValue, tokio_postgres::Error> {
    use PostgreSQLRawValue as Raw;

    match *pg_type {
        Type::BOOL => scalar(row, index, Raw::Bool),
        Type::INT2 => scalar(row, index, Raw::Int16),
        Type::INT4 => scalar(row, index, Raw::Int32),
        Type::INT8 => scalar(row, index, Raw::Int64),
        Type::OID => scalar(row, index, |oid: u32| Raw::Int64(oid as i64)),
        Type::FLOAT4 => scalar(row, index, Raw::Float32),
        Type::FLOAT8 => scalar(row, index, Raw::Float64),
        Type::NUMERIC => scalar(row, index, Raw::Decimal),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => scalar(row, index, Raw::Text),
        Type::BYTEA => scalar(row, index, Raw::Bytes),
        Type::UUID => scalar(row, index, Raw::Uuid),
        Type::DATE => scalar(row, index, Raw::Date),
        Type::TIME => scalar(row, index, Raw::Time),
        Type::TIMESTAMP => scalar(row, index, Raw::Timestamp),
        Type::TIMESTAMPTZ => scalar(row, index, Raw::TimestampTz),
        Type::JSON | Type::JSONB => scalar(row, index, Raw::Json),
        Type::BOOL_ARRAY => array(row, index, Raw::Bool),
        Type::INT2_ARRAY => array(row, index, Raw::Int16),
        Type::INT4_ARRAY => array(row, index, Raw::Int32),
        Type::INT8_ARRAY => array(row, index, Raw::Int64),
        Type::FLOAT4_ARRAY => array(row, index, Raw::Float32),
        Type::FLOAT8_ARRAY => array(row, index, Raw::Float64),
        Type::NUMERIC_ARRAY => array(row, index, Raw::Decimal),
        Type::TEXT_ARRAY | Type::VARCHAR_ARRAY | Type::BPCHAR_ARRAY => {
            array(row, index, Raw::Text)
        }
        Type::UUID_ARRAY => array(row, index, Raw::Uuid),
        Type::BYTEA_ARRAY => array(row, index, Raw::Bytes),
        Type::DATE_ARRAY => array(row, index, Raw::Date),
        Type::TIME_ARRAY => array(row, index, Raw::Time),
        Type::TIMESTAMP_ARRAY => array(row, index, Raw::Timestamp),
        Type::TIMESTAMPTZ_ARRAY => array(row, index, Raw::TimestampTz),
        Type::JSON_ARRAY | Type::JSONB_ARRAY => array(row, index, Raw::Json),
        _ => {
            // For other types (enums, citext, inet, ...), try text first
            if let Ok(value) = row.try_get::<_, Option<String>>(index) {
                return Ok(value.map(Raw::Text).unwrap_or(Raw::Null));
            }
            scalar(row, index, |raw: RawBytes| match String::from_utf8(raw.0) {
                Ok(text) => Raw::Text(text),
                Err(e) => Raw::Bytes(e.into_bytes()),
            })
        }
    }
}

fn scalar<'a, T, F>(
    row: &'a Row,
    index: usize,
    wrap: F,
) -> Result<PostgreSQLRawValue, tokio_postgres::Error>
where
    T: FromSql<'a>,
    F: FnOnce(T) -> PostgreSQLRawValue,
{
    Ok(row
        .try_get::<_, Option<T>>(index)?
        .map(wrap)
        .unwrap_or(PostgreSQLRawValue::Null))
}

fn array<'a, T, F>(
    row: &'a Row,
    index: usize,
    wrap: F,
) -> Result<PostgreSQLRawValue, tokio_postgres::Error>
where
    T: FromSql<'a>,
    F: Fn(T) -> PostgreSQLRawValue,
{
    Ok(match row.try_get::<_, Option<Vec<Option<T>>>>(index)? {
        Some(items) => PostgreSQLRawValue::Array(
            items
                .into_iter()
                .map(|item| item.map(&wrap).unwrap_or(PostgreSQLRawValue::Null))
                .collect(),
        ),
        None => PostgreSQLRawValue::Null,
    })
}

/// Undecoded wire bytes of a column whose type has no dedicated decoder.
struct RawBytes(Vec<u8>);

impl<'a> FromSql<'a> for RawBytes {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(RawBytes(raw.to_vec()))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
