//! Error types for dataset verification.
//!
//! These are infrastructure or dataset-drift failures. A dataset that simply
//! disagrees with the database is not an error; it is reported as a
//! [`CompareOutcome::Mismatched`](crate::CompareOutcome::Mismatched).

use crate::compare::DecodeError;
use dataset_core::{ColumnName, TableName};
use thiserror::Error;

/// Errors that can occur during verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Fetching a table failed.
    #[error("Query failed for table {table}: {source}")]
    Query {
        table: TableName,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A compared column does not exist in the fetched row.
    #[error("Column {column} not found in table {table} row {row}")]
    ColumnMissing {
        table: TableName,
        row: usize,
        column: ColumnName,
    },

    /// An expected value could not be decoded under its column's type.
    #[error("Invalid expected value for {table}.{column} in row {row}: {source}")]
    TypeDecode {
        table: TableName,
        row: usize,
        column: ColumnName,
        #[source]
        source: DecodeError,
    },
}

impl VerifyError {
    /// Create a Query error for a table.
    pub fn query(
        table: &TableName,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        VerifyError::Query {
            table: table.clone(),
            source: source.into(),
        }
    }
}
