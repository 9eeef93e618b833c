//! Errors returned by [`DbComparer`](crate::DbComparer).
//!
//! Row-count and value disagreements are not errors; they come back as
//! [`CompareOutcome::Mismatched`](dataset_verify::CompareOutcome::Mismatched).

use dataset_core::{ColumnName, DatasetError, TableName};
use dataset_verify::{DecodeError, VerifyError};
use thiserror::Error;

/// Infrastructure and dataset-drift failures of a comparison.
#[derive(Error, Debug)]
pub enum CompareError {
    /// The expected dataset could not be read.
    #[error("Failed to load dataset: {0}")]
    Load(#[from] DatasetError),

    /// No handle could be acquired from the connection factory.
    #[error("Failed to connect: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

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

    /// Configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<VerifyError> for CompareError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::Query { table, source } => CompareError::Query { table, source },
            VerifyError::ColumnMissing { table, row, column } => {
                CompareError::ColumnMissing { table, row, column }
            }
            VerifyError::TypeDecode {
                table,
                row,
                column,
                source,
            } => CompareError::TypeDecode {
                table,
                row,
                column,
                source,
            },
        }
    }
}
