//! Dataset verifier for db-comparer.
//!
//! This crate checks that the live contents of PostgreSQL tables match an
//! [`ExpectedDataset`](dataset_core::ExpectedDataset). Each expected table is
//! fetched with one `SELECT`, row counts are checked, and rows are then
//! compared column by column using the column's type to decide what counts
//! as equal.
//!
//! # Example
//!
//! ```ignore
//! use dataset_core::{CompareOptions, ExpectedDataset};
//! use dataset_verify::DatasetVerifier;
//!
//! let dataset = ExpectedDataset::from_file("expected.yaml")?;
//! let options = CompareOptions::new().order_by("employee", ["id"]);
//! let verifier = DatasetVerifier::new(&dataset, &options);
//!
//! let outcome = verifier.verify(&client).await?;
//! assert!(outcome.matched(), "{outcome}");
//! ```

pub mod compare;
pub mod error;
pub mod query;
pub mod render;
pub mod report;
pub mod snapshot;
pub mod verifier;

pub use compare::{compare_values, temporal_renderings, CompareResult, DecodeError};
pub use error::VerifyError;
pub use query::{build_queries, build_query, TableQuery};
pub use render::canonical_json;
pub use report::{CompareOutcome, Diagnostic, MismatchKind};
pub use snapshot::{
    fetch_snapshot, ActualRow, ColumnMeta, FetchError, QueryHandle, ResultSet, Snapshot,
    TableSnapshot,
};
pub use verifier::{align_rows, compare_dataset, DatasetVerifier};
