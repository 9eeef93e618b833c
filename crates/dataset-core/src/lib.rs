//! Core types for db-comparer.
//!
//! This crate provides the expected side of a comparison:
//!
//! - [`TableName`] / [`ColumnName`] - Case-sensitive identifiers
//! - [`ExpectedValue`] - Tagged, loosely typed cell values
//! - [`ExpectedRow`] - Column values in declaration order
//! - [`ExpectedDataset`] - Tables and rows loaded from YAML
//! - [`CompareOptions`] - Per-table ordering and ignore sets
//!
//! # Example
//!
//! ```rust
//! use dataset_core::{CompareOptions, ExpectedDataset, ExpectedValue};
//!
//! let dataset = ExpectedDataset::from_yaml("employee:\n  - id: 1\n    name: Alice\n").unwrap();
//! let employee = dataset.get_table("employee").unwrap();
//! assert_eq!(employee.rows[0].get("id"), Some(&ExpectedValue::Integer(1)));
//!
//! let options = CompareOptions::new().order_by("employee", ["id"]);
//! assert_eq!(options.order_by_columns("employee").len(), 1);
//! ```

pub mod dataset;
pub mod options;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use dataset::{DatasetError, ExpectedDataset, ExpectedTable};
pub use options::{CompareOptions, TableOptions};
pub use types::{ColumnName, TableName};
pub use values::{ExpectedRow, ExpectedRowBuilder, ExpectedValue};
