//! PostgreSQL values for db-comparer.
//!
//! This crate reads values out of `tokio-postgres` rows together with their
//! column type, and classifies column types for comparison.
//!
//! # Modules
//!
//! - [`reverse`] - PostgreSQL row → typed raw value conversion
//! - [`class`] - Column type → comparison class
//!
//! # Example
//!
//! ```ignore
//! use postgresql_types::{PostgreSQLValueWithSchema, TypeClass};
//!
//! let rows = client.query("SELECT * FROM employee", &[]).await?;
//! let value = PostgreSQLValueWithSchema::from_row(&rows[0], 0)?;
//! assert_eq!(TypeClass::of(&value.pg_type), TypeClass::Scalar);
//! ```

pub mod class;
pub mod reverse;

pub use class::TypeClass;
pub use postgres_types::Type;
pub use reverse::{ConversionError, PostgreSQLRawValue, PostgreSQLValueWithSchema};
