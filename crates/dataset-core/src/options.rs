//! Per-table comparison options.

use crate::types::{ColumnName, TableName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Options for a single table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Columns for the `ORDER BY` clause, in order.
    ///
    /// Rows are aligned by position, so without ordering columns the
    /// comparison relies on the database's natural scan order.
    #[serde(default)]
    pub order_by: Vec<ColumnName>,

    /// Columns that are never compared.
    #[serde(default)]
    pub ignore: BTreeSet<ColumnName>,
}

/// Ordering and ignore configuration, keyed by table.
///
/// Tables without an entry are fetched in natural order and compared on
/// every expected column.
///
/// ```yaml
/// tables:
///   employee:
///     order_by: [id]
///     ignore: [updated_at]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareOptions {
    #[serde(default)]
    pub tables: BTreeMap<TableName, TableOptions>,
}

impl CompareOptions {
    /// Create options with no ordering and nothing ignored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering columns for a table, replacing any previous ones.
    pub fn order_by<I, C>(mut self, table: impl Into<TableName>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnName>,
    {
        self.tables.entry(table.into()).or_default().order_by =
            columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add columns to a table's ignore set.
    pub fn ignore<I, C>(mut self, table: impl Into<TableName>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnName>,
    {
        self.tables
            .entry(table.into())
            .or_default()
            .ignore
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Ordering columns for a table (empty when none are configured).
    pub fn order_by_columns(&self, table: &str) -> &[ColumnName] {
        self.tables
            .get(table)
            .map(|t| t.order_by.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a column is excluded from comparison.
    pub fn is_ignored(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|t| t.ignore.contains(column))
    }
}
