//! Comparison outcome types.

use dataset_core::{ColumnName, TableName};
use std::fmt;

/// What disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// The table has a different number of rows.
    RowCount,
    /// A column value differs.
    Value,
}

/// Details of the first disagreement found.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Table being compared.
    pub table: TableName,
    /// Row index, for value mismatches.
    pub row: Option<usize>,
    /// Column, for value mismatches.
    pub column: Option<ColumnName>,
    /// Expected value (or row count) in canonical form.
    pub expected: String,
    /// Actual value (or row count) in canonical form.
    pub actual: String,
    /// Mismatch kind.
    pub kind: MismatchKind,
}

impl Diagnostic {
    /// A row-count mismatch for a table.
    pub fn row_count(table: &TableName, expected: usize, actual: usize) -> Self {
        Self {
            table: table.clone(),
            row: None,
            column: None,
            expected: expected.to_string(),
            actual: actual.to_string(),
            kind: MismatchKind::RowCount,
        }
    }

    /// A value mismatch at a table/row/column.
    pub fn value(
        table: &TableName,
        row: usize,
        column: &ColumnName,
        expected: String,
        actual: String,
    ) -> Self {
        Self {
            table: table.clone(),
            row: Some(row),
            column: Some(column.clone()),
            expected,
            actual,
            kind: MismatchKind::Value,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MismatchKind::RowCount => write!(
                f,
                "table {}: expected {} rows, actual {} rows",
                self.table, self.expected, self.actual
            ),
            MismatchKind::Value => {
                write!(f, "table {}", self.table)?;
                if let Some(row) = self.row {
                    write!(f, " row {row}")?;
                }
                if let Some(column) = &self.column {
                    write!(f, " column {column}")?;
                }
                write!(f, ": expected {}, actual {}", self.expected, self.actual)
            }
        }
    }
}

/// Outcome of comparing a dataset with the database.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareOutcome {
    /// Every compared value agreed.
    Matched,
    /// The first disagreement found.
    Mismatched(Diagnostic),
}

impl CompareOutcome {
    /// Check if the comparison matched.
    pub fn matched(&self) -> bool {
        matches!(self, CompareOutcome::Matched)
    }

    /// The diagnostic of a mismatch.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            CompareOutcome::Matched => None,
            CompareOutcome::Mismatched(diagnostic) => Some(diagnostic),
        }
    }
}

impl fmt::Display for CompareOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOutcome::Matched => write!(f, "dataset matched"),
            CompareOutcome::Mismatched(diagnostic) => write!(f, "dataset mismatched: {diagnostic}"),
        }
    }
}
