//! Dataset comparator.

use crate::compare::{compare_values, CompareResult};
use crate::error::VerifyError;
use crate::query::build_queries;
use crate::report::{CompareOutcome, Diagnostic};
use crate::snapshot::{fetch_snapshot, ActualRow, QueryHandle, Snapshot};
use dataset_core::{CompareOptions, ExpectedDataset, ExpectedRow, TableName};
use tracing::{debug, info, warn};

/// Pair expected and actual rows by position.
///
/// Rows are only aligned when both sides have the same number of rows;
/// otherwise the row-count diagnostic is returned.
pub fn align_rows<'a>(
    table: &TableName,
    expected: &'a [ExpectedRow],
    actual: &'a [ActualRow],
) -> Result<Vec<(&'a ExpectedRow, &'a ActualRow)>, Diagnostic> {
    if expected.len() != actual.len() {
        return Err(Diagnostic::row_count(table, expected.len(), actual.len()));
    }
    Ok(expected.iter().zip(actual.iter()).collect())
}

/// Compare a dataset with a snapshot of the same tables.
///
/// Tables are visited in dataset order, columns in declaration order. The
/// first disagreement ends the comparison.
pub fn compare_dataset(
    dataset: &ExpectedDataset,
    snapshot: &Snapshot,
    options: &CompareOptions,
) -> Result<CompareOutcome, VerifyError> {
    for expected in dataset.tables() {
        let table = &expected.name;
        let actual = snapshot
            .get_table(table.as_str())
            .ok_or_else(|| VerifyError::query(table, "table missing from snapshot"))?;

        let pairs = match align_rows(table, &expected.rows, &actual.rows) {
            Ok(pairs) => pairs,
            Err(diagnostic) => {
                warn!("{diagnostic}");
                return Ok(CompareOutcome::Mismatched(diagnostic));
            }
        };

        for (row_index, (expected_row, actual_row)) in pairs.into_iter().enumerate() {
            for (column, expected_value) in expected_row.iter() {
                if options.is_ignored(table.as_str(), column.as_str()) {
                    continue;
                }

                let actual_value = actual_row.get(column.as_str()).ok_or_else(|| {
                    VerifyError::ColumnMissing {
                        table: table.clone(),
                        row: row_index,
                        column: column.clone(),
                    }
                })?;

                let result = compare_values(expected_value, actual_value).map_err(|source| {
                    VerifyError::TypeDecode {
                        table: table.clone(),
                        row: row_index,
                        column: column.clone(),
                        source,
                    }
                })?;

                if let CompareResult::Mismatch { expected, actual } = result {
                    let diagnostic = Diagnostic::value(table, row_index, column, expected, actual);
                    warn!("{diagnostic}");
                    return Ok(CompareOutcome::Mismatched(diagnostic));
                }
            }
        }

        debug!("Table {} matched ({} rows)", table, expected.rows.len());
    }

    Ok(CompareOutcome::Matched)
}

/// Verifies an expected dataset against a live database.
pub struct DatasetVerifier<'a> {
    dataset: &'a ExpectedDataset,
    options: &'a CompareOptions,
}

impl<'a> DatasetVerifier<'a> {
    pub fn new(dataset: &'a ExpectedDataset, options: &'a CompareOptions) -> Self {
        Self { dataset, options }
    }

    pub fn dataset(&self) -> &ExpectedDataset {
        self.dataset
    }

    /// Fetch the dataset's tables through `handle` and compare them.
    pub async fn verify<H>(&self, handle: &H) -> Result<CompareOutcome, VerifyError>
    where
        H: QueryHandle + ?Sized,
    {
        info!(
            "Starting comparison of {} tables",
            self.dataset.table_names().len()
        );

        let queries = build_queries(self.dataset, self.options);
        let snapshot = fetch_snapshot(handle, &queries).await?;
        let outcome = compare_dataset(self.dataset, &snapshot, self.options)?;

        info!("Comparison finished: {}", outcome);
        Ok(outcome)
    }
}
