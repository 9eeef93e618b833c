//! Fetching typed row snapshots of the expected tables.

use crate::error::VerifyError;
use crate::query::TableQuery;
use async_trait::async_trait;
use dataset_core::{ColumnName, TableName};
use postgresql_types::{PostgreSQLRawValue, PostgreSQLValueWithSchema, Type};
use std::collections::HashMap;
use tracing::debug;

/// Boxed error returned by a [`QueryHandle`].
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Name and type tag of a result column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: ColumnName,
    pub pg_type: Type,
}

impl ColumnMeta {
    pub fn new(name: impl Into<ColumnName>, pg_type: Type) -> Self {
        Self {
            name: name.into(),
            pg_type,
        }
    }
}

/// Rows returned by one statement, positionally aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Vec<PostgreSQLRawValue>>,
}

/// A live handle that can run retrieval statements.
///
/// Implemented for [`tokio_postgres::Client`]; tests supply in-memory handles.
#[async_trait]
pub trait QueryHandle: Send + Sync {
    /// Run a statement and return all of its rows.
    async fn fetch_result_set(&self, statement: &str) -> Result<ResultSet, FetchError>;
}

#[async_trait]
impl QueryHandle for tokio_postgres::Client {
    async fn fetch_result_set(&self, statement: &str) -> Result<ResultSet, FetchError> {
        let rows = self.query(statement, &[]).await?;

        // Column metadata comes from the first row; an empty result needs none.
        let columns = match rows.first() {
            Some(first) => first
                .columns()
                .iter()
                .map(|c| ColumnMeta::new(c.name(), c.type_().clone()))
                .collect(),
            None => Vec::new(),
        };

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut raw_row = Vec::with_capacity(columns.len());
            for index in 0..row.len() {
                raw_row.push(PostgreSQLValueWithSchema::from_row(row, index)?.value);
            }
            values.push(raw_row);
        }

        Ok(ResultSet {
            columns,
            rows: values,
        })
    }
}

/// One fetched row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActualRow {
    values: HashMap<ColumnName, PostgreSQLValueWithSchema>,
}

impl ActualRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value.
    pub fn with(mut self, column: impl Into<ColumnName>, value: PostgreSQLValueWithSchema) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&PostgreSQLValueWithSchema> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fetched rows of one table, in result order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub table: TableName,
    pub rows: Vec<ActualRow>,
}

impl TableSnapshot {
    pub fn new(table: impl Into<TableName>, rows: Vec<ActualRow>) -> Self {
        Self {
            table: table.into(),
            rows,
        }
    }

    /// Zip each raw row with the column metadata.
    pub fn from_result_set(table: &TableName, result: ResultSet) -> Result<Self, VerifyError> {
        let ResultSet { columns, rows } = result;
        let mut actual_rows = Vec::with_capacity(rows.len());

        for (index, raw_row) in rows.into_iter().enumerate() {
            if raw_row.len() != columns.len() {
                return Err(VerifyError::query(
                    table,
                    format!(
                        "row {index} has {} values but the result has {} columns",
                        raw_row.len(),
                        columns.len()
                    ),
                ));
            }
            let values = columns
                .iter()
                .zip(raw_row)
                .map(|(meta, value)| {
                    (
                        meta.name.clone(),
                        PostgreSQLValueWithSchema::new(meta.pg_type.clone(), value),
                    )
                })
                .collect();
            actual_rows.push(ActualRow { values });
        }

        Ok(Self {
            table: table.clone(),
            rows: actual_rows,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Fetched rows of every expected table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    tables: Vec<TableSnapshot>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_table(&mut self, table: TableSnapshot) {
        self.tables.push(table);
    }

    pub fn with_table(mut self, table: TableSnapshot) -> Self {
        self.push_table(table);
        self
    }

    pub fn get_table(&self, name: &str) -> Option<&TableSnapshot> {
        self.tables.iter().find(|t| t.table.as_str() == name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSnapshot> {
        self.tables.iter()
    }
}

/// Run every query in order over one handle.
///
/// The first failing statement aborts the fetch; tables fetched so far are
/// dropped.
pub async fn fetch_snapshot<H>(handle: &H, queries: &[TableQuery]) -> Result<Snapshot, VerifyError>
where
    H: QueryHandle + ?Sized,
{
    let mut snapshot = Snapshot::new();

    for query in queries {
        debug!("Fetching table {}: {}", query.table, query.statement);
        let result = handle
            .fetch_result_set(&query.statement)
            .await
            .map_err(|e| VerifyError::query(&query.table, e))?;
        let table = TableSnapshot::from_result_set(&query.table, result)?;
        debug!("Fetched {} rows from {}", table.row_count(), query.table);
        snapshot.push_table(table);
    }

    Ok(snapshot)
}
