//! Retrieval statements for expected tables.
//!
//! Table and column names are inserted verbatim. They come from the dataset
//! and the compare options, which are trusted; sanitizing untrusted input is
//! up to the caller.

use dataset_core::{ColumnName, CompareOptions, ExpectedDataset, TableName};

/// The statement used to fetch one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// Table name
    pub table: TableName,
    /// `SELECT` statement for the table
    pub statement: String,
}

/// Build `SELECT * FROM <table>`, ordered by `order_by` when it is non-empty.
pub fn build_query(table: &TableName, order_by: &[ColumnName]) -> String {
    let mut query = format!("SELECT * FROM {table}");
    if !order_by.is_empty() {
        let columns: Vec<&str> = order_by.iter().map(|c| c.as_str()).collect();
        query.push_str(" ORDER BY ");
        query.push_str(&columns.join(", "));
    }
    query
}

/// Build one query per dataset table, in dataset order.
pub fn build_queries(dataset: &ExpectedDataset, options: &CompareOptions) -> Vec<TableQuery> {
    dataset
        .tables()
        .map(|table| TableQuery {
            table: table.name.clone(),
            statement: build_query(&table.name, options.order_by_columns(table.name.as_str())),
        })
        .collect()
}
