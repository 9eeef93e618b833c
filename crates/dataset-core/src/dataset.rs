//! Expected dataset documents.
//!
//! A dataset is a YAML mapping from table name to a list of rows, each row a
//! mapping from column name to value:
//!
//! ```yaml
//! employee:
//!   - id: 1
//!     name: Alice
//!     created_at: "2023-01-02 10:00:00"
//! department: []
//! ```
//!
//! Only the structure is checked here. Tables and columns keep the order in
//! which they are declared, so comparisons (and their diagnostics) walk the
//! document top to bottom.

use crate::types::{ColumnName, TableName};
use crate::values::{scalar_key, ExpectedRow, ExpectedValue};
use serde_yaml::Value as YamlValue;
use std::fs;
use std::path::Path;

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Error reading the dataset file
    #[error("Failed to read dataset file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The document parsed but does not have the dataset shape
    #[error("Malformed dataset at {location}: {reason}")]
    Malformed { location: String, reason: String },
}

impl DatasetError {
    fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        DatasetError::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Rows expected for a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedTable {
    /// Table name
    pub name: TableName,

    /// Rows, in document order
    pub rows: Vec<ExpectedRow>,
}

/// The expected state of the database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedDataset {
    tables: Vec<ExpectedTable>,
}

impl ExpectedDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a dataset from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, DatasetError> {
        let document: YamlValue = serde_yaml::from_str(yaml)?;
        Self::from_yaml_value(document)
    }

    /// Decode an already parsed YAML document.
    pub fn from_yaml_value(document: YamlValue) -> Result<Self, DatasetError> {
        let mapping = match document {
            YamlValue::Mapping(mapping) => mapping,
            // An empty document expects nothing
            YamlValue::Null => return Ok(Self::new()),
            other => {
                return Err(DatasetError::malformed(
                    "document root",
                    format!("expected a mapping of tables, found {}", kind(&other)),
                ))
            }
        };

        let mut dataset = Self::new();
        for (key, rows) in mapping {
            let name = scalar_key(key)
                .map(TableName::from)
                .map_err(|reason| DatasetError::malformed("document root", reason))?;
            let rows = decode_rows(&name, rows)?;
            dataset.push_table(name, rows);
        }
        Ok(dataset)
    }

    /// Append a table with its expected rows.
    pub fn push_table(&mut self, name: impl Into<TableName>, rows: Vec<ExpectedRow>) {
        self.tables.push(ExpectedTable {
            name: name.into(),
            rows,
        });
    }

    /// Builder-style variant of [`push_table`](Self::push_table).
    pub fn with_table(mut self, name: impl Into<TableName>, rows: Vec<ExpectedRow>) -> Self {
        self.push_table(name, rows);
        self
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&ExpectedTable> {
        self.tables.iter().find(|t| t.name.as_str() == name)
    }

    /// Iterate over tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &ExpectedTable> {
        self.tables.iter()
    }

    /// Get all table names in declaration order.
    pub fn table_names(&self) -> Vec<&TableName> {
        self.tables.iter().map(|t| &t.name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn decode_rows(table: &TableName, rows: YamlValue) -> Result<Vec<ExpectedRow>, DatasetError> {
    let items = match rows {
        YamlValue::Sequence(items) => items,
        YamlValue::Null => return Ok(Vec::new()),
        other => {
            return Err(DatasetError::malformed(
                format!("table '{table}'"),
                format!("expected a list of rows, found {}", kind(&other)),
            ))
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let location = format!("table '{table}' row {index}");
        let columns = match item {
            YamlValue::Mapping(columns) => columns,
            other => {
                return Err(DatasetError::malformed(
                    location,
                    format!("expected a mapping of columns, found {}", kind(&other)),
                ))
            }
        };

        let mut row = Vec::with_capacity(columns.len());
        for (key, value) in columns {
            let column = scalar_key(key)
                .map(ColumnName::from)
                .map_err(|reason| DatasetError::malformed(location.clone(), reason))?;
            let value = ExpectedValue::from_yaml(value).map_err(|reason| {
                DatasetError::malformed(format!("{location} column '{column}'"), reason)
            })?;
            row.push((column, value));
        }
        decoded.push(ExpectedRow::new(row));
    }
    Ok(decoded)
}

fn kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}
