//! Value representations for expected datasets.
//!
//! Dataset documents are loosely typed: a cell may hold a scalar, a list or
//! a nested mapping. `ExpectedValue` makes that explicit so the comparator
//! can pick a canonical form per column type instead of inspecting values
//! at runtime.

use crate::types::ColumnName;
use serde_yaml::Value as YamlValue;

/// A single expected cell value, decoded from the dataset document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedValue {
    /// Null / absent value (`~`, `null` or an empty cell)
    Null,

    /// Boolean value
    Bool(bool),

    /// Integer value
    Integer(i64),

    /// Floating point value (also used for integers beyond the i64 range)
    Float(f64),

    /// String value
    String(String),

    /// Nested sequence
    Sequence(Vec<ExpectedValue>),

    /// Nested mapping, in declaration order
    Mapping(Vec<(String, ExpectedValue)>),
}

impl ExpectedValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Decode a YAML node.
    ///
    /// Tags (`!foo value`) are dropped and the tagged value is used as is.
    /// Mapping keys must be scalars; they are kept as their textual form.
    pub fn from_yaml(value: YamlValue) -> Result<Self, String> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(b) => Ok(Self::Bool(b)),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(format!("unsupported number: {n}"))
                }
            }
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(items) => items
                .into_iter()
                .map(Self::from_yaml)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Sequence),
            YamlValue::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, value) in mapping {
                    entries.push((scalar_key(key)?, Self::from_yaml(value)?));
                }
                Ok(Self::Mapping(entries))
            }
            YamlValue::Tagged(tagged) => Self::from_yaml(tagged.value),
        }
    }
}

impl From<&str> for ExpectedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ExpectedValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for ExpectedValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ExpectedValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Textual form of a scalar mapping key.
pub(crate) fn scalar_key(key: YamlValue) -> Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Tagged(tagged) => scalar_key(tagged.value),
        YamlValue::Null => Err("mapping key must not be null".to_string()),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            Err("mapping key must be a scalar".to_string())
        }
    }
}

/// One expected row: column values in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedRow {
    columns: Vec<(ColumnName, ExpectedValue)>,
}

impl ExpectedRow {
    /// Create a row from column/value pairs.
    pub fn new(columns: Vec<(ColumnName, ExpectedValue)>) -> Self {
        Self { columns }
    }

    /// Start building a row column by column.
    pub fn builder() -> ExpectedRowBuilder {
        ExpectedRowBuilder {
            columns: Vec::new(),
        }
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&ExpectedValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.as_str() == column)
            .map(|(_, value)| value)
    }

    /// Iterate over columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &ExpectedValue)> {
        self.columns.iter().map(|(name, value)| (name, value))
    }

    /// Number of columns in this row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Builder for `ExpectedRow`.
pub struct ExpectedRowBuilder {
    columns: Vec<(ColumnName, ExpectedValue)>,
}

impl ExpectedRowBuilder {
    /// Add a column to the row.
    pub fn column(mut self, name: impl Into<ColumnName>, value: impl Into<ExpectedValue>) -> Self {
        self.columns.push((name.into(), value.into()));
        self
    }

    /// Add a null column to the row.
    pub fn null(mut self, name: impl Into<ColumnName>) -> Self {
        self.columns.push((name.into(), ExpectedValue::Null));
        self
    }

    /// Build the row.
    pub fn build(self) -> ExpectedRow {
        ExpectedRow {
            columns: self.columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(yaml: &str) -> ExpectedValue {
        ExpectedValue::from_yaml(serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode("~"), ExpectedValue::Null);
        assert_eq!(decode("true"), ExpectedValue::Bool(true));
        assert_eq!(decode("42"), ExpectedValue::Integer(42));
        assert_eq!(decode("-7"), ExpectedValue::Integer(-7));
        assert_eq!(decode("1.5"), ExpectedValue::Float(1.5));
        assert_eq!(decode("Alice"), ExpectedValue::String("Alice".to_string()));
        // Timestamps stay plain strings
        assert_eq!(
            decode("2023-01-02 10:00:00"),
            ExpectedValue::String("2023-01-02 10:00:00".to_string())
        );
    }

    #[test]
    fn test_decode_large_unsigned_as_float() {
        assert_eq!(
            decode("18446744073709551615"),
            ExpectedValue::Float(18446744073709551615.0)
        );
    }

    #[test]
    fn test_decode_nested_keeps_declaration_order() {
        let value = decode("{b: 2, a: [1, x]}");
        assert_eq!(
            value,
            ExpectedValue::Mapping(vec![
                ("b".to_string(), ExpectedValue::Integer(2)),
                (
                    "a".to_string(),
                    ExpectedValue::Sequence(vec![
                        ExpectedValue::Integer(1),
                        ExpectedValue::String("x".to_string()),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn test_decode_tagged_value() {
        assert_eq!(decode("!uuid abc"), ExpectedValue::String("abc".to_string()));
    }

    #[test]
    fn test_decode_rejects_complex_keys() {
        let yaml: YamlValue = serde_yaml::from_str("? [1, 2]\n: x").unwrap();
        assert!(ExpectedValue::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_row_builder() {
        let row = ExpectedRow::builder()
            .column("id", 1i64)
            .column("name", "Alice")
            .null("manager_id")
            .build();

        assert_eq!(row.len(), 3);
        assert_eq!(row.get("id"), Some(&ExpectedValue::Integer(1)));
        assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("Alice"));
        assert!(row.get("manager_id").is_some_and(|v| v.is_null()));
        assert_eq!(row.get("missing"), None);

        let names: Vec<&str> = row.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "manager_id"]);
    }
}
