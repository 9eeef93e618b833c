//! Textual renderings shared by both sides of a comparison.
//!
//! Expected and actual values are rendered by the same rules so that equal
//! data produces equal text:
//!
//! - null: `null`
//! - booleans: `true` / `false`
//! - integers: decimal; floats: shortest round-trip form (`1.5`, `2`)
//! - decimals: trailing zeros removed (`12.50` → `12.5`)
//! - bytes: `\x` followed by lowercase hex
//! - sequences: `[a, b]`; mappings: `{k: v}`
//! - JSON: [`canonical_json`]

use chrono::SecondsFormat;
use dataset_core::ExpectedValue;
use postgresql_types::PostgreSQLRawValue;

/// Render an expected value.
pub fn render_expected(value: &ExpectedValue) -> String {
    match value {
        ExpectedValue::Null => "null".to_string(),
        ExpectedValue::Bool(b) => b.to_string(),
        ExpectedValue::Integer(i) => i.to_string(),
        ExpectedValue::Float(f) => f.to_string(),
        ExpectedValue::String(s) => s.clone(),
        ExpectedValue::Sequence(items) => {
            render_list(items.iter().map(render_expected))
        }
        ExpectedValue::Mapping(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", render_expected(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// Render an actual value read from PostgreSQL.
pub fn render_actual(value: &PostgreSQLRawValue) -> String {
    match value {
        PostgreSQLRawValue::Null => "null".to_string(),
        PostgreSQLRawValue::Bool(b) => b.to_string(),
        PostgreSQLRawValue::Int16(i) => i.to_string(),
        PostgreSQLRawValue::Int32(i) => i.to_string(),
        PostgreSQLRawValue::Int64(i) => i.to_string(),
        PostgreSQLRawValue::Float32(f) => f.to_string(),
        PostgreSQLRawValue::Float64(f) => f.to_string(),
        PostgreSQLRawValue::Decimal(d) => d.normalize().to_string(),
        PostgreSQLRawValue::Text(s) => s.clone(),
        PostgreSQLRawValue::Bytes(b) => format!("\\x{}", hex::encode(b)),
        PostgreSQLRawValue::Uuid(u) => u.to_string(),
        PostgreSQLRawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        PostgreSQLRawValue::Time(t) => t.format("%H:%M:%S%.f").to_string(),
        PostgreSQLRawValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        PostgreSQLRawValue::TimestampTz(ts) => ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        PostgreSQLRawValue::Json(j) => canonical_json(j),
        PostgreSQLRawValue::Array(items) => render_list(items.iter().map(render_actual)),
    }
}

fn render_list(items: impl Iterator<Item = String>) -> String {
    let parts: Vec<String> = items.collect();
    format!("[{}]", parts.join(", "))
}

/// Render JSON compactly with object keys sorted at every level.
///
/// This is the only JSON rendering used for comparisons, so key order and
/// whitespace in either source never matter.
pub fn canonical_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

// Keys are sorted here rather than relying on `serde_json::Map` ordering,
// which keeps insertion order once any crate enables `preserve_order`.
fn write_canonical(out: &mut String, value: &serde_json::Value) {
    match value {
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::Value::from(key.as_str()).to_string());
                out.push(':');
                write_canonical(out, item);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Convert a structured expected value into JSON.
///
/// Non-finite floats have no JSON form and become `null`.
pub fn expected_to_json(value: &ExpectedValue) -> serde_json::Value {
    match value {
        ExpectedValue::Null => serde_json::Value::Null,
        ExpectedValue::Bool(b) => serde_json::Value::Bool(*b),
        ExpectedValue::Integer(i) => serde_json::Value::from(*i),
        ExpectedValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ExpectedValue::String(s) => serde_json::Value::String(s.clone()),
        ExpectedValue::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(expected_to_json).collect())
        }
        ExpectedValue::Mapping(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), expected_to_json(v)))
                .collect(),
        ),
    }
}
