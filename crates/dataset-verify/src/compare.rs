//! Field comparison logic.
//!
//! The column's type tag picks a [`TypeClass`]; each class has one
//! canonicalisation applied to the expected and the actual value.

use crate::render::{canonical_json, expected_to_json, render_actual, render_expected};
use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use dataset_core::ExpectedValue;
use postgresql_types::{PostgreSQLRawValue, PostgreSQLValueWithSchema, TypeClass};
use thiserror::Error;
use uuid::Uuid;

/// Result of comparing two values.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareResult {
    /// Values match.
    Match,
    /// Values don't match.
    Mismatch { expected: String, actual: String },
}

impl CompareResult {
    fn from_renderings(expected: String, actual: String) -> Self {
        if expected == actual {
            CompareResult::Match
        } else {
            CompareResult::Mismatch { expected, actual }
        }
    }
}

/// An expected value that cannot be read under its column's type.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a UUID: {0}")]
    Uuid(#[from] uuid::Error),
}

/// Compare an expected value with a value read from PostgreSQL.
pub fn compare_values(
    expected: &ExpectedValue,
    actual: &PostgreSQLValueWithSchema,
) -> Result<CompareResult, DecodeError> {
    // Nulls only ever match nulls, whatever the column type.
    match (expected.is_null(), actual.is_null()) {
        (true, true) => return Ok(CompareResult::Match),
        (true, false) | (false, true) => {
            return Ok(CompareResult::Mismatch {
                expected: render_expected(expected),
                actual: render_actual(&actual.value),
            })
        }
        (false, false) => {}
    }

    match TypeClass::of(&actual.pg_type) {
        TypeClass::Temporal => Ok(compare_temporal(expected, &actual.value)),
        TypeClass::Json => compare_json(expected, &actual.value),
        TypeClass::Uuid => compare_uuid(expected, &actual.value),
        TypeClass::Scalar => Ok(CompareResult::from_renderings(
            render_expected(expected),
            render_actual(&actual.value),
        )),
    }
}

fn instant(value: &PostgreSQLRawValue) -> Option<DateTime<Utc>> {
    match value {
        PostgreSQLRawValue::Date(d) => Some(d.and_time(NaiveTime::MIN).and_utc()),
        PostgreSQLRawValue::Timestamp(ts) => Some(ts.and_utc()),
        PostgreSQLRawValue::TimestampTz(ts) => Some(*ts),
        _ => None,
    }
}

/// All accepted textual forms of an instant, the first being the one shown
/// in diagnostics.
///
/// Fractional seconds are printed with trailing zeros removed (`.5`, `.12`,
/// `.123456789`) and left out for whole seconds.
pub fn temporal_renderings(instant: &DateTime<Utc>) -> Vec<String> {
    let fraction = trimmed_fraction(instant.timestamp_subsec_nanos());
    vec![
        format!("{}{fraction}Z", instant.format("%Y-%m-%dT%H:%M:%S")),
        instant.to_rfc3339_opts(SecondsFormat::Secs, false),
        instant.format("%Y-%m-%d %H:%M:%S").to_string(),
        format!("{}{fraction}", instant.format("%Y-%m-%d %H:%M:%S")),
        instant.format("%a %b %e %H:%M:%S %Z %Y").to_string(),
    ]
}

fn trimmed_fraction(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", digits.trim_end_matches('0'))
}

fn compare_temporal(expected: &ExpectedValue, actual: &PostgreSQLRawValue) -> CompareResult {
    let expected = render_expected(expected);
    let Some(at) = instant(actual) else {
        return CompareResult::from_renderings(expected, render_actual(actual));
    };

    let mut accepted = temporal_renderings(&at);
    if let PostgreSQLRawValue::Date(d) = actual {
        accepted.push(d.format("%Y-%m-%d").to_string());
    }

    if accepted.iter().any(|form| *form == expected) {
        CompareResult::Match
    } else {
        CompareResult::Mismatch {
            expected,
            actual: accepted.swap_remove(0),
        }
    }
}

fn expected_json(expected: &ExpectedValue) -> Result<serde_json::Value, DecodeError> {
    match expected {
        ExpectedValue::Sequence(_) | ExpectedValue::Mapping(_) => Ok(expected_to_json(expected)),
        other => {
            let text = render_expected(other);
            let text = text.trim_start();
            if text.starts_with('[') {
                let items: Vec<serde_json::Map<String, serde_json::Value>> =
                    serde_json::from_str(text)?;
                Ok(serde_json::Value::Array(
                    items.into_iter().map(serde_json::Value::Object).collect(),
                ))
            } else {
                let object: serde_json::Map<String, serde_json::Value> =
                    serde_json::from_str(text)?;
                Ok(serde_json::Value::Object(object))
            }
        }
    }
}

fn compare_json(
    expected: &ExpectedValue,
    actual: &PostgreSQLRawValue,
) -> Result<CompareResult, DecodeError> {
    let expected = canonical_json(&expected_json(expected)?);
    let actual = match actual {
        PostgreSQLRawValue::Json(j) => canonical_json(j),
        other => render_actual(other),
    };
    Ok(CompareResult::from_renderings(expected, actual))
}

fn compare_uuid(
    expected: &ExpectedValue,
    actual: &PostgreSQLRawValue,
) -> Result<CompareResult, DecodeError> {
    let expected = Uuid::parse_str(render_expected(expected).trim())?.to_string();
    let actual = match actual {
        PostgreSQLRawValue::Uuid(u) => u.to_string(),
        PostgreSQLRawValue::Text(s) => match Uuid::parse_str(s) {
            Ok(u) => u.to_string(),
            Err(_) => s.clone(),
        },
        other => render_actual(other),
    };
    Ok(CompareResult::from_renderings(expected, actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use postgresql_types::Type;

    fn s(value: &str) -> ExpectedValue {
        ExpectedValue::String(value.to_string())
    }

    fn ten_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_null_handling() {
        let null_text = PostgreSQLValueWithSchema::null(Type::TEXT);
        assert_eq!(
            compare_values(&ExpectedValue::Null, &null_text).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("null"), &null_text).unwrap(),
            CompareResult::Mismatch {
                expected: "null".to_string(),
                actual: "null".to_string()
            }
        );
        assert!(matches!(
            compare_values(&ExpectedValue::Null, &PostgreSQLValueWithSchema::text("x")).unwrap(),
            CompareResult::Mismatch { .. }
        ));
    }

    #[test]
    fn test_null_skips_type_decoding() {
        let null_uuid = PostgreSQLValueWithSchema::null(Type::UUID);
        assert_eq!(
            compare_values(&ExpectedValue::Null, &null_uuid).unwrap(),
            CompareResult::Match
        );
        let null_json = PostgreSQLValueWithSchema::null(Type::JSONB);
        assert_eq!(
            compare_values(&ExpectedValue::Null, &null_json).unwrap(),
            CompareResult::Match
        );
    }

    #[test]
    fn test_timestamptz_accepts_every_rendering() {
        let actual = PostgreSQLValueWithSchema::timestamptz(ten_am());
        for form in [
            "2023-01-02T10:00:00Z",
            "2023-01-02T10:00:00+00:00",
            "2023-01-02 10:00:00",
            "Mon Jan  2 10:00:00 UTC 2023",
        ] {
            assert_eq!(
                compare_values(&s(form), &actual).unwrap(),
                CompareResult::Match,
                "{form}"
            );
        }
    }

    fn at_nanos(nanos: u32) -> PostgreSQLValueWithSchema {
        let naive = NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_nano_opt(10, 0, 0, nanos)
            .unwrap();
        PostgreSQLValueWithSchema::timestamp(naive)
    }

    #[test]
    fn test_timestamp_with_fraction() {
        let actual = at_nanos(500_000_000);
        for form in [
            "2023-01-02T10:00:00.5Z",
            "2023-01-02 10:00:00.5",
            // The plain form has no fraction at all
            "2023-01-02 10:00:00",
        ] {
            assert_eq!(
                compare_values(&s(form), &actual).unwrap(),
                CompareResult::Match,
                "{form}"
            );
        }
        assert!(matches!(
            compare_values(&s("2023-01-02T10:00:00.500Z"), &actual).unwrap(),
            CompareResult::Mismatch { .. }
        ));
        assert!(matches!(
            compare_values(&s("2023-01-02 10:00:01"), &actual).unwrap(),
            CompareResult::Mismatch { .. }
        ));
    }

    #[test]
    fn test_fraction_trailing_zeros_are_trimmed() {
        assert_eq!(
            compare_values(&s("2023-01-02T10:00:00.12Z"), &at_nanos(120_000_000)).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("2023-01-02 10:00:00.1234"), &at_nanos(123_400_000)).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("2023-01-02T10:00:00.123456789Z"), &at_nanos(123_456_789))
                .unwrap(),
            CompareResult::Match
        );
    }

    #[test]
    fn test_temporal_renderings_with_fraction() {
        let at = ten_am() + chrono::Duration::milliseconds(500);
        assert_eq!(
            temporal_renderings(&at),
            vec![
                "2023-01-02T10:00:00.5Z".to_string(),
                "2023-01-02T10:00:00+00:00".to_string(),
                "2023-01-02 10:00:00".to_string(),
                "2023-01-02 10:00:00.5".to_string(),
                "Mon Jan  2 10:00:00 UTC 2023".to_string(),
            ]
        );
    }

    #[test]
    fn test_temporal_mismatch_reports_rfc3339() {
        let actual = PostgreSQLValueWithSchema::timestamptz(ten_am());
        assert_eq!(
            compare_values(&s("2023-01-02 11:00:00"), &actual).unwrap(),
            CompareResult::Mismatch {
                expected: "2023-01-02 11:00:00".to_string(),
                actual: "2023-01-02T10:00:00Z".to_string(),
            }
        );
    }

    #[test]
    fn test_date_column() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let actual = PostgreSQLValueWithSchema::new(Type::DATE, PostgreSQLRawValue::Date(date));
        assert_eq!(
            compare_values(&s("2023-01-02"), &actual).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("2023-01-02 00:00:00"), &actual).unwrap(),
            CompareResult::Match
        );
        assert!(matches!(
            compare_values(&s("2023-01-03"), &actual).unwrap(),
            CompareResult::Mismatch { .. }
        ));
    }

    #[test]
    fn test_json_key_order_is_irrelevant() {
        let actual = PostgreSQLValueWithSchema::jsonb(serde_json::json!({"a": 1, "b": 2}));
        assert_eq!(
            compare_values(&s(r#"{"b":2,"a":1}"#), &actual).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("  { \"a\" : 1, \"b\" : 2 }"), &actual).unwrap(),
            CompareResult::Match
        );
        assert!(matches!(
            compare_values(&s(r#"{"a":1,"b":3}"#), &actual).unwrap(),
            CompareResult::Mismatch { .. }
        ));
    }

    #[test]
    fn test_json_array_of_objects() {
        let actual = PostgreSQLValueWithSchema::jsonb(serde_json::json!([{"x": 1}, {"y": 2}]));
        assert_eq!(
            compare_values(&s(r#"[{"x":1},{"y":2}]"#), &actual).unwrap(),
            CompareResult::Match
        );
    }

    #[test]
    fn test_json_structured_expected() {
        let actual = PostgreSQLValueWithSchema::jsonb(serde_json::json!({"a": 1, "b": [true]}));
        let expected = ExpectedValue::Mapping(vec![
            (
                "b".to_string(),
                ExpectedValue::Sequence(vec![ExpectedValue::Bool(true)]),
            ),
            ("a".to_string(), ExpectedValue::Integer(1)),
        ]);
        assert_eq!(
            compare_values(&expected, &actual).unwrap(),
            CompareResult::Match
        );
    }

    #[test]
    fn test_json_decode_failure() {
        let actual = PostgreSQLValueWithSchema::jsonb(serde_json::json!({"a": 1}));
        assert!(matches!(
            compare_values(&s("not json"), &actual),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            compare_values(&s("[1, 2]"), &actual),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_uuid_case_and_hyphens() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let actual = PostgreSQLValueWithSchema::uuid(id);
        for form in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
        ] {
            assert_eq!(
                compare_values(&s(form), &actual).unwrap(),
                CompareResult::Match,
                "{form}"
            );
        }
        assert!(matches!(
            compare_values(&s("550e8400-e29b-41d4-a716-446655440001"), &actual).unwrap(),
            CompareResult::Mismatch { .. }
        ));
    }

    #[test]
    fn test_uuid_decode_failure() {
        let actual = PostgreSQLValueWithSchema::uuid(Uuid::nil());
        assert!(matches!(
            compare_values(&s("not-a-uuid"), &actual),
            Err(DecodeError::Uuid(_))
        ));
    }

    #[test]
    fn test_scalar_comparison() {
        assert_eq!(
            compare_values(&ExpectedValue::Integer(7), &PostgreSQLValueWithSchema::int4(7)).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("7"), &PostgreSQLValueWithSchema::int8(7)).unwrap(),
            CompareResult::Match
        );
        assert_eq!(
            compare_values(&s("Alice"), &PostgreSQLValueWithSchema::text("Bob")).unwrap(),
            CompareResult::Mismatch {
                expected: "Alice".to_string(),
                actual: "Bob".to_string(),
            }
        );
        assert_eq!(
            compare_values(&ExpectedValue::Bool(true), &PostgreSQLValueWithSchema::bool(true))
                .unwrap(),
            CompareResult::Match
        );
    }

    #[test]
    fn test_temporal_and_json_arrays() {
        let dates = PostgreSQLValueWithSchema::new(
            Type::DATE_ARRAY,
            PostgreSQLRawValue::Array(vec![
                PostgreSQLRawValue::Date(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()),
                PostgreSQLRawValue::Null,
            ]),
        );
        let expected = ExpectedValue::Sequence(vec![s("2023-01-02"), ExpectedValue::Null]);
        assert_eq!(compare_values(&expected, &dates).unwrap(), CompareResult::Match);

        let instants = PostgreSQLValueWithSchema::new(
            Type::TIMESTAMPTZ_ARRAY,
            PostgreSQLRawValue::Array(vec![PostgreSQLRawValue::TimestampTz(ten_am())]),
        );
        let expected = ExpectedValue::Sequence(vec![s("2023-01-02T10:00:00Z")]);
        assert_eq!(compare_values(&expected, &instants).unwrap(), CompareResult::Match);

        let documents = PostgreSQLValueWithSchema::new(
            Type::JSONB_ARRAY,
            PostgreSQLRawValue::Array(vec![PostgreSQLRawValue::Json(
                serde_json::json!({"b": 2, "a": 1}),
            )]),
        );
        let expected = ExpectedValue::Sequence(vec![s(r#"{"a":1,"b":2}"#)]);
        assert_eq!(compare_values(&expected, &documents).unwrap(), CompareResult::Match);
    }
}
