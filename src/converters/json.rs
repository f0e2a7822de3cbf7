//! Structured and semi-structured converters.
//!
//! Tuples, maps, nested tables, arrays, variants, dynamic columns, JSON
//! objects, geo points, and simple-aggregate-function columns all converge
//! on one output: raw JSON text. A single `to_json` conversion backs every
//! rule in this family.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::converters::catalog::TypeRule;
use crate::converters::native::{NativeShape, NativeValue, ScanKind};
use crate::error::ConversionError;
use crate::frame::{FieldKind, FieldType, FrameValue};

pub(crate) fn rules() -> Vec<TypeRule> {
    vec![
        json_pattern("Array()", r"^Array\(.*\)"),
        json_pattern("Tuple()", r"^Tuple\(.*\)"),
        json_pattern("Nested()", r"^Nested\(.*\)"),
        json_pattern("Map()", r"^Map\(.*\)"),
        json_pattern("Variant()", r"^Variant\(.*\)"),
        json_pattern("Dynamic", r"^Dynamic"),
        json_pattern("SimpleAggregateFunction()", r"^SimpleAggregateFunction\(.*\)"),
        json_exact("JSON"),
        json_exact("Point"),
    ]
}

fn json_pattern(name: &'static str, pattern: &str) -> TypeRule {
    TypeRule::pattern(
        name,
        pattern,
        NativeShape::plain(ScanKind::Structured),
        FieldType::new(FieldKind::Json).with_nullable(true),
        move |value| to_json(name, value),
    )
}

fn json_exact(name: &'static str) -> TypeRule {
    TypeRule::exact(
        name,
        NativeShape::plain(ScanKind::Structured),
        FieldType::new(FieldKind::Json).with_nullable(true),
        move |value| to_json(name, value),
    )
}

/// Convert a structured native value to raw JSON text.
///
/// Inputs that are already serialized JSON (text or UTF-8 bytes) pass
/// through byte-unchanged instead of being re-encoded as a JSON string
/// literal. Everything else goes through a structural marshal.
fn to_json(rule: &str, value: &NativeValue) -> Result<FrameValue, ConversionError> {
    let Some(inner) = value.peel() else {
        return Ok(FrameValue::Null);
    };
    match inner {
        NativeValue::Text(s) => {
            if is_json_text(s) {
                Ok(FrameValue::Json(s.clone()))
            } else {
                // A plain string marshals to a JSON string literal.
                Ok(FrameValue::Json(
                    serde_json::to_string(s)
                        .map_err(|e| ConversionError::marshal(rule, e.to_string()))?,
                ))
            }
        }
        NativeValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) if is_json_text(s) => Ok(FrameValue::Json(s.to_string())),
            _ => Err(ConversionError::marshal(rule, "binary value is not JSON text")),
        },
        other => {
            let json = marshal(rule, other)?;
            Ok(FrameValue::Json(
                serde_json::to_string(&json)
                    .map_err(|e| ConversionError::marshal(rule, e.to_string()))?,
            ))
        }
    }
}

fn is_json_text(s: &str) -> bool {
    serde_json::from_str::<JsonValue>(s).is_ok()
}

/// Structural marshal of a native value into a JSON tree.
///
/// Wide integers and decimals serialize as decimal strings; a JSON number
/// cannot carry them without rounding. Non-finite floats and binary
/// payloads have no JSON form.
fn marshal(rule: &str, value: &NativeValue) -> Result<JsonValue, ConversionError> {
    match value {
        NativeValue::Null | NativeValue::Nullable(None) => Ok(JsonValue::Null),
        NativeValue::Nullable(Some(inner)) => marshal(rule, inner),
        NativeValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        NativeValue::Int8(v) => Ok(JsonValue::Number((*v as i64).into())),
        NativeValue::Int16(v) => Ok(JsonValue::Number((*v as i64).into())),
        NativeValue::Int32(v) => Ok(JsonValue::Number((*v as i64).into())),
        NativeValue::Int64(v) => Ok(JsonValue::Number((*v).into())),
        NativeValue::UInt8(v) => Ok(JsonValue::Number((*v as u64).into())),
        NativeValue::UInt16(v) => Ok(JsonValue::Number((*v as u64).into())),
        NativeValue::UInt32(v) => Ok(JsonValue::Number((*v as u64).into())),
        NativeValue::UInt64(v) => Ok(JsonValue::Number((*v).into())),
        NativeValue::Float32(v) => finite_number(rule, *v as f64),
        NativeValue::Float64(v) => finite_number(rule, *v),
        NativeValue::Int128(v) => Ok(JsonValue::String(v.to_string())),
        NativeValue::UInt128(v) => Ok(JsonValue::String(v.to_string())),
        NativeValue::BigInt(digits) => Ok(JsonValue::String(digits.clone())),
        NativeValue::Decimal(d) => Ok(JsonValue::String(d.to_string())),
        NativeValue::FixedPoint { raw, scale } => {
            finite_number(rule, *raw as f64 / 10f64.powi(*scale as i32))
        }
        NativeValue::Text(s) => Ok(JsonValue::String(s.clone())),
        NativeValue::Bytes(_) => Err(ConversionError::marshal(
            rule,
            "binary value has no JSON form",
        )),
        NativeValue::Time(t) => Ok(JsonValue::String(t.to_rfc3339())),
        NativeValue::Ipv4(addr) => Ok(JsonValue::String(addr.to_string())),
        NativeValue::Ipv6(addr) => Ok(JsonValue::String(addr.to_string())),
        NativeValue::Uuid(u) => Ok(JsonValue::String(u.to_string())),
        NativeValue::Array(items) => {
            let values = items
                .iter()
                .map(|item| marshal(rule, item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(JsonValue::Array(values))
        }
        NativeValue::Map(entries) => {
            let mut object = JsonMap::new();
            for (key, entry) in entries {
                object.insert(object_key(rule, key)?, marshal(rule, entry)?);
            }
            Ok(JsonValue::Object(object))
        }
        NativeValue::Json(json) => Ok(json.clone()),
    }
}

fn finite_number(rule: &str, value: f64) -> Result<JsonValue, ConversionError> {
    Number::from_f64(value)
        .map(JsonValue::Number)
        .ok_or_else(|| ConversionError::marshal(rule, format!("non-finite float {value}")))
}

/// Render a map key as a JSON object key. Only scalar keys have one.
fn object_key(rule: &str, key: &NativeValue) -> Result<String, ConversionError> {
    let Some(inner) = key.peel() else {
        return Err(ConversionError::marshal(rule, "map key is null"));
    };
    match inner {
        NativeValue::Text(s) => Ok(s.clone()),
        NativeValue::Bool(b) => Ok(b.to_string()),
        NativeValue::Int8(v) => Ok(v.to_string()),
        NativeValue::Int16(v) => Ok(v.to_string()),
        NativeValue::Int32(v) => Ok(v.to_string()),
        NativeValue::Int64(v) => Ok(v.to_string()),
        NativeValue::UInt8(v) => Ok(v.to_string()),
        NativeValue::UInt16(v) => Ok(v.to_string()),
        NativeValue::UInt32(v) => Ok(v.to_string()),
        NativeValue::UInt64(v) => Ok(v.to_string()),
        NativeValue::Int128(v) => Ok(v.to_string()),
        NativeValue::UInt128(v) => Ok(v.to_string()),
        NativeValue::BigInt(digits) => Ok(digits.clone()),
        NativeValue::Time(t) => Ok(t.to_rfc3339()),
        NativeValue::Ipv4(addr) => Ok(addr.to_string()),
        NativeValue::Ipv6(addr) => Ok(addr.to_string()),
        NativeValue::Uuid(u) => Ok(u.to_string()),
        other => Err(ConversionError::marshal(
            rule,
            format!("map key is not scalar: {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn convert(name: &str, value: &NativeValue) -> Result<FrameValue, ConversionError> {
        rules()
            .into_iter()
            .find(|r| r.name() == name)
            .unwrap_or_else(|| panic!("rule {name} missing"))
            .convert(value)
    }

    fn text_map(entries: &[(&str, NativeValue)]) -> NativeValue {
        NativeValue::Map(
            entries
                .iter()
                .map(|(k, v)| (NativeValue::Text(k.to_string()), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_map_marshals_byte_identical_to_standard_json() {
        let value = text_map(&[
            ("1", NativeValue::UInt16(1)),
            ("2", NativeValue::UInt16(2)),
        ]);
        let expected = serde_json::to_string(&json!({"1": 1, "2": 2})).unwrap();
        assert_eq!(
            convert("Map()", &value).unwrap(),
            FrameValue::Json(expected)
        );
    }

    #[test]
    fn test_tuple_with_named_fields() {
        let value = text_map(&[
            ("s", NativeValue::Text("41".to_string())),
            ("i", NativeValue::Int64(41)),
        ]);
        let expected = serde_json::to_string(&json!({"i": 41, "s": "41"})).unwrap();
        assert_eq!(
            convert("Tuple()", &value).unwrap(),
            FrameValue::Json(expected)
        );
    }

    #[test]
    fn test_nested_rows_marshal_as_object_array() {
        let value = NativeValue::Array(vec![text_map(&[
            ("s", NativeValue::Text("42".to_string())),
            ("i", NativeValue::Int64(41)),
        ])]);
        let expected = serde_json::to_string(&json!([{"i": 41, "s": "42"}])).unwrap();
        assert_eq!(
            convert("Nested()", &value).unwrap(),
            FrameValue::Json(expected)
        );
    }

    #[test]
    fn test_scalar_array_marshals_fully() {
        let value = NativeValue::Array(vec![
            NativeValue::Text("1".to_string()),
            NativeValue::Text("2".to_string()),
            NativeValue::Text("3".to_string()),
        ]);
        assert_eq!(
            convert("Array()", &value).unwrap(),
            FrameValue::Json(r#"["1","2","3"]"#.to_string())
        );
    }

    #[test]
    fn test_array_with_null_elements() {
        let value = NativeValue::Array(vec![
            NativeValue::nullable(Some(NativeValue::Int64(45))),
            NativeValue::nullable(None),
        ]);
        assert_eq!(
            convert("Array()", &value).unwrap(),
            FrameValue::Json("[45,null]".to_string())
        );
    }

    #[test]
    fn test_json_text_passes_through_unchanged() {
        let raw = r#"{"x":"1234"}"#;
        assert_eq!(
            convert("JSON", &NativeValue::Text(raw.to_string())).unwrap(),
            FrameValue::Json(raw.to_string())
        );
        assert_eq!(
            convert("JSON", &NativeValue::Bytes(raw.as_bytes().to_vec())).unwrap(),
            FrameValue::Json(raw.to_string())
        );
    }

    #[test]
    fn test_plain_string_becomes_json_string_literal() {
        assert_eq!(
            convert("JSON", &NativeValue::Text("hello".to_string())).unwrap(),
            FrameValue::Json(r#""hello""#.to_string())
        );
    }

    #[test]
    fn test_non_json_bytes_fail_to_marshal() {
        let err = convert("JSON", &NativeValue::Bytes(vec![0xff, 0xfe])).unwrap_err();
        assert!(matches!(err, ConversionError::MarshalFailure { .. }));
    }

    #[test]
    fn test_non_finite_float_fails_to_marshal() {
        let value = NativeValue::Array(vec![NativeValue::Float64(f64::NAN)]);
        let err = convert("Array()", &value).unwrap_err();
        assert!(matches!(err, ConversionError::MarshalFailure { .. }));
    }

    #[test]
    fn test_structured_map_key_fails_to_marshal() {
        let value = NativeValue::Map(vec![(
            NativeValue::Array(vec![NativeValue::UInt8(1)]),
            NativeValue::UInt8(1),
        )]);
        let err = convert("Map()", &value).unwrap_err();
        assert!(matches!(err, ConversionError::MarshalFailure { .. }));
    }

    #[test]
    fn test_wide_integers_in_structures_keep_digits() {
        let value = NativeValue::Array(vec![NativeValue::UInt128(1 << 100)]);
        assert_eq!(
            convert("Array()", &value).unwrap(),
            FrameValue::Json(format!("[\"{}\"]", 1u128 << 100))
        );
    }

    #[test]
    fn test_native_json_tree_marshals() {
        let value = NativeValue::Json(json!({"test": {"test": ["2", "3"]}}));
        assert_eq!(
            convert("JSON", &value).unwrap(),
            FrameValue::Json(r#"{"test":{"test":["2","3"]}}"#.to_string())
        );
    }

    #[test]
    fn test_outer_nil_is_null() {
        assert_eq!(convert("Map()", &NativeValue::Null).unwrap(), FrameValue::Null);
        assert_eq!(
            convert("Array()", &NativeValue::nullable(None)).unwrap(),
            FrameValue::Null
        );
    }

    #[test]
    fn test_point_marshals_as_coordinates() {
        let value = NativeValue::Array(vec![
            NativeValue::Float64(10.0),
            NativeValue::Float64(10.0),
        ]);
        assert_eq!(
            convert("Point", &value).unwrap(),
            FrameValue::Json("[10.0,10.0]".to_string())
        );
    }
}
