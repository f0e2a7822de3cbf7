//! Text-shaped converters: String, FixedString, UUID, Enum, and the IP
//! address family.

use crate::converters::catalog::TypeRule;
use crate::converters::native::{NativeShape, NativeValue, ScanKind};
use crate::error::ConversionError;
use crate::frame::{FieldKind, FieldType, FrameValue};

pub(crate) fn rules() -> Vec<TypeRule> {
    vec![
        string_rule(false),
        string_rule(true),
        uuid_rule(false),
        uuid_rule(true),
        fixed_string_rule(),
        ip_rule(true),
        ip_rule(false),
        enum_rule(),
    ]
}

fn string_rule(nullable: bool) -> TypeRule {
    let rule_name = if nullable { "Nullable(String)" } else { "String" };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::Text)
    } else {
        NativeShape::plain(ScanKind::Text)
    };
    let output = FieldType::new(FieldKind::String).with_nullable(nullable);
    TypeRule::exact(rule_name, shape, output, move |value| {
        read_text(rule_name, value)
    })
}

/// FixedString always surfaces through the nullable string output, even for
/// a column declared non-nullable: the padded payload may not be valid
/// UTF-8 text, and the consumer needs the string-or-null escape hatch.
fn fixed_string_rule() -> TypeRule {
    TypeRule::pattern(
        "FixedString()",
        r"^Nullable\(FixedString\(\d+\)\)$|^FixedString\(\d+\)$",
        NativeShape::nullable(ScanKind::Text),
        FieldType::new(FieldKind::String).with_nullable(true),
        move |value| read_text("FixedString()", value),
    )
}

fn read_text(rule_name: &str, value: &NativeValue) -> Result<FrameValue, ConversionError> {
    let Some(inner) = value.peel() else {
        return Ok(FrameValue::Null);
    };
    match inner {
        NativeValue::Text(s) => Ok(FrameValue::Text(s.clone())),
        other => Err(ConversionError::mismatch(rule_name, "text", other)),
    }
}

fn uuid_rule(nullable: bool) -> TypeRule {
    let rule_name = if nullable { "Nullable(UUID)" } else { "UUID" };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::Uuid)
    } else {
        NativeShape::plain(ScanKind::Uuid)
    };
    let output = FieldType::new(FieldKind::String).with_nullable(nullable);
    TypeRule::exact(rule_name, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        match inner {
            NativeValue::Uuid(u) => Ok(FrameValue::Text(u.to_string())),
            other => Err(ConversionError::mismatch(rule_name, "uuid", other)),
        }
    })
}

/// Enum values arrive from the driver as their symbolic text.
fn enum_rule() -> TypeRule {
    TypeRule::pattern(
        "Enum()",
        r"^Enum(8|16)?\(",
        NativeShape::plain(ScanKind::Text),
        FieldType::new(FieldKind::String),
        move |value| read_text("Enum()", value),
    )
}

/// Both address families share one rule; the output is the canonical text
/// form (dotted-quad or compressed colon-hex).
fn ip_rule(nullable: bool) -> TypeRule {
    let (rule_name, pattern) = if nullable {
        ("Nullable(IP)", r"^Nullable\(IPv[46]\)$")
    } else {
        ("IP", r"^IPv[46]$")
    };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::Ip)
    } else {
        NativeShape::plain(ScanKind::Ip)
    };
    let output = FieldType::new(FieldKind::String).with_nullable(nullable);
    TypeRule::pattern(rule_name, pattern, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        match inner {
            NativeValue::Ipv4(addr) => Ok(FrameValue::Text(addr.to_string())),
            NativeValue::Ipv6(addr) => Ok(FrameValue::Text(addr.to_string())),
            other => Err(ConversionError::mismatch(rule_name, "ip address", other)),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    fn convert(rules: &[TypeRule], name: &str, value: &NativeValue) -> FrameValue {
        rules
            .iter()
            .find(|r| r.name() == name)
            .unwrap_or_else(|| panic!("rule {name} missing"))
            .convert(value)
            .unwrap()
    }

    #[test]
    fn test_string_passthrough() {
        let rules = rules();
        assert_eq!(
            convert(&rules, "String", &NativeValue::Text("hello".to_string())),
            FrameValue::Text("hello".to_string())
        );
        assert_eq!(
            convert(&rules, "Nullable(String)", &NativeValue::nullable(None)),
            FrameValue::Null
        );
    }

    #[test]
    fn test_fixed_string_keeps_padding() {
        let rules = rules();
        let rule = rules.iter().find(|r| r.name() == "FixedString()").unwrap();
        // Output type is nullable even though the column may not be.
        assert!(rule.output_type().nullable);
        assert_eq!(
            rule.convert(&NativeValue::Text("ab\0\0".to_string())).unwrap(),
            FrameValue::Text("ab\0\0".to_string())
        );
    }

    #[test]
    fn test_uuid_canonical_text() {
        let rules = rules();
        let u = uuid::Uuid::parse_str("417ddc5d-e556-4d27-95dd-a34d84e46a50").unwrap();
        assert_eq!(
            convert(&rules, "UUID", &NativeValue::Uuid(u)),
            FrameValue::Text("417ddc5d-e556-4d27-95dd-a34d84e46a50".to_string())
        );
        assert_eq!(
            convert(&rules, "Nullable(UUID)", &NativeValue::nullable(None)),
            FrameValue::Null
        );
    }

    #[test]
    fn test_enum_symbolic_text() {
        let rules = rules();
        assert_eq!(
            convert(&rules, "Enum()", &NativeValue::Text("ok".to_string())),
            FrameValue::Text("ok".to_string())
        );
    }

    #[test]
    fn test_ipv4_round_trip() {
        let rules = rules();
        assert_eq!(
            convert(&rules, "IP", &NativeValue::Ipv4(Ipv4Addr::new(127, 0, 0, 1))),
            FrameValue::Text("127.0.0.1".to_string())
        );
    }

    #[test]
    fn test_ipv6_canonical_form() {
        let rules = rules();
        let addr: Ipv6Addr = "2001:44c8:129:2632:33:0:252:2".parse().unwrap();
        assert_eq!(
            convert(&rules, "IP", &NativeValue::Ipv6(addr)),
            FrameValue::Text("2001:44c8:129:2632:33:0:252:2".to_string())
        );
    }

    #[test]
    fn test_nullable_ip_nil_is_null_not_error() {
        let rules = rules();
        assert_eq!(
            convert(&rules, "Nullable(IP)", &NativeValue::nullable(None)),
            FrameValue::Null
        );
        assert_eq!(
            convert(
                &rules,
                "Nullable(IP)",
                &NativeValue::nullable(Some(NativeValue::Ipv4(Ipv4Addr::new(10, 0, 0, 1))))
            ),
            FrameValue::Text("10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_ip_shape_mismatch() {
        let rules = rules();
        let rule = rules.iter().find(|r| r.name() == "IP").unwrap();
        let err = rule.convert(&NativeValue::UInt32(0x7f000001)).unwrap_err();
        assert!(matches!(err, ConversionError::ShapeMismatch { .. }));
    }
}
