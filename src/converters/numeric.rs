//! Numeric converters: fixed-width scalars, SQL aliases, wide integers,
//! and the Decimal family.

use rust_decimal::prelude::ToPrimitive;

use crate::converters::catalog::TypeRule;
use crate::converters::native::{NativeShape, NativeValue, ScanKind};
use crate::error::ConversionError;
use crate::frame::{FieldKind, FieldType, FrameValue};

/// Exact-name scalar types and the shapes they scan from.
const SCALARS: &[(&str, FieldKind, ScanKind)] = &[
    ("Bool", FieldKind::Bool, ScanKind::Bool),
    ("Int8", FieldKind::Int8, ScanKind::Int8),
    ("Int16", FieldKind::Int16, ScanKind::Int16),
    ("Int32", FieldKind::Int32, ScanKind::Int32),
    ("Int64", FieldKind::Int64, ScanKind::Int64),
    ("UInt8", FieldKind::UInt8, ScanKind::UInt8),
    ("UInt16", FieldKind::UInt16, ScanKind::UInt16),
    ("UInt32", FieldKind::UInt32, ScanKind::UInt32),
    ("UInt64", FieldKind::UInt64, ScanKind::UInt64),
    ("Float32", FieldKind::Float32, ScanKind::Float32),
    ("Float64", FieldKind::Float64, ScanKind::Float64),
];

/// SQL alias types the store accepts in DDL; they scan through a nullable
/// float like the original default numeric path.
const INT_ALIASES: &[&str] = &[
    "TINYINT", "BOOL", "BOOLEAN", "INT1", "SMALLINT", "INT2", "INT", "INT4", "INTEGER", "BIGINT",
];

const WIDE_INTS: &[&str] = &["Int128", "Int256", "UInt128", "UInt256"];

pub(crate) fn rules() -> Vec<TypeRule> {
    let mut list = Vec::new();
    for &(name, kind, scan) in SCALARS {
        list.push(scalar_rule(name, kind, scan, false));
        list.push(scalar_rule(name, kind, scan, true));
    }
    for &name in INT_ALIASES {
        list.push(alias_rule(name));
    }
    for &name in WIDE_INTS {
        list.push(wide_int_rule(name, false));
        list.push(wide_int_rule(name, true));
    }
    // Nullable pattern must be declared ahead of the bare one.
    list.push(decimal_rule(true));
    list.push(decimal_rule(false));
    list
}

fn scalar_rule(name: &str, kind: FieldKind, scan: ScanKind, nullable: bool) -> TypeRule {
    let rule_name = if nullable {
        format!("Nullable({name})")
    } else {
        name.to_string()
    };
    let shape = if nullable {
        NativeShape::nullable(scan)
    } else {
        NativeShape::plain(scan)
    };
    let output = FieldType::new(kind).with_nullable(nullable);
    let err_name = rule_name.clone();
    TypeRule::exact(rule_name, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        read_scalar(scan, inner)
            .ok_or_else(|| ConversionError::mismatch(&err_name, scan.as_str(), inner))
    })
}

fn read_scalar(scan: ScanKind, value: &NativeValue) -> Option<FrameValue> {
    match (scan, value) {
        (ScanKind::Bool, NativeValue::Bool(b)) => Some(FrameValue::Bool(*b)),
        (ScanKind::Int8, NativeValue::Int8(v)) => Some(FrameValue::Int8(*v)),
        (ScanKind::Int16, NativeValue::Int16(v)) => Some(FrameValue::Int16(*v)),
        (ScanKind::Int32, NativeValue::Int32(v)) => Some(FrameValue::Int32(*v)),
        (ScanKind::Int64, NativeValue::Int64(v)) => Some(FrameValue::Int64(*v)),
        (ScanKind::UInt8, NativeValue::UInt8(v)) => Some(FrameValue::UInt8(*v)),
        (ScanKind::UInt16, NativeValue::UInt16(v)) => Some(FrameValue::UInt16(*v)),
        (ScanKind::UInt32, NativeValue::UInt32(v)) => Some(FrameValue::UInt32(*v)),
        (ScanKind::UInt64, NativeValue::UInt64(v)) => Some(FrameValue::UInt64(*v)),
        (ScanKind::Float32, NativeValue::Float32(v)) => Some(FrameValue::Float32(*v)),
        (ScanKind::Float64, NativeValue::Float64(v)) => Some(FrameValue::Float64(*v)),
        _ => None,
    }
}

/// Alias types surface as a nullable float regardless of declared width.
fn alias_rule(name: &str) -> TypeRule {
    let err_name = name.to_string();
    TypeRule::exact(
        name,
        NativeShape::nullable(ScanKind::Float64),
        FieldType::new(FieldKind::Float64).with_nullable(true),
        move |value| {
            let Some(inner) = value.peel() else {
                return Ok(FrameValue::Null);
            };
            match inner {
                NativeValue::Float64(v) => Ok(FrameValue::Float64(*v)),
                other => Err(ConversionError::mismatch(&err_name, "float64", other)),
            }
        },
    )
}

/// 128- and 256-bit integers exceed `f64` precision; the result rounds to
/// the nearest float and the conversion is one-way.
fn wide_int_rule(name: &str, nullable: bool) -> TypeRule {
    let rule_name = if nullable {
        format!("Nullable({name})")
    } else {
        name.to_string()
    };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::WideInt)
    } else {
        NativeShape::plain(ScanKind::WideInt)
    };
    let output = FieldType::new(FieldKind::Float64).with_nullable(nullable);
    let err_name = rule_name.clone();
    TypeRule::exact(rule_name, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        wide_to_f64(inner)
            .map(FrameValue::Float64)
            .ok_or_else(|| ConversionError::mismatch(&err_name, ScanKind::WideInt.as_str(), inner))
    })
}

fn wide_to_f64(value: &NativeValue) -> Option<f64> {
    match value {
        NativeValue::Int128(v) => Some(*v as f64),
        NativeValue::UInt128(v) => Some(*v as f64),
        NativeValue::BigInt(digits) => digits.parse::<f64>().ok(),
        _ => None,
    }
}

/// Decimal columns land as `Float64`: a raw fixed-point mantissa divides by
/// `10^scale`, a scale-encoding decimal converts directly. One-way.
fn decimal_rule(nullable: bool) -> TypeRule {
    let (rule_name, pattern) = if nullable {
        ("Nullable(Decimal)", r"^Nullable\(Decimal")
    } else {
        ("Decimal", r"^Decimal")
    };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::Decimal)
    } else {
        NativeShape::plain(ScanKind::Decimal)
    };
    let output = FieldType::new(FieldKind::Float64).with_nullable(nullable);
    TypeRule::pattern(rule_name, pattern, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        match inner {
            NativeValue::Decimal(d) => d
                .to_f64()
                .map(FrameValue::Float64)
                .ok_or_else(|| ConversionError::mismatch(rule_name, "decimal", inner)),
            NativeValue::FixedPoint { raw, scale } => {
                Ok(FrameValue::Float64(*raw as f64 / 10f64.powi(*scale as i32)))
            }
            other => Err(ConversionError::mismatch(rule_name, "decimal", other)),
        }
    })
}
