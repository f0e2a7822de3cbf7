//! Date and time converters.
//!
//! One prefix pattern covers the whole family: `Date`, `Date32`,
//! `DateTime` (with or without a timezone parameter), and
//! `DateTime64(...)`. The anchors keep `Decimal` and friends out.

use crate::converters::catalog::TypeRule;
use crate::converters::native::{NativeShape, NativeValue, ScanKind};
use crate::error::ConversionError;
use crate::frame::{FieldKind, FieldType, FrameValue};

pub(crate) fn rules() -> Vec<TypeRule> {
    // Nullable pattern must be declared ahead of the bare one.
    vec![date_rule(true), date_rule(false)]
}

fn date_rule(nullable: bool) -> TypeRule {
    let (rule_name, pattern) = if nullable {
        ("Nullable(Date)", r"^Nullable\(Date")
    } else {
        ("Date", r"^Date")
    };
    let shape = if nullable {
        NativeShape::nullable(ScanKind::Time)
    } else {
        NativeShape::plain(ScanKind::Time)
    };
    let output = FieldType::new(FieldKind::Time).with_nullable(nullable);
    TypeRule::pattern(rule_name, pattern, shape, output, move |value| {
        let Some(inner) = value.peel() else {
            return Ok(FrameValue::Null);
        };
        match inner {
            NativeValue::Time(t) => Ok(FrameValue::Time(*t)),
            other => Err(ConversionError::mismatch(rule_name, "time", other)),
        }
    })
}
