//! Driver-native value model.
//!
//! Values arrive from the driver adapter as one of a closed set of shapes.
//! SQL NULL for a `Nullable(T)` column is carried by an explicit `Nullable`
//! wrapper rather than by pointer indirection; a converter peels wrapper
//! levels and treats a nil at any level as normalized null.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A value as delivered by the underlying driver, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// The driver produced nothing for this cell (outer-level nil).
    Null,
    /// Explicit SQL NULL wrapper for `Nullable(T)` columns; `None` is NULL.
    Nullable(Option<Box<NativeValue>>),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Int128(i128),
    UInt128(u128),
    /// Integers wider than 128 bits arrive as decimal text.
    BigInt(String),
    /// A decimal that already encodes its scale.
    Decimal(Decimal),
    /// A raw fixed-point mantissa plus the column's declared scale.
    FixedPoint { raw: i128, scale: u32 },
    Text(String),
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Uuid(Uuid),
    Array(Vec<NativeValue>),
    /// Key/value pairs in driver order; keys must be scalar to marshal.
    Map(Vec<(NativeValue, NativeValue)>),
    Json(JsonValue),
}

impl NativeValue {
    /// Wrap a value the way a `Nullable(T)` column delivers it.
    pub fn nullable(value: Option<NativeValue>) -> Self {
        Self::Nullable(value.map(Box::new))
    }

    /// Strip all `Nullable` wrapper levels.
    ///
    /// Returns `None` when the chain bottoms out in a nil at any level;
    /// that is a normalized null, never an error.
    pub fn peel(&self) -> Option<&NativeValue> {
        let mut current = self;
        loop {
            match current {
                NativeValue::Null | NativeValue::Nullable(None) => return None,
                NativeValue::Nullable(Some(inner)) => current = inner,
                other => return Some(other),
            }
        }
    }
}

/// The underlying scalar family a converter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    WideInt,
    Decimal,
    Text,
    Time,
    Ip,
    Uuid,
    Structured,
}

impl ScanKind {
    /// Label used in shape-mismatch diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::WideInt => "wide integer",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Time => "time",
            Self::Ip => "ip address",
            Self::Uuid => "uuid",
            Self::Structured => "structured value",
        }
    }
}

/// How a rule expects its native input to arrive.
///
/// Used for validation and testing only; dispatch never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeShape {
    /// The underlying scalar family.
    pub base: ScanKind,
    /// Number of `Nullable` wrapper levels the driver adds.
    pub indirections: u8,
}

impl NativeShape {
    /// A bare value with no wrapper.
    pub const fn plain(base: ScanKind) -> Self {
        Self {
            base,
            indirections: 0,
        }
    }

    /// A value behind one `Nullable` wrapper.
    pub const fn nullable(base: ScanKind) -> Self {
        Self {
            base,
            indirections: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peel_bare_value() {
        let v = NativeValue::UInt8(7);
        assert_eq!(v.peel(), Some(&NativeValue::UInt8(7)));
    }

    #[test]
    fn test_peel_outer_null() {
        assert_eq!(NativeValue::Null.peel(), None);
    }

    #[test]
    fn test_peel_nullable_levels() {
        let v = NativeValue::nullable(Some(NativeValue::Int64(5)));
        assert_eq!(v.peel(), Some(&NativeValue::Int64(5)));

        let nil = NativeValue::nullable(None);
        assert_eq!(nil.peel(), None);

        // Nil buried two levels deep is still a clean null.
        let deep = NativeValue::nullable(Some(NativeValue::nullable(None)));
        assert_eq!(deep.peel(), None);

        let deep_value =
            NativeValue::nullable(Some(NativeValue::nullable(Some(NativeValue::Bool(true)))));
        assert_eq!(deep_value.peel(), Some(&NativeValue::Bool(true)));
    }
}
