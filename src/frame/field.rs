//! Normalized field taxonomy.
//!
//! The frame consumer understands exactly this closed set of field kinds.
//! Everything structured or semi-structured (tuples, maps, nested tables,
//! arrays, variants, geo points) is carried as raw JSON text under
//! `FieldKind::Json`; there is no native structured output shape.

use serde::{Deserialize, Serialize};

/// The closed set of normalized field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
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
    Bool,
    String,
    Time,
    Json,
}

impl FieldKind {
    /// Lowercase name used in display strings and serialized frames.
    pub fn as_str(&self) -> &'static str {
        match self {
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
            Self::Bool => "bool",
            Self::String => "string",
            Self::Time => "time",
            Self::Json => "json",
        }
    }
}

/// A field kind plus whether null is representable, carried as one tag.
///
/// Nullability is part of the type tag rather than a wrapper type, matching
/// the tabular frame model this crate feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldType {
    /// Create a non-nullable field type.
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// Set the nullable flag.
    pub const fn with_nullable(self, nullable: bool) -> Self {
        Self {
            kind: self.kind,
            nullable,
        }
    }

    /// Display name, e.g. `uint8` or `nullable(uint8)`.
    pub fn type_name(&self) -> String {
        if self.nullable {
            format!("nullable({})", self.kind.as_str())
        } else {
            self.kind.as_str().to_string()
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
