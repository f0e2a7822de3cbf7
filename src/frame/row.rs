//! Normalized values, cells, and rows.
//!
//! This module contains:
//! - `FrameValue` - a normalized cell value conforming to the closed taxonomy
//! - `ColumnInfo` - metadata about a column in a result set
//! - `Cell` / `Row` - one converted cell and one row of cells

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::{FieldKind, FieldType};

/// A normalized cell value.
///
/// Every converter in the catalog produces one of these variants, and the
/// variant always agrees with the rule's declared output type. `Null` is a
/// valid value for any output type: a driver-level nil at the outer
/// indirection level normalizes to `Null` regardless of declared
/// nullability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FrameValue {
    /// Normalized null. Not an error.
    Null,
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
    Text(String),
    Time(DateTime<Utc>),
    /// Raw JSON text, carried through byte-unchanged.
    Json(String),
}

impl FrameValue {
    /// Check if this value is the normalized null.
    pub fn is_null(&self) -> bool {
        matches!(self, FrameValue::Null)
    }

    /// The field kind this value inhabits; `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FrameValue::Null => None,
            FrameValue::Bool(_) => Some(FieldKind::Bool),
            FrameValue::Int8(_) => Some(FieldKind::Int8),
            FrameValue::Int16(_) => Some(FieldKind::Int16),
            FrameValue::Int32(_) => Some(FieldKind::Int32),
            FrameValue::Int64(_) => Some(FieldKind::Int64),
            FrameValue::UInt8(_) => Some(FieldKind::UInt8),
            FrameValue::UInt16(_) => Some(FieldKind::UInt16),
            FrameValue::UInt32(_) => Some(FieldKind::UInt32),
            FrameValue::UInt64(_) => Some(FieldKind::UInt64),
            FrameValue::Float32(_) => Some(FieldKind::Float32),
            FrameValue::Float64(_) => Some(FieldKind::Float64),
            FrameValue::Text(_) => Some(FieldKind::String),
            FrameValue::Time(_) => Some(FieldKind::Time),
            FrameValue::Json(_) => Some(FieldKind::Json),
        }
    }

    /// Whether this value conforms to the given output type.
    ///
    /// `Null` conforms to every output type; a driver nil at the outer
    /// level is always a legal result.
    pub fn matches(&self, output: &FieldType) -> bool {
        match self.kind() {
            None => true,
            Some(kind) => kind == output.kind,
        }
    }

    /// Render this value for display.
    pub fn to_display_string(&self) -> String {
        match self {
            FrameValue::Null => "NULL".to_string(),
            FrameValue::Bool(b) => b.to_string(),
            FrameValue::Int8(v) => v.to_string(),
            FrameValue::Int16(v) => v.to_string(),
            FrameValue::Int32(v) => v.to_string(),
            FrameValue::Int64(v) => v.to_string(),
            FrameValue::UInt8(v) => v.to_string(),
            FrameValue::UInt16(v) => v.to_string(),
            FrameValue::UInt32(v) => v.to_string(),
            FrameValue::UInt64(v) => v.to_string(),
            FrameValue::Float32(v) => v.to_string(),
            FrameValue::Float64(v) => v.to_string(),
            FrameValue::Text(s) => s.clone(),
            FrameValue::Time(t) => t.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            FrameValue::Json(j) => j.clone(),
        }
    }
}

impl std::fmt::Display for FrameValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Default for FrameValue {
    fn default() -> Self {
        FrameValue::Null
    }
}

/// Metadata about a column in a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// The store-declared type descriptor, e.g. `Nullable(Decimal(15,2))`.
    pub type_name: String,
    /// Column position (0-indexed).
    pub ordinal: usize,
}

impl ColumnInfo {
    /// Create a new column info.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ordinal,
        }
    }
}

/// A converted cell in a result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The normalized value of this cell.
    pub value: FrameValue,
    /// The column index (0-indexed).
    pub column_index: usize,
}

impl Cell {
    /// Create a new cell.
    pub fn new(value: FrameValue, column_index: usize) -> Self {
        Self {
            value,
            column_index,
        }
    }

    /// Check if this cell is null.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }
}

/// A row of converted cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// The cells in this row.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a new row from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Create a row from values (auto-assigns column indices).
    pub fn from_values(values: Vec<FrameValue>) -> Self {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| Cell::new(value, idx))
            .collect();
        Self { cells }
    }

    /// Get the number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if this row is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a value by column index.
    pub fn get_value(&self, index: usize) -> Option<&FrameValue> {
        self.cells.get(index).map(|c| &c.value)
    }

    /// Iterate over values.
    pub fn values(&self) -> impl Iterator<Item = &FrameValue> {
        self.cells.iter().map(|c| &c.value)
    }
}
