//! ClickHouse column-type resolution and value normalization.
//!
//! The crate maps a column's declared type descriptor (`UInt8`,
//! `Nullable(Decimal(15,2))`, `LowCardinality(Nullable(String))`,
//! `Array(Tuple(s String, i Int32))`) to a normalized output type and a
//! pure function that converts a driver-native value into it. A row
//! materializer resolves each column once, converts each cell once, and
//! collects the result into a tabular frame.
//!
//! # Example
//!
//! ```ignore
//! use chframe::{build_catalog, ColumnInfo, FrameBuilder, NativeValue};
//!
//! let catalog = build_catalog();
//! let mut builder = FrameBuilder::bind(
//!     &catalog,
//!     vec![
//!         ColumnInfo::new("id", "UInt64", 0),
//!         ColumnInfo::new("score", "Nullable(Decimal(15,2))", 1),
//!     ],
//! );
//! builder.append_row(&[
//!     NativeValue::UInt64(1),
//!     NativeValue::nullable(Some(NativeValue::FixedPoint { raw: 150, scale: 2 })),
//! ])?;
//! let frame = builder.finish();
//! ```
//!
//! The catalog is built once at startup, is immutable afterwards, and may
//! be shared across threads without locks.

pub mod converters;
pub mod error;
pub mod frame;

pub use converters::{build_catalog, Catalog, Matcher, NativeShape, NativeValue, ScanKind, TypeRule};
pub use error::{ConversionError, FrameError};
pub use frame::{BoundColumn, Cell, ColumnInfo, FieldKind, FieldType, Frame, FrameBuilder, FrameValue, Row};
