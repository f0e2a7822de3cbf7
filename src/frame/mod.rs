//! Normalized frame model.
//!
//! This module contains:
//! - **Field taxonomy** (`field`): the closed set of output types
//! - **Row/Value** (`row`): normalized values, cells, rows, column metadata
//! - **Builder** (`builder`): materializes converted rows into a frame

pub mod builder;
pub mod field;
pub mod row;

pub use builder::{BoundColumn, Frame, FrameBuilder};
pub use field::{FieldKind, FieldType};
pub use row::{Cell, ColumnInfo, FrameValue, Row};
