//! Type resolution and value conversion.
//!
//! This module contains:
//! - **Native model** (`native`): the closed set of driver-delivered shapes
//! - **Catalog** (`catalog`): the ordered rule list, resolver, and sentinel
//! - **Converter families** (`numeric`, `temporal`, `text`, `json`): the
//!   per-type conversion rules assembled by `build_catalog()`

pub mod catalog;
pub mod native;

mod json;
mod numeric;
mod temporal;
mod text;

pub use catalog::{build_catalog, Catalog, ConvertFn, Matcher, TypeRule};
pub use native::{NativeShape, NativeValue, ScanKind};
