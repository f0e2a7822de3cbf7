//! Frame materialization.
//!
//! The builder is the consumer-facing boundary of the catalog: it resolves
//! each column's rule exactly once at bind time, then converts one cell per
//! value in a tight loop. A cell that fails to convert aborts the row with
//! the offending column's name, declared type, and rule; a bad mapping is
//! never papered over with a default value.

use crate::converters::{Catalog, NativeValue, TypeRule};
use crate::error::FrameError;
use crate::frame::row::{Cell, ColumnInfo, Row};

/// A column paired with the rule resolved for its declared type.
#[derive(Debug, Clone)]
pub struct BoundColumn {
    pub info: ColumnInfo,
    pub rule: TypeRule,
}

/// A materialized result frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub columns: Vec<BoundColumn>,
    pub rows: Vec<Row>,
}

/// Incremental frame builder over a bound column list.
#[derive(Debug)]
pub struct FrameBuilder {
    columns: Vec<BoundColumn>,
    rows: Vec<Row>,
}

impl FrameBuilder {
    /// Resolve every column against the catalog and bind the result.
    ///
    /// Columns whose type descriptor nothing matches are bound to the
    /// sentinel rule; the first cell converted through them fails with
    /// `UnresolvedType` rather than passing data through silently.
    pub fn bind(catalog: &Catalog, columns: Vec<ColumnInfo>) -> Self {
        let columns: Vec<BoundColumn> = columns
            .into_iter()
            .map(|info| {
                let rule = catalog.resolve(&info.type_name);
                BoundColumn { info, rule }
            })
            .collect();
        tracing::debug!("bound {} columns", columns.len());
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The bound columns, in order.
    pub fn columns(&self) -> &[BoundColumn] {
        &self.columns
    }

    /// Convert one row of native values and append it.
    pub fn append_row(&mut self, values: &[NativeValue]) -> Result<(), FrameError> {
        if values.len() != self.columns.len() {
            return Err(FrameError::ColumnCount {
                expected: self.columns.len(),
                got: values.len(),
            });
        }

        let mut cells = Vec::with_capacity(values.len());
        for (idx, (column, value)) in self.columns.iter().zip(values).enumerate() {
            let converted = column.rule.convert(value).map_err(|source| FrameError::Cell {
                column: column.info.name.clone(),
                type_name: column.info.type_name.clone(),
                rule: column.rule.name().to_string(),
                source,
            })?;
            cells.push(Cell::new(converted, idx));
        }
        self.rows.push(Row::new(cells));
        Ok(())
    }

    /// Finish building and take the frame.
    pub fn finish(self) -> Frame {
        Frame {
            columns: self.columns,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::converters::build_catalog;
    use crate::error::{ConversionError, FrameError};
    use crate::frame::FrameValue;

    use super::*;

    fn columns(specs: &[(&str, &str)]) -> Vec<ColumnInfo> {
        specs
            .iter()
            .enumerate()
            .map(|(idx, (name, ty))| ColumnInfo::new(*name, *ty, idx))
            .collect()
    }

    #[test]
    fn test_bind_and_materialize() {
        let catalog = build_catalog();
        let mut builder = FrameBuilder::bind(
            &catalog,
            columns(&[
                ("id", "UInt64"),
                ("name", "LowCardinality(String)"),
                ("score", "Nullable(Decimal(15,2))"),
            ]),
        );

        builder
            .append_row(&[
                NativeValue::UInt64(1),
                NativeValue::Text("a".to_string()),
                NativeValue::nullable(Some(NativeValue::FixedPoint { raw: 150, scale: 2 })),
            ])
            .unwrap();
        builder
            .append_row(&[
                NativeValue::UInt64(2),
                NativeValue::Text("b".to_string()),
                NativeValue::nullable(None),
            ])
            .unwrap();

        let frame = builder.finish();
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.columns[1].rule.name(), "String");
        assert_eq!(frame.rows[0].get_value(2), Some(&FrameValue::Float64(1.5)));
        assert_eq!(frame.rows[1].get_value(2), Some(&FrameValue::Null));
    }

    #[test]
    fn test_cell_error_names_column_and_rule() {
        let catalog = build_catalog();
        let mut builder =
            FrameBuilder::bind(&catalog, columns(&[("amount", "Decimal(15,2)")]));

        let err = builder
            .append_row(&[NativeValue::Text("not a decimal".to_string())])
            .unwrap_err();
        match err {
            FrameError::Cell {
                column,
                type_name,
                rule,
                source,
            } => {
                assert_eq!(column, "amount");
                assert_eq!(type_name, "Decimal(15,2)");
                assert_eq!(rule, "Decimal");
                assert!(matches!(source, ConversionError::ShapeMismatch { .. }));
            }
            other => panic!("expected cell error, got {other:?}"),
        }
    }

    #[test]
    fn test_unresolved_column_fails_on_first_cell() {
        let catalog = build_catalog();
        let mut builder = FrameBuilder::bind(&catalog, columns(&[("x", "Totally[Bogus]")]));
        assert!(builder.columns()[0].rule.is_unresolved());

        let err = builder
            .append_row(&[NativeValue::Text("anything".to_string())])
            .unwrap_err();
        match err {
            FrameError::Cell { source, .. } => {
                assert!(matches!(source, ConversionError::UnresolvedType { .. }));
            }
            other => panic!("expected cell error, got {other:?}"),
        }
    }

    #[test]
    fn test_column_count_mismatch() {
        let catalog = build_catalog();
        let mut builder = FrameBuilder::bind(&catalog, columns(&[("a", "UInt8"), ("b", "UInt8")]));
        let err = builder.append_row(&[NativeValue::UInt8(1)]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::ColumnCount {
                expected: 2,
                got: 1
            }
        ));
    }
}
