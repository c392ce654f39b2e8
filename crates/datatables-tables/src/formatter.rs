//! Row formatting

use crate::builder::ColumnSet;
use crate::error::Result;
use crate::row::{Row, lookup};
use indexmap::IndexMap;
use std::fmt::Debug;

/// A rendered row: field to cell text, in column order
pub type FormattedRow = IndexMap<String, String>;

/// Turns raw rows into rendered rows
pub trait Formatter: Debug + Send + Sync {
	/// Renders `row` with every column of `columns`, in column order
	fn format_row(&self, row: &Row, columns: &ColumnSet) -> Result<FormattedRow>;
}

/// Looks up each column's field path and lets the column render the cell
///
/// Missing values reach the column as `None`; whether that is an error is
/// up to the column type.
///
/// # Examples
///
/// ```
/// use datatables_tables::builder::ColumnBuilder;
/// use datatables_tables::column::ColumnSpec;
/// use datatables_tables::formatter::{Formatter, ValueFormatter};
/// use serde_json::json;
///
/// let mut builder = ColumnBuilder::default();
/// builder
///     .add("Learner.LastName", ColumnSpec::text("Last name"))?
///     .add("Learner.FirstName", ColumnSpec::text("First name"))?;
///
/// let row = json!({"Learner": {"FirstName": "Ann", "LastName": "Lee"}});
/// let formatted = ValueFormatter.format_row(row.as_object().unwrap(), builder.columns())?;
///
/// let cells: Vec<&str> = formatted.values().map(String::as_str).collect();
/// assert_eq!(cells, ["Lee", "Ann"]);
/// # Ok::<(), datatables_tables::TableError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueFormatter;

impl Formatter for ValueFormatter {
	fn format_row(&self, row: &Row, columns: &ColumnSet) -> Result<FormattedRow> {
		columns
			.iter()
			.map(|column| {
				let value = lookup(row, column.field());
				Ok((column.field().to_string(), column.format_cell(value, row)?))
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::ColumnBuilder;
	use crate::column::ColumnSpec;
	use crate::error::TableError;
	use crate::row::into_row;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_missing_intermediate_key_renders_blank() {
		let mut builder = ColumnBuilder::default();
		builder.add("Manager.Name", ColumnSpec::text("Manager")).unwrap();
		let row = into_row(json!({"Learner": {"FirstName": "Ann"}})).unwrap();

		let formatted = ValueFormatter.format_row(&row, builder.columns()).unwrap();
		assert_eq!(formatted["Manager.Name"], "");
	}

	#[rstest]
	fn test_link_failure_propagates() {
		let mut builder = ColumnBuilder::default();
		builder
			.add("name", ColumnSpec::link("Name").option("LinkTextField", "name"))
			.unwrap();
		let row = into_row(json!({"other": 1})).unwrap();

		assert!(matches!(
			ValueFormatter.format_row(&row, builder.columns()),
			Err(TableError::MissingField { .. })
		));
	}

	#[rstest]
	fn test_no_columns_yields_empty_row() {
		let row = into_row(json!({"a": 1})).unwrap();
		let formatted = ValueFormatter
			.format_row(&row, &ColumnSet::default())
			.unwrap();
		assert!(formatted.is_empty());
	}
}
