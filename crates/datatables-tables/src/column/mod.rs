//! Table columns
//!
//! A column binds a field of the data rows to a [`ColumnType`], which decides
//! which options the column accepts and how its cells render:
//!
//! - [`TextColumn`]: plain values
//! - [`LinkColumn`]: anchors built from row fields
//! - [`DateTimeColumn`]: reformatted dates
//! - [`BooleanColumn`]: labels for true/false
//!
//! Columns are declared as [`ColumnSpec`]s and become [`Column`]s once the
//! [`crate::builder::ColumnBuilder`] resolves their options.

pub mod base;
pub mod boolean;
pub mod datetime;
pub mod link;
pub mod text;

pub use boolean::BooleanColumn;
pub use datetime::DateTimeColumn;
pub use link::{LinkColumn, UrlCallback};
pub use text::TextColumn;

use crate::auth::{AllowAll, AuthorizationChecker};
use crate::error::Result;
use crate::row::Row;
use datatables_options::{OptionMap, OptionValue, Options, OptionsResolver};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// One cell being formatted
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
	/// Field the column is bound to
	pub field: &'a str,
	/// Value at `field`, or `None` when the row has no such value
	pub value: Option<&'a Value>,
	/// The whole row
	pub row: &'a Row,
}

/// Collaborators available while a column declares its options
#[derive(Debug, Clone)]
pub struct ColumnContext {
	pub authorization: Arc<dyn AuthorizationChecker>,
}

impl ColumnContext {
	pub fn new(authorization: Arc<dyn AuthorizationChecker>) -> Self {
		Self { authorization }
	}
}

impl Default for ColumnContext {
	fn default() -> Self {
		Self::new(Arc::new(AllowAll))
	}
}

/// Behavior of a kind of column
///
/// The provided methods implement the base column; a type overriding
/// `configure_options` or `format_cell` calls [`base::configure_options`] /
/// [`base::format_cell`] first.
pub trait ColumnType: Debug + Send + Sync {
	/// Identifier of the column type
	fn name(&self) -> &'static str;

	/// Declares the options this column type accepts
	fn configure_options(&self, resolver: &mut OptionsResolver, context: &ColumnContext) {
		base::configure_options(resolver, context);
	}

	/// Renders one cell with the column's final options
	fn format_cell(&self, cell: Cell<'_>, options: &Options) -> Result<String> {
		base::format_cell(cell, options)
	}

	/// Option keys exposed to the client grid
	fn client_side_keys(&self) -> &'static [&'static str] {
		base::CLIENT_SIDE_KEYS
	}
}

/// Declaration of a column: label, type and option overrides
///
/// # Examples
///
/// ```
/// use datatables_tables::column::ColumnSpec;
///
/// let spec = ColumnSpec::link("Name")
///     .option("LinkTextField", "name")
///     .option("width", "20%");
/// assert_eq!(spec.label(), "Name");
/// ```
#[derive(Debug, Clone)]
pub struct ColumnSpec {
	label: String,
	kind: Arc<dyn ColumnType>,
	overrides: OptionMap,
}

impl ColumnSpec {
	pub fn new(label: impl Into<String>, kind: impl ColumnType + 'static) -> Self {
		Self {
			label: label.into(),
			kind: Arc::new(kind),
			overrides: OptionMap::new(),
		}
	}

	pub fn text(label: impl Into<String>) -> Self {
		Self::new(label, TextColumn)
	}

	pub fn link(label: impl Into<String>) -> Self {
		Self::new(label, LinkColumn)
	}

	pub fn datetime(label: impl Into<String>) -> Self {
		Self::new(label, DateTimeColumn)
	}

	pub fn boolean(label: impl Into<String>) -> Self {
		Self::new(label, BooleanColumn)
	}

	/// Sets one option override
	pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
		self.overrides.insert(key.into(), value.into());
		self
	}

	/// Merges several option overrides
	pub fn options(mut self, overrides: OptionMap) -> Self {
		self.overrides.extend(overrides);
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	/// Resolves the declaration into a column bound to `field`
	pub(crate) fn resolve(self, field: String, context: &ColumnContext) -> Result<Column> {
		let mut resolver = OptionsResolver::new();
		self.kind.configure_options(&mut resolver, context);
		let options = resolver.resolve(self.overrides)?;

		tracing::trace!(field = %field, kind = self.kind.name(), "resolved column options");

		Ok(Column {
			field,
			label: self.label,
			kind: self.kind,
			resolver,
			options,
		})
	}
}

/// A declared column with resolved options
#[derive(Debug, Clone)]
pub struct Column {
	field: String,
	label: String,
	kind: Arc<dyn ColumnType>,
	resolver: OptionsResolver,
	options: Options,
}

impl Column {
	/// Row field (dot-separated path) this column renders
	pub fn field(&self) -> &str {
		&self.field
	}

	/// Header text
	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn kind(&self) -> &dyn ColumnType {
		self.kind.as_ref()
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn is_visible(&self) -> bool {
		self.options.get_bool(base::VISIBLE).unwrap_or(true)
	}

	/// Re-resolves the options with `overrides` layered over the current ones
	pub fn set_options(&mut self, overrides: OptionMap) -> Result<()> {
		let mut merged = self.options.to_map();
		merged.extend(overrides);
		self.options = self.resolver.resolve(merged)?;
		Ok(())
	}

	/// Renders the cell for `value`, the value at this column's field in `row`
	pub fn format_cell(&self, value: Option<&Value>, row: &Row) -> Result<String> {
		let cell = Cell {
			field: &self.field,
			value,
			row,
		};
		self.kind.format_cell(cell, &self.options)
	}

	/// Client-safe projection of the options, headed by the `title`.
	///
	/// Server-only options (callbacks, permissions, escaping) never appear.
	pub fn client_side_definition(&self) -> serde_json::Map<String, Value> {
		let mut definition = serde_json::Map::new();
		definition.insert("title".to_string(), Value::String(self.label.clone()));
		for key in self.kind.client_side_keys() {
			if let Some(value) = self.options.get(key).and_then(OptionValue::to_json) {
				definition.insert((*key).to_string(), value);
			}
		}
		definition
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use datatables_options::option_map;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_client_side_definition_excludes_server_keys() {
		let column = ColumnSpec::text("First name")
			.option("width", "20%")
			.option("permission", "x.y")
			.option("visible", true)
			.resolve("Learner.FirstName".to_string(), &ColumnContext::default())
			.unwrap();

		assert_eq!(
			Value::Object(column.client_side_definition()),
			json!({
				"title": "First name",
				"width": "20%",
				"visible": true,
				"sortable": true,
				"searchable": true,
				"class_name": "",
				"default_content": ""
			})
		);
	}

	#[rstest]
	fn test_set_options_keeps_previous_values() {
		let mut column = ColumnSpec::text("Name")
			.option("width", "10%")
			.resolve("name".to_string(), &ColumnContext::default())
			.unwrap();

		column.set_options(option_map! { "sortable" => false }).unwrap();

		assert_eq!(column.options().get_str("width"), Ok("10%"));
		assert_eq!(column.options().get_bool("sortable"), Ok(false));
	}

	#[rstest]
	fn test_set_options_validates() {
		let mut column = ColumnSpec::text("Name")
			.resolve("name".to_string(), &ColumnContext::default())
			.unwrap();

		assert!(column.set_options(option_map! { "sortable" => "yes" }).is_err());
		assert_eq!(column.options().get_bool("sortable"), Ok(true));
	}

	#[rstest]
	fn test_unknown_option_rejected_at_declaration() {
		let result = ColumnSpec::text("Name")
			.option("colour", "red")
			.resolve("name".to_string(), &ColumnContext::default());

		assert!(result.is_err());
	}
}
