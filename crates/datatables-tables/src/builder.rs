//! Column declaration

use crate::column::{Column, ColumnContext, ColumnSpec};
use crate::error::{Result, TableError};
use indexmap::IndexMap;

/// Ordered mapping of field to [`Column`]
///
/// Iteration follows declaration order, which is also the order of the
/// rendered header, of every formatted row and of the client-side column
/// definitions.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
	columns: IndexMap<String, Column>,
}

impl ColumnSet {
	pub fn get(&self, field: &str) -> Option<&Column> {
		self.columns.get(field)
	}

	pub fn get_mut(&mut self, field: &str) -> Option<&mut Column> {
		self.columns.get_mut(field)
	}

	/// Column at `index` in declaration order
	pub fn get_index(&self, index: usize) -> Option<&Column> {
		self.columns.get_index(index).map(|(_, column)| column)
	}

	pub fn contains(&self, field: &str) -> bool {
		self.columns.contains_key(field)
	}

	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.columns.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Column> {
		self.columns.values()
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}
}

impl<'a> IntoIterator for &'a ColumnSet {
	type Item = &'a Column;
	type IntoIter = indexmap::map::Values<'a, String, Column>;

	fn into_iter(self) -> Self::IntoIter {
		self.columns.values()
	}
}

/// Collects a table's columns
///
/// Options are resolved as each column is added, so configuration mistakes
/// fail at declaration time.
///
/// # Examples
///
/// ```
/// use datatables_tables::builder::ColumnBuilder;
/// use datatables_tables::column::ColumnSpec;
///
/// let mut builder = ColumnBuilder::default();
/// builder
///     .add("Learner.LastName", ColumnSpec::text("Last name"))?
///     .add("Learner.FirstName", ColumnSpec::text("First name"))?;
///
/// let fields: Vec<&str> = builder.columns().fields().collect();
/// assert_eq!(fields, ["Learner.LastName", "Learner.FirstName"]);
/// assert!(builder.add("Learner.LastName", ColumnSpec::text("Again")).is_err());
/// # Ok::<(), datatables_tables::TableError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnBuilder {
	context: ColumnContext,
	columns: ColumnSet,
}

impl ColumnBuilder {
	pub fn new(context: ColumnContext) -> Self {
		Self {
			context,
			columns: ColumnSet::default(),
		}
	}

	/// Declares a column bound to `field`
	pub fn add(&mut self, field: impl Into<String>, spec: ColumnSpec) -> Result<&mut Self> {
		let field = field.into();
		if field.is_empty() {
			return Err(TableError::EmptyField(spec.label().to_string()));
		}
		if self.columns.contains(&field) {
			return Err(TableError::DuplicateColumn(field));
		}

		let column = spec.resolve(field.clone(), &self.context)?;
		tracing::debug!(field = %field, label = column.label(), "column declared");
		self.columns.columns.insert(field, column);
		Ok(self)
	}

	pub fn columns(&self) -> &ColumnSet {
		&self.columns
	}

	pub fn into_columns(self) -> ColumnSet {
		self.columns
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_field_rejected() {
		let mut builder = ColumnBuilder::default();
		assert!(matches!(
			builder.add("", ColumnSpec::text("Nothing")),
			Err(TableError::EmptyField(label)) if label == "Nothing"
		));
	}

	#[rstest]
	fn test_duplicate_keeps_first_declaration() {
		let mut builder = ColumnBuilder::default();
		builder.add("name", ColumnSpec::text("First")).unwrap();

		assert!(matches!(
			builder.add("name", ColumnSpec::text("Second")),
			Err(TableError::DuplicateColumn(field)) if field == "name"
		));
		assert_eq!(builder.columns().len(), 1);
		assert_eq!(builder.columns().get("name").unwrap().label(), "First");
	}

	#[rstest]
	fn test_failed_declaration_adds_nothing() {
		let mut builder = ColumnBuilder::default();
		assert!(builder.add("name", ColumnSpec::link("Name")).is_err());
		assert!(builder.columns().is_empty());
	}

	#[rstest]
	fn test_index_access() {
		let mut builder = ColumnBuilder::default();
		builder
			.add("a", ColumnSpec::text("A"))
			.unwrap()
			.add("b", ColumnSpec::boolean("B"))
			.unwrap();

		let columns = builder.into_columns();
		assert_eq!(columns.get_index(1).map(Column::field), Some("b"));
		assert!(columns.get_index(2).is_none());
	}
}
