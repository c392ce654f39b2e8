//! Table registry for lookup by name
//!
//! Applications register a factory per table under a name; the ajax endpoint
//! then builds the table named in its route without knowing its type. The
//! registry name doubles as the table id, so the id in the ajax URL resolves
//! back to the same table.

use crate::error::{Result, TableError};
use crate::table::{AjaxResponse, DataTable, TableDefinition, TableServices};
use datatables_options::{OptionMap, Options};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased table.
pub trait AnyTable: Send {
	fn table_id(&self) -> &str;

	/// Parses and stores a form-encoded query string
	fn handle_query(&mut self, query: &str) -> Result<()>;

	/// Parses and stores decoded request parameters
	fn handle_params(&mut self, params: &HashMap<String, String>) -> Result<()>;

	fn options(&self) -> Result<&Options>;

	fn set_options(&mut self, overrides: OptionMap) -> Result<()>;

	/// The serialized view-model
	fn view(&self) -> Result<Value>;

	fn ajax_response(&self) -> Result<AjaxResponse>;

	fn client_configuration(&self) -> Result<Value>;
}

impl<D: TableDefinition> AnyTable for DataTable<D> {
	fn table_id(&self) -> &str {
		DataTable::table_id(self)
	}

	fn handle_query(&mut self, query: &str) -> Result<()> {
		DataTable::handle_query(self, query).map(|_| ())
	}

	fn handle_params(&mut self, params: &HashMap<String, String>) -> Result<()> {
		DataTable::handle_params(self, params).map(|_| ())
	}

	fn options(&self) -> Result<&Options> {
		DataTable::options(self)
	}

	fn set_options(&mut self, overrides: OptionMap) -> Result<()> {
		DataTable::set_options(self, overrides)
	}

	fn view(&self) -> Result<Value> {
		self.build_view()?.to_json()
	}

	fn ajax_response(&self) -> Result<AjaxResponse> {
		DataTable::ajax_response(self)
	}

	fn client_configuration(&self) -> Result<Value> {
		DataTable::client_configuration(self)
	}
}

type TableFactory = Arc<dyn Fn(&str, &TableServices) -> Result<Box<dyn AnyTable>> + Send + Sync>;

/// Named table factories
///
/// # Examples
///
/// ```
/// use datatables_tables::prelude::*;
///
/// struct Empty;
///
/// impl TableDefinition for Empty {
///     fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
///         builder.add("name", ColumnSpec::text("Name"))?;
///         Ok(())
///     }
///     fn data_iterator(&self, _: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
///         Ok(Box::new(std::iter::empty()))
///     }
///     fn unfiltered_count(&self) -> Result<u64> {
///         Ok(0)
///     }
///     fn filtered_count(&self, _: Option<&PaginateRequest>) -> Result<Option<u64>> {
///         Ok(Some(0))
///     }
/// }
///
/// let mut registry = DataTableRegistry::new();
/// registry.register("empty", || Empty);
///
/// let table = registry.create("empty", &TableServices::default())?;
/// assert_eq!(table.table_id(), "empty");
/// assert!(registry.create("missing", &TableServices::default()).is_err());
/// # Ok::<(), TableError>(())
/// ```
#[derive(Clone, Default)]
pub struct DataTableRegistry {
	factories: IndexMap<String, TableFactory>,
}

impl DataTableRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) the factory of table `name`
	pub fn register<D, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
	where
		D: TableDefinition + 'static,
		F: Fn() -> D + Send + Sync + 'static,
	{
		let name = name.into();
		tracing::debug!(table = %name, "registering table");
		self.factories.insert(
			name,
			Arc::new(move |table_id: &str, services: &TableServices| -> Result<Box<dyn AnyTable>> {
				let table = DataTable::builder(factory())
					.table_id(table_id)?
					.services(services.clone())
					.build()?;
				Ok(Box::new(table))
			}),
		);
		self
	}

	/// Builds a fresh instance of table `name`
	pub fn create(&self, name: &str, services: &TableServices) -> Result<Box<dyn AnyTable>> {
		let factory = self.factories.get(name).ok_or_else(|| {
			tracing::warn!(table = name, "unknown table requested");
			TableError::UnknownTable(name.to_string())
		})?;
		factory(name, services)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Registered names, in registration order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.factories.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

impl std::fmt::Debug for DataTableRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataTableRegistry")
			.field("tables", &self.factories.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::ColumnBuilder;
	use crate::column::ColumnSpec;
	use crate::datasource::{DataSource, MemoryDataSource, RowIter};
	use crate::request::PaginateRequest;
	use datatables_options::option_map;
	use rstest::rstest;
	use serde_json::json;

	struct Cities(MemoryDataSource);

	impl TableDefinition for Cities {
		fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
			builder.add("city", ColumnSpec::text("City"))?;
			Ok(())
		}

		fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
			self.0.iterate(request)
		}

		fn unfiltered_count(&self) -> Result<u64> {
			self.0.count_all()
		}

		fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
			self.0.count_filtered(request)
		}
	}

	fn registry() -> DataTableRegistry {
		let mut registry = DataTableRegistry::new();
		registry.register("cities", || {
			Cities(MemoryDataSource::from_values([
				json!({"city": "Oslo"}),
				json!({"city": "Paris"}),
			]))
		});
		registry
	}

	#[rstest]
	fn test_registry_name_is_table_id() {
		let table = registry().create("cities", &TableServices::default()).unwrap();

		assert_eq!(table.table_id(), "cities");
		assert_eq!(
			table.options().unwrap().get_str("ajax_url"),
			Ok("/datatables/cities")
		);
	}

	#[rstest]
	fn test_unknown_table() {
		assert!(matches!(
			registry().create("towns", &TableServices::default()),
			Err(TableError::UnknownTable(name)) if name == "towns"
		));
	}

	#[rstest]
	fn test_instances_are_independent() {
		let registry = registry();
		let mut first = registry.create("cities", &TableServices::default()).unwrap();
		let second = registry.create("cities", &TableServices::default()).unwrap();

		first
			.set_options(option_map! { "client_side_filtering" => true })
			.unwrap();

		assert_eq!(first.options().unwrap().get_bool("client_side_filtering"), Ok(true));
		assert_eq!(second.options().unwrap().get_bool("client_side_filtering"), Ok(false));
	}

	#[rstest]
	fn test_erased_request_handling() {
		let mut table = registry().create("cities", &TableServices::default()).unwrap();
		table.handle_query("draw=2&length=1&order[0][column]=0&order[0][dir]=desc").unwrap();

		let response = table.ajax_response().unwrap();
		assert_eq!(response.draw, Some(2));
		assert_eq!(response.data.len(), 1);
		assert_eq!(response.data[0]["city"], "Paris");

		let view = table.view().unwrap();
		assert_eq!(view["tableId"], json!("cities"));
		assert_eq!(view["filteredRowsCount"], json!(2));
	}

	#[rstest]
	fn test_names_in_registration_order() {
		let mut registry = registry();
		registry.register("towns", || Cities(MemoryDataSource::default()));

		assert_eq!(registry.names().collect::<Vec<_>>(), ["cities", "towns"]);
		assert_eq!(registry.len(), 2);
		assert!(registry.contains("towns"));
	}
}
