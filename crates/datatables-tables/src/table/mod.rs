//! Tables
//!
//! A concrete table implements [`TableDefinition`]: it declares its columns
//! and answers for its data. [`DataTable`] wraps a definition with everything
//! shared: table options, the memoized filter form, request handling, row
//! formatting and the view-model.
//!
//! ```
//! use datatables_tables::prelude::*;
//!
//! struct Learners(MemoryDataSource);
//!
//! impl TableDefinition for Learners {
//!     fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
//!         builder
//!             .add("name", ColumnSpec::text("Name"))?
//!             .add("active", ColumnSpec::boolean("Active"))?;
//!         Ok(())
//!     }
//!
//!     fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
//!         self.0.iterate(request)
//!     }
//!
//!     fn unfiltered_count(&self) -> Result<u64> {
//!         self.0.count_all()
//!     }
//!
//!     fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
//!         self.0.count_filtered(request)
//!     }
//! }
//!
//! let source = MemoryDataSource::from_values([serde_json::json!({"name": "Ann", "active": true})]);
//! let mut table = DataTable::builder(Learners(source)).table_id("learners")?.build()?;
//! table.handle_query("draw=1&start=0&length=10")?;
//!
//! let view = table.build_view()?;
//! assert_eq!(view.data[0]["active"], "✓");
//! assert_eq!(view.unfiltered_rows_count, 1);
//! # Ok::<(), TableError>(())
//! ```

mod services;
mod view;

pub use services::TableServices;
pub use view::{AjaxResponse, TableView};

use crate::builder::{ColumnBuilder, ColumnSet};
use crate::column::ColumnContext;
use crate::datasource::RowIter;
use crate::error::{Result, TableError};
use crate::form::{FieldType, Form, FormBuilder};
use crate::formatter::{FormattedRow, Formatter, ValueFormatter};
use crate::layout::{Bootstrap, Layout};
use crate::request::{PaginateRequest, query_params, request_params};
use datatables_options::{
	OptionMap, OptionType, OptionValue, Options, OptionsError, OptionsResolver,
};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Client grid layout, an `Arc<dyn Layout>` object
pub const LAYOUT: &str = "layout";
/// Filter, sort and paginate in the browser instead of over ajax
pub const CLIENT_SIDE_FILTERING: &str = "client_side_filtering";
/// Reload the table whenever a filter form field changes
pub const FILTER_RELOAD_TABLE_ON_CHANGE: &str = "filter_reload_table_on_change";
/// Template identifier handed to the renderer
pub const TEMPLATE: &str = "template";
/// Extra options passed verbatim to the client grid
pub const DATA_TABLE_CUSTOM_OPTIONS: &str = "data_table_custom_options";
/// Whether the filter form has fields besides its submit control
pub const HAS_FILTER_FORM: &str = "has_filter_form";
/// URL the client grid fetches rows from, `null` when unavailable
pub const AJAX_URL: &str = "ajax_url";

/// The capabilities a concrete table supplies
pub trait TableDefinition: Send + Sync {
	/// Declares the table's columns
	fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()>;

	/// Declares table options beyond the shared ones
	fn configure_options(&self, _resolver: &mut OptionsResolver) {}

	/// Adds filter fields; `builder` already holds the submit control
	fn build_filter_form(&self, builder: FormBuilder) -> FormBuilder {
		builder
	}

	/// Extra parameters of the ajax URL
	fn ajax_additional_parameters(&self) -> IndexMap<String, String> {
		IndexMap::new()
	}

	/// Rows of the requested page, filtered, sorted and sliced per `request`
	fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>>;

	/// Row count ignoring every filter and search criterion
	fn unfiltered_count(&self) -> Result<u64>;

	/// Row count after filtering, `None` when it cannot be computed
	fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>>;
}

/// Assembles a [`DataTable`]
pub struct DataTableBuilder<D> {
	definition: D,
	table_id: Option<String>,
	services: TableServices,
	formatter: Arc<dyn Formatter>,
	layout: Arc<dyn Layout>,
	overrides: OptionMap,
}

impl<D: TableDefinition> DataTableBuilder<D> {
	pub fn new(definition: D) -> Self {
		Self {
			definition,
			table_id: None,
			services: TableServices::default(),
			formatter: Arc::new(ValueFormatter),
			layout: Arc::new(Bootstrap),
			overrides: OptionMap::new(),
		}
	}

	/// Sets the table identifier; it can only be set once
	pub fn table_id(mut self, table_id: impl Into<String>) -> Result<Self> {
		if let Some(existing) = &self.table_id {
			return Err(TableError::TableIdAlreadySet(existing.clone()));
		}
		self.table_id = Some(table_id.into());
		Ok(self)
	}

	pub fn services(mut self, services: TableServices) -> Self {
		self.services = services;
		self
	}

	pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
		self.formatter = Arc::new(formatter);
		self
	}

	/// Default value of the `layout` option
	pub fn layout(mut self, layout: impl Layout + 'static) -> Self {
		self.layout = Arc::new(layout);
		self
	}

	/// Option overrides applied at construction
	pub fn options(mut self, overrides: OptionMap) -> Self {
		self.overrides.extend(overrides);
		self
	}

	/// Declares the columns and resolves the options
	///
	/// The filter form is built here only when `has_filter_form` has to be
	/// derived from it; otherwise on the first [`DataTable::filter_form`] call.
	pub fn build(self) -> Result<DataTable<D>> {
		let table_id = self.table_id.ok_or(TableError::TableIdNotSet)?;
		let settings = &self.services.settings;

		let mut columns = ColumnBuilder::new(ColumnContext::new(Arc::clone(
			&self.services.authorization,
		)));
		self.definition.build_columns(&mut columns)?;
		let columns = columns.into_columns();

		let mut resolver = OptionsResolver::new();
		resolver
			.set_default(LAYOUT, OptionValue::object(self.layout))
			.set_allowed_types(LAYOUT, &[OptionType::Object])
			.set_default(CLIENT_SIDE_FILTERING, false)
			.set_allowed_types(CLIENT_SIDE_FILTERING, &[OptionType::Bool])
			.set_default(FILTER_RELOAD_TABLE_ON_CHANGE, false)
			.set_allowed_types(FILTER_RELOAD_TABLE_ON_CHANGE, &[OptionType::Bool])
			.set_default(TEMPLATE, settings.default_template.as_str())
			.set_allowed_types(TEMPLATE, &[OptionType::String])
			.set_default(DATA_TABLE_CUSTOM_OPTIONS, Map::new())
			.set_allowed_types(DATA_TABLE_CUSTOM_OPTIONS, &[OptionType::Map])
			.set_allowed_types(HAS_FILTER_FORM, &[OptionType::Bool]);

		let filter_form = OnceLock::new();
		if self.overrides.contains_key(HAS_FILTER_FORM) {
			resolver.set_default(HAS_FILTER_FORM, false);
		} else {
			let field_count = filter_form
				.get_or_init(|| build_filter_form(&self.definition, &self.services, &table_id))
				.count();
			resolver.set_lazy_default(HAS_FILTER_FORM, move |_| Ok((field_count > 1).into()));
		}

		let router = Arc::clone(&self.services.router);
		let route = settings.ajax_route.clone();
		let mut params = IndexMap::from([("table_id".to_string(), table_id.clone())]);
		params.extend(self.definition.ajax_additional_parameters());
		resolver
			.set_lazy_default(AJAX_URL, move |options| {
				let Some(route) = &route else {
					return Ok(OptionValue::Null);
				};
				if options.get_bool(CLIENT_SIDE_FILTERING)? {
					return Ok(OptionValue::Null);
				}
				router
					.build_url(route, &params)
					.map(OptionValue::from)
					.map_err(|e| OptionsError::Provider {
						key: AJAX_URL.to_string(),
						message: e.to_string(),
					})
			})
			.set_allowed_types(AJAX_URL, &[OptionType::String, OptionType::Null]);

		self.definition.configure_options(&mut resolver);
		let options = resolver.resolve(self.overrides)?;

		tracing::debug!(
			table_id = %table_id,
			columns = columns.len(),
			filter_fields = ?filter_form.get().map(Form::count),
			"data table built"
		);

		Ok(DataTable {
			definition: self.definition,
			table_id,
			services: self.services,
			formatter: self.formatter,
			columns,
			resolver,
			options: Some(options),
			filter_form,
			current_request: None,
		})
	}
}

fn build_filter_form<D: TableDefinition>(
	definition: &D,
	services: &TableServices,
	table_id: &str,
) -> Form {
	let settings = &services.settings;
	let name = format!("{}{}", table_id, settings.filter_form_suffix);
	let builder = services
		.form_factory
		.create_named_builder(&name)
		.add(settings.filter_submit_field.as_str(), FieldType::Button);
	definition.build_filter_form(builder).get_form()
}

/// A table definition bound to its columns, options and current request
pub struct DataTable<D> {
	definition: D,
	table_id: String,
	services: TableServices,
	formatter: Arc<dyn Formatter>,
	columns: ColumnSet,
	resolver: OptionsResolver,
	options: Option<Options>,
	filter_form: OnceLock<Form>,
	current_request: Option<PaginateRequest>,
}

impl<D: TableDefinition> DataTable<D> {
	pub fn builder(definition: D) -> DataTableBuilder<D> {
		DataTableBuilder::new(definition)
	}

	pub fn table_id(&self) -> &str {
		&self.table_id
	}

	pub fn definition(&self) -> &D {
		&self.definition
	}

	pub fn services(&self) -> &TableServices {
		&self.services
	}

	pub fn columns(&self) -> &ColumnSet {
		&self.columns
	}

	/// Columns, for per-column reconfiguration through `Column::set_options`
	pub fn columns_mut(&mut self) -> &mut ColumnSet {
		&mut self.columns
	}

	/// The resolved table options
	pub fn options(&self) -> Result<&Options> {
		self.options
			.as_ref()
			.ok_or(TableError::Unresolved("table options"))
	}

	/// Re-resolves the table options with `overrides` layered over the
	/// current values
	///
	/// Derived values (`has_filter_form`, `ajax_url`) keep their resolved
	/// values unless overridden, and the built filter form is kept. On error
	/// the previous options stay in place.
	pub fn set_options(&mut self, overrides: OptionMap) -> Result<()> {
		let mut merged = self.options()?.to_map();
		merged.extend(overrides);
		let options = self.resolver.resolve(merged)?;
		tracing::debug!(table_id = %self.table_id, "table options updated");
		self.options = Some(options);
		Ok(())
	}

	pub fn set_formatter(&mut self, formatter: impl Formatter + 'static) {
		self.formatter = Arc::new(formatter);
	}

	/// The layout held by the `layout` option
	pub fn layout(&self) -> Result<&dyn Layout> {
		let value = self.options()?.require(LAYOUT)?;
		value
			.downcast_object::<Arc<dyn Layout>>()
			.map(|layout| layout.as_ref())
			.ok_or_else(|| {
				TableError::Options(OptionsError::InvalidOptionType {
					key: LAYOUT.to_string(),
					actual: value.option_type(),
					expected: "Arc<dyn Layout>".to_string(),
				})
			})
	}

	/// The filter form, built on first access and memoized
	pub fn filter_form(&self) -> &Form {
		self.filter_form
			.get_or_init(|| build_filter_form(&self.definition, &self.services, &self.table_id))
	}

	/// The memoized filter form, without building it
	pub fn cached_filter_form(&self) -> Result<&Form> {
		self.filter_form.get().ok_or(TableError::FilterFormNotBuilt)
	}

	/// Parses and stores the parameters of an HTTP request
	pub fn handle_request<B: AsRef<[u8]>>(
		&mut self,
		request: &http::Request<B>,
	) -> Result<&PaginateRequest> {
		self.handle_params(&request_params(request))
	}

	/// Parses and stores a form-encoded query string
	pub fn handle_query(&mut self, query: &str) -> Result<&PaginateRequest> {
		self.handle_params(&query_params(query))
	}

	/// Parses and stores already decoded request parameters
	pub fn handle_params<S: std::hash::BuildHasher>(
		&mut self,
		params: &HashMap<String, String, S>,
	) -> Result<&PaginateRequest> {
		let request = PaginateRequest::from_params(
			params,
			&self.columns,
			Some(self.filter_form()),
			&self.services.settings,
		)?;
		Ok(&*self.current_request.insert(request))
	}

	pub fn current_request(&self) -> Option<&PaginateRequest> {
		self.current_request.as_ref()
	}

	/// Client-side definition of every column, keyed by field, in column order
	pub fn client_side_columns(&self) -> IndexMap<String, Map<String, Value>> {
		self.columns
			.iter()
			.map(|column| (column.field().to_string(), column.client_side_definition()))
			.collect()
	}

	/// Consumes the data iterator once, formatting every row
	pub fn output_rows(&self) -> Result<Vec<FormattedRow>> {
		self.definition
			.data_iterator(self.current_request.as_ref())?
			.map(|row| self.formatter.format_row(&row, &self.columns))
			.collect()
	}

	/// Assembles the view-model handed to the renderer
	pub fn build_view(&self) -> Result<TableView<'_, D>> {
		let options = self.options()?;
		let request = self.current_request.as_ref();

		let filter_form = if options.get_bool(HAS_FILTER_FORM)? {
			Some(self.filter_form().create_view())
		} else {
			None
		};

		let view = TableView {
			columns: self.client_side_columns(),
			data: self.output_rows()?,
			table_id: self.table_id.clone(),
			table: self,
			unfiltered_rows_count: self.definition.unfiltered_count()?,
			filtered_rows_count: self.definition.filtered_count(request)?,
			filter_form,
			template: options.get_str(TEMPLATE)?.to_string(),
			table_class: self.layout()?.table_class().to_string(),
		};

		tracing::debug!(
			table_id = %self.table_id,
			rows = view.data.len(),
			unfiltered = view.unfiltered_rows_count,
			filtered = ?view.filtered_rows_count,
			"table view built"
		);
		Ok(view)
	}

	/// The server-side processing payload for the current request
	pub fn ajax_response(&self) -> Result<AjaxResponse> {
		let request = self.current_request.as_ref();
		Ok(AjaxResponse {
			draw: request.and_then(|r| r.draw),
			records_total: self.definition.unfiltered_count()?,
			records_filtered: self.definition.filtered_count(request)?,
			data: self.output_rows()?,
		})
	}

	/// Options for the client grid constructor
	///
	/// `data_table_custom_options` is merged last and wins over the
	/// generated keys.
	pub fn client_configuration(&self) -> Result<Value> {
		let options = self.options()?;
		let server_side = !options.get_bool(CLIENT_SIDE_FILTERING)?;

		let columns = self
			.columns
			.iter()
			.map(|column| {
				let mut definition = column.client_side_definition();
				definition.insert("data".to_string(), Value::String(column.field().to_string()));
				Value::Object(definition)
			})
			.collect();

		let mut configuration = Map::new();
		configuration.insert("dom".to_string(), Value::String(self.layout()?.dom().to_string()));
		configuration.insert("columns".to_string(), Value::Array(columns));
		configuration.insert("serverSide".to_string(), Value::Bool(server_side));
		if server_side {
			if let Some(url) = options.get_opt_str(AJAX_URL)? {
				configuration.insert("ajax".to_string(), Value::String(url.to_string()));
			}
		}

		if let Some(custom) = options.require(DATA_TABLE_CUSTOM_OPTIONS)?.as_map() {
			configuration.extend(custom.clone());
		}
		Ok(Value::Object(configuration))
	}
}

impl<D> std::fmt::Debug for DataTable<D> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DataTable")
			.field("table_id", &self.table_id)
			.field("columns", &self.columns)
			.field("options", &self.options)
			.field("current_request", &self.current_request)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::ColumnSpec;
	use crate::datasource::{DataSource, MemoryDataSource};
	use crate::layout::Plain;
	use datatables_options::option_map;
	use rstest::{fixture, rstest};
	use serde_json::json;

	struct Learners {
		source: MemoryDataSource,
		with_filters: bool,
	}

	impl TableDefinition for Learners {
		fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
			builder
				.add("name", ColumnSpec::text("Name"))?
				.add("city", ColumnSpec::text("City"))?;
			Ok(())
		}

		fn build_filter_form(&self, builder: FormBuilder) -> FormBuilder {
			if self.with_filters {
				builder.add("city", FieldType::Text)
			} else {
				builder
			}
		}

		fn ajax_additional_parameters(&self) -> IndexMap<String, String> {
			IndexMap::from([("group".to_string(), "7".to_string())])
		}

		fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
			self.source.iterate(request)
		}

		fn unfiltered_count(&self) -> Result<u64> {
			self.source.count_all()
		}

		fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
			self.source.count_filtered(request)
		}
	}

	#[fixture]
	fn learners() -> Learners {
		Learners {
			source: MemoryDataSource::from_values([
				json!({"name": "Ann", "city": "Paris"}),
				json!({"name": "Bob", "city": "Oslo"}),
			]),
			with_filters: false,
		}
	}

	#[rstest]
	fn test_build_requires_table_id(learners: Learners) {
		assert!(matches!(
			DataTable::builder(learners).build(),
			Err(TableError::TableIdNotSet)
		));
	}

	#[rstest]
	fn test_table_id_set_once(learners: Learners) {
		let result = DataTable::builder(learners)
			.table_id("a")
			.and_then(|builder| builder.table_id("b"));
		assert!(matches!(result, Err(TableError::TableIdAlreadySet(id)) if id == "a"));
	}

	#[rstest]
	fn test_default_options(learners: Learners) {
		let table = DataTable::builder(learners).table_id("learners").unwrap().build().unwrap();
		let options = table.options().unwrap();

		assert_eq!(options.get_bool(CLIENT_SIDE_FILTERING), Ok(false));
		assert_eq!(options.get_bool(FILTER_RELOAD_TABLE_ON_CHANGE), Ok(false));
		assert_eq!(options.get_str(TEMPLATE), Ok("datatables/default_table.html"));
		assert_eq!(options.get_bool(HAS_FILTER_FORM), Ok(false));
		assert_eq!(options.get_str(AJAX_URL), Ok("/datatables/learners?group=7"));
		assert_eq!(table.layout().unwrap().name(), "bootstrap");
	}

	#[rstest]
	fn test_filter_form_naming(mut learners: Learners) {
		learners.with_filters = true;
		let table = DataTable::builder(learners).table_id("learners").unwrap().build().unwrap();

		let form = table.cached_filter_form().unwrap();
		assert_eq!(form.name(), "learners_filter");
		assert_eq!(form.field("dofilter").unwrap().field_type(), FieldType::Button);
		assert_eq!(form.count(), 2);
		assert!(std::ptr::eq(form, table.filter_form()));
	}

	#[rstest]
	fn test_filter_form_built_on_demand(mut learners: Learners) {
		learners.with_filters = true;
		let table = DataTable::builder(learners)
			.table_id("learners")
			.unwrap()
			.options(option_map! { "has_filter_form" => false })
			.build()
			.unwrap();

		assert!(matches!(table.cached_filter_form(), Err(TableError::FilterFormNotBuilt)));
		assert_eq!(table.filter_form().count(), 2);
		assert!(std::ptr::eq(table.cached_filter_form().unwrap(), table.filter_form()));
		assert_eq!(table.options().unwrap().get_bool(HAS_FILTER_FORM), Ok(false));
	}

	#[rstest]
	fn test_client_side_filtering_disables_ajax(learners: Learners) {
		let table = DataTable::builder(learners)
			.table_id("learners")
			.unwrap()
			.layout(Plain)
			.options(option_map! { "client_side_filtering" => true })
			.build()
			.unwrap();

		assert_eq!(table.options().unwrap().get(AJAX_URL), Some(&OptionValue::Null));
		let configuration = table.client_configuration().unwrap();
		assert_eq!(configuration["serverSide"], json!(false));
		assert_eq!(configuration["dom"], json!("lfrtip"));
		assert!(configuration.get("ajax").is_none());
	}

	#[rstest]
	fn test_client_configuration(learners: Learners) {
		let table = DataTable::builder(learners)
			.table_id("learners")
			.unwrap()
			.options(option_map! {
				"data_table_custom_options" => json!({"pageLength": 25, "serverSide": true}),
			})
			.build()
			.unwrap();

		let configuration = table.client_configuration().unwrap();
		assert_eq!(configuration["ajax"], json!("/datatables/learners?group=7"));
		assert_eq!(configuration["pageLength"], json!(25));
		assert_eq!(configuration["columns"][1]["data"], json!("city"));
		assert_eq!(configuration["columns"][1]["title"], json!("City"));
	}

	#[rstest]
	fn test_unknown_ajax_route_fails_construction(learners: Learners) {
		let mut services = TableServices::default();
		services.router = Arc::new(crate::urls::RouteMap::new());

		let result = DataTable::builder(learners)
			.table_id("learners")
			.unwrap()
			.services(services)
			.build();
		assert!(matches!(
			result,
			Err(TableError::Options(OptionsError::Provider { ref key, .. })) if key == "ajax_url"
		));
	}

	#[rstest]
	fn test_failed_set_options_keeps_previous(learners: Learners) {
		let mut table = DataTable::builder(learners).table_id("t").unwrap().build().unwrap();
		let before = table.options().unwrap().clone();

		assert!(table.set_options(option_map! { "template" => 3 }).is_err());
		assert_eq!(table.options().unwrap(), &before);
	}

	#[rstest]
	fn test_ajax_response(learners: Learners) {
		let mut table = DataTable::builder(learners).table_id("t").unwrap().build().unwrap();
		table.handle_query("draw=4&search%5Bvalue%5D=oslo").unwrap();

		let response = serde_json::to_value(table.ajax_response().unwrap()).unwrap();
		assert_eq!(
			response,
			json!({
				"draw": 4,
				"recordsTotal": 2,
				"recordsFiltered": 1,
				"data": [{"name": "Bob", "city": "Oslo"}]
			})
		);
	}
}
