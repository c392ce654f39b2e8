use super::{DataTable, TableDefinition};
use crate::error::Result;
use crate::form::FormView;
use crate::formatter::FormattedRow;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// View-model handed to the renderer
///
/// Serializes with camelCase keys; `filteredRowsCount` is `null` when the
/// data source cannot compute it, and `filterForm` is only present when the
/// table has filter fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct TableView<'a, D> {
	/// Client-side column definitions, keyed by field
	pub columns: IndexMap<String, Map<String, Value>>,
	/// Formatted rows of the current page
	pub data: Vec<FormattedRow>,
	pub table_id: String,
	/// The table the view was built from
	#[serde(skip)]
	pub table: &'a DataTable<D>,
	pub unfiltered_rows_count: u64,
	pub filtered_rows_count: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filter_form: Option<FormView>,
	/// Template identifier from the `template` option
	pub template: String,
	/// CSS classes of the `<table>` element, from the layout
	pub table_class: String,
}

impl<D: TableDefinition> TableView<'_, D> {
	/// Serializes the view into a JSON value
	pub fn to_json(&self) -> Result<Value> {
		Ok(serde_json::to_value(self)?)
	}
}

impl<D> std::fmt::Debug for TableView<'_, D> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TableView")
			.field("table_id", &self.table_id)
			.field("columns", &self.columns)
			.field("data", &self.data)
			.field("unfiltered_rows_count", &self.unfiltered_rows_count)
			.field("filtered_rows_count", &self.filtered_rows_count)
			.field("filter_form", &self.filter_form)
			.field("template", &self.template)
			.field("table_class", &self.table_class)
			.finish_non_exhaustive()
	}
}

/// Server-side processing payload of the client grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AjaxResponse {
	/// Echo of the request's `draw`
	pub draw: Option<u64>,
	pub records_total: u64,
	/// `null` when the data source cannot compute it
	pub records_filtered: Option<u64>,
	pub data: Vec<FormattedRow>,
}

impl AjaxResponse {
	/// Wraps the payload in a JSON HTTP response
	pub fn into_http_response(self) -> Result<http::Response<Vec<u8>>> {
		let body = serde_json::to_vec(&self)?;
		http::Response::builder()
			.status(http::StatusCode::OK)
			.header(http::header::CONTENT_TYPE, "application/json")
			.body(body)
			.map_err(Into::into)
	}
}
