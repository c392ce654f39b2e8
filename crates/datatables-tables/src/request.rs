//! Paginated data requests
//!
//! Parses the server-side protocol of the client grid:
//!
//! | Parameter                   | Meaning                                  |
//! |-----------------------------|------------------------------------------|
//! | `draw`                      | request counter echoed in the response   |
//! | `start`                     | offset of the first row                  |
//! | `length`                    | page length, `-1` for every row          |
//! | `order[i][column]`          | index of the i-th sort column            |
//! | `order[i][dir]`             | `asc` or `desc`                          |
//! | `search[value]`             | global search term                       |
//! | `columns[i][search][value]` | search term of the i-th column           |
//! | `<form>[<field>]`           | filter form fields                       |
//!
//! The parameter names are configurable through [`RequestKeys`].
//!
//! [`RequestKeys`]: crate::settings::RequestKeys

use crate::builder::ColumnSet;
use crate::column::base;
use crate::error::{Result, TableError};
use crate::form::Form;
use crate::settings::TableSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
	/// Ascending order
	#[default]
	#[serde(rename = "asc")]
	Ascending,
	/// Descending order
	#[serde(rename = "desc")]
	Descending,
}

impl SortDirection {
	/// Returns the opposite direction
	pub fn toggle(&self) -> Self {
		match self {
			Self::Ascending => Self::Descending,
			Self::Descending => Self::Ascending,
		}
	}

	/// Parses the protocol value (`asc` / `desc`, case-insensitive)
	pub fn parse(value: &str) -> Option<Self> {
		if value.eq_ignore_ascii_case("asc") {
			Some(Self::Ascending)
		} else if value.eq_ignore_ascii_case("desc") {
			Some(Self::Descending)
		} else {
			None
		}
	}
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
	/// Field of the sorted column
	pub field: String,
	pub direction: SortDirection,
}

impl SortOrder {
	pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
		Self {
			field: field.into(),
			direction,
		}
	}
}

/// A parsed request for one page of table data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginateRequest {
	/// Request counter, echoed back to the client
	pub draw: Option<u64>,
	/// Offset of the first row
	pub start: u64,
	/// Page length; `None` returns every row
	pub length: Option<u64>,
	/// Sort keys, most significant first
	pub order: Vec<SortOrder>,
	/// Global search term
	pub search: Option<String>,
	/// Fields the global search covers (columns declared `searchable`);
	/// `None` when the request carries no column information
	pub search_fields: Option<Vec<String>>,
	/// Per-column search terms, keyed by field
	pub column_filters: IndexMap<String, String>,
	/// Submitted filter form values, keyed by form field
	pub filters: IndexMap<String, String>,
}

impl PaginateRequest {
	/// Parses request parameters against the table's columns and filter form
	///
	/// # Examples
	///
	/// ```
	/// use datatables_tables::builder::ColumnBuilder;
	/// use datatables_tables::column::ColumnSpec;
	/// use datatables_tables::request::{PaginateRequest, SortDirection, query_params};
	/// use datatables_tables::settings::TableSettings;
	///
	/// let mut builder = ColumnBuilder::default();
	/// builder
	///     .add("name", ColumnSpec::text("Name"))?
	///     .add("city", ColumnSpec::text("City"))?;
	///
	/// let params = query_params("draw=3&start=20&length=10&order[0][column]=1&order[0][dir]=desc");
	/// let request = PaginateRequest::from_params(&params, builder.columns(), None, &TableSettings::default())?;
	///
	/// assert_eq!(request.draw, Some(3));
	/// assert_eq!(request.start, 20);
	/// assert_eq!(request.length, Some(10));
	/// let sort = request.sort().unwrap();
	/// assert_eq!((sort.field.as_str(), sort.direction), ("city", SortDirection::Descending));
	/// # Ok::<(), datatables_tables::TableError>(())
	/// ```
	pub fn from_params<S: std::hash::BuildHasher>(
		params: &HashMap<String, String, S>,
		columns: &ColumnSet,
		filter_form: Option<&Form>,
		settings: &TableSettings,
	) -> Result<Self> {
		let keys = &settings.request_keys;

		let draw = params
			.get(&keys.draw)
			.map(|value| parse_number(&keys.draw, value))
			.transpose()?;
		let start = params
			.get(&keys.start)
			.map(|value| parse_number(&keys.start, value))
			.transpose()?
			.unwrap_or(0);
		let length = match params.get(&keys.length).map(|value| value.trim()) {
			Some("-1") => settings.max_page_length,
			Some(value) => Some(settings.clamp_length(parse_number(&keys.length, value)?)),
			None => settings.default_page_length.map(|n| settings.clamp_length(n)),
		};

		let search = params
			.get(&format!("{}[value]", keys.search))
			.map(|value| value.trim())
			.filter(|value| !value.is_empty())
			.map(str::to_string);

		let search_fields = Some(
			columns
				.iter()
				.filter(|column| column.options().get_bool(base::SEARCHABLE).unwrap_or(true))
				.map(|column| column.field().to_string())
				.collect(),
		);

		let mut column_filters = IndexMap::new();
		for (index, column) in columns.iter().enumerate() {
			let key = format!("{}[{}][search][value]", keys.columns, index);
			if let Some(term) = params.get(&key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
				column_filters.insert(column.field().to_string(), term.to_string());
			}
		}

		let request = Self {
			draw,
			start,
			length,
			order: parse_order(params, columns, &keys.order)?,
			search,
			search_fields,
			column_filters,
			filters: filter_form.map(|form| form.criteria(params)).unwrap_or_default(),
		};

		tracing::debug!(
			draw = ?request.draw,
			start = request.start,
			length = ?request.length,
			order = request.order.len(),
			filters = request.filters.len(),
			"parsed paginate request"
		);
		Ok(request)
	}

	/// Primary sort key, if any
	pub fn sort(&self) -> Option<&SortOrder> {
		self.order.first()
	}
}

fn parse_order<S: std::hash::BuildHasher>(
	params: &HashMap<String, String, S>,
	columns: &ColumnSet,
	prefix: &str,
) -> Result<Vec<SortOrder>> {
	let mut order = Vec::new();
	for i in 0.. {
		let column_key = format!("{}[{}][column]", prefix, i);
		let Some(index) = params.get(&column_key) else {
			break;
		};
		let index: u64 = parse_number(&column_key, index)?;

		let dir_key = format!("{}[{}][dir]", prefix, i);
		let direction = match params.get(&dir_key) {
			Some(dir) => SortDirection::parse(dir).ok_or_else(|| TableError::InvalidRequest {
				param: dir_key.clone(),
				message: format!("expected \"asc\" or \"desc\", got \"{}\"", dir),
			})?,
			None => SortDirection::Ascending,
		};

		let column = usize::try_from(index)
			.ok()
			.and_then(|index| columns.get_index(index));
		match column {
			Some(column) if column.options().get_bool(base::SORTABLE).unwrap_or(true) => {
				order.push(SortOrder::new(column.field(), direction));
			}
			Some(column) => {
				tracing::warn!(field = column.field(), "ignoring sort on unsortable column");
			}
			None => {
				tracing::warn!(index, "ignoring sort on unknown column index");
			}
		}
	}
	Ok(order)
}

fn parse_number(param: &str, value: &str) -> Result<u64> {
	value
		.trim()
		.parse()
		.map_err(|e: std::num::ParseIntError| TableError::InvalidRequest {
			param: param.to_string(),
			message: format!("\"{}\" is not a non-negative integer: {}", value, e),
		})
}

/// Decodes an `application/x-www-form-urlencoded` string; later pairs win
pub fn query_params(query: &str) -> HashMap<String, String> {
	url::form_urlencoded::parse(query.as_bytes())
		.into_owned()
		.collect()
}

/// Collects the parameters of an HTTP request
///
/// Query string pairs come first; a form-encoded body is layered over them.
pub fn request_params<B: AsRef<[u8]>>(request: &http::Request<B>) -> HashMap<String, String> {
	let mut params = request.uri().query().map(query_params).unwrap_or_default();

	let is_form = request
		.headers()
		.get(http::header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));
	if is_form {
		params.extend(url::form_urlencoded::parse(request.body().as_ref()).into_owned());
	}
	params
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::ColumnBuilder;
	use crate::column::ColumnSpec;
	use crate::form::{FieldType, FormBuilder};
	use rstest::{fixture, rstest};

	#[fixture]
	fn columns() -> ColumnSet {
		let mut builder = ColumnBuilder::default();
		builder
			.add("name", ColumnSpec::text("Name"))
			.unwrap()
			.add("city", ColumnSpec::text("City").option("searchable", false))
			.unwrap()
			.add("notes", ColumnSpec::text("Notes").option("sortable", false))
			.unwrap();
		builder.into_columns()
	}

	fn parse(query: &str, columns: &ColumnSet) -> Result<PaginateRequest> {
		PaginateRequest::from_params(&query_params(query), columns, None, &TableSettings::default())
	}

	#[rstest]
	fn test_empty_request(columns: ColumnSet) {
		let request = parse("", &columns).unwrap();

		assert_eq!(request.draw, None);
		assert_eq!(request.start, 0);
		assert_eq!(request.length, None);
		assert!(request.order.is_empty());
		assert!(request.sort().is_none());
		assert_eq!(request.search_fields, Some(vec!["name".to_string(), "notes".to_string()]));
	}

	#[rstest]
	#[case("length=-1", Some(1000))]
	#[case("length=25", Some(25))]
	#[case("length=5000", Some(1000))]
	fn test_length(columns: ColumnSet, #[case] query: &str, #[case] expected: Option<u64>) {
		assert_eq!(parse(query, &columns).unwrap().length, expected);
	}

	#[rstest]
	#[case("start=abc")]
	#[case("draw=-2")]
	#[case("length=ten")]
	#[case("order[0][column]=x")]
	#[case("order[0][column]=0&order[0][dir]=up")]
	fn test_malformed_parameters(columns: ColumnSet, #[case] query: &str) {
		assert!(matches!(parse(query, &columns), Err(TableError::InvalidRequest { .. })));
	}

	#[rstest]
	fn test_multi_column_order_skips_unknown_and_unsortable(columns: ColumnSet) {
		let request = parse(
			"order[0][column]=1&order[0][dir]=desc&order[1][column]=9&order[2][column]=2&order[3][column]=0&order[3][dir]=ASC",
			&columns,
		)
		.unwrap();

		assert_eq!(
			request.order,
			vec![
				SortOrder::new("city", SortDirection::Descending),
				SortOrder::new("name", SortDirection::Ascending),
			]
		);
	}

	#[rstest]
	fn test_search_terms(columns: ColumnSet) {
		let request = parse(
			"search[value]=%20ann%20&columns[0][search][value]=&columns[1][search][value]=Par",
			&columns,
		)
		.unwrap();

		assert_eq!(request.search.as_deref(), Some("ann"));
		assert_eq!(request.column_filters.len(), 1);
		assert_eq!(request.column_filters["city"], "Par");
	}

	#[rstest]
	fn test_filter_form_criteria(columns: ColumnSet) {
		let form = FormBuilder::new("learners_filter")
			.add("dofilter", FieldType::Button)
			.add("status", FieldType::Choice)
			.get_form();
		let params = query_params("learners_filter%5Bstatus%5D=active&learners_filter%5Bdofilter%5D=1");

		let request =
			PaginateRequest::from_params(&params, &columns, Some(&form), &TableSettings::default())
				.unwrap();
		assert_eq!(request.filters.len(), 1);
		assert_eq!(request.filters["status"], "active");
	}

	#[rstest]
	fn test_custom_keys(columns: ColumnSet) {
		let mut settings = TableSettings::default();
		settings.request_keys.search = "q".to_string();

		let request =
			PaginateRequest::from_params(&query_params("q[value]=x"), &columns, None, &settings)
				.unwrap();
		assert_eq!(request.search.as_deref(), Some("x"));
	}

	#[rstest]
	fn test_request_params_merges_form_body() {
		let request = http::Request::post("/datatables/learners?draw=1&start=0")
			.header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(b"start=10&length=5".to_vec())
			.unwrap();

		let params = request_params(&request);
		assert_eq!(params["draw"], "1");
		assert_eq!(params["start"], "10");
		assert_eq!(params["length"], "5");
	}

	#[rstest]
	fn test_request_params_ignores_other_bodies() {
		let request = http::Request::post("/t?draw=2")
			.header(http::header::CONTENT_TYPE, "application/json")
			.body(br#"{"start": 10}"#.to_vec())
			.unwrap();

		let params = request_params(&request);
		assert_eq!(params.len(), 1);
	}
}
