//! Row sources
//!
//! A [`DataSource`] answers the three questions a table asks about its data:
//! which rows make up the requested page, how many rows exist in total, and
//! how many remain after filtering. Table definitions usually delegate their
//! data hooks to one.

use crate::error::Result;
use crate::request::{PaginateRequest, SortDirection};
use crate::row::{Row, lookup, value_to_text};
use serde_json::Value;
use std::cmp::Ordering;

/// Lazy sequence of raw rows
pub type RowIter<'a> = Box<dyn Iterator<Item = Row> + 'a>;

/// Provides the rows of a table
pub trait DataSource: Send + Sync {
	/// Rows of the requested page, or every row without a request
	fn iterate(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>>;

	/// Number of rows before any filtering
	fn count_all(&self) -> Result<u64>;

	/// Number of rows after filtering; `None` when the source cannot tell
	fn count_filtered(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>>;
}

/// In-memory rows with search, filtering, sorting and slicing
///
/// - the global search matches, case-insensitively, any of the request's
///   `search_fields`; every top-level value when the request carries no
///   column information, nothing when no column is searchable
/// - column filters are case-insensitive substring matches on their field
/// - filter form criteria must equal the field's text
///
/// # Examples
///
/// ```
/// use datatables_tables::datasource::{DataSource, MemoryDataSource};
/// use datatables_tables::request::PaginateRequest;
/// use serde_json::json;
///
/// let source = MemoryDataSource::from_values([
///     json!({"name": "Ann", "city": "Paris"}),
///     json!({"name": "Bob", "city": "Oslo"}),
/// ]);
///
/// let request = PaginateRequest {
///     search: Some("paris".to_string()),
///     ..PaginateRequest::default()
/// };
///
/// let names: Vec<_> = source
///     .iterate(Some(&request))?
///     .map(|row| row["name"].clone())
///     .collect();
/// assert_eq!(names, [json!("Ann")]);
/// assert_eq!(source.count_all()?, 2);
/// assert_eq!(source.count_filtered(Some(&request))?, Some(1));
/// # Ok::<(), datatables_tables::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryDataSource {
	rows: Vec<Row>,
	filtered_count: bool,
}

impl Default for MemoryDataSource {
	fn default() -> Self {
		Self::new(Vec::new())
	}
}

impl MemoryDataSource {
	pub fn new(rows: Vec<Row>) -> Self {
		Self {
			rows,
			filtered_count: true,
		}
	}

	/// Builds a source from JSON values, skipping anything that is not an object
	pub fn from_values<I: IntoIterator<Item = Value>>(values: I) -> Self {
		Self::new(values.into_iter().filter_map(crate::row::into_row).collect())
	}

	/// Makes [`DataSource::count_filtered`] report the count as unavailable
	pub fn without_filtered_count(mut self) -> Self {
		self.filtered_count = false;
		self
	}

	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	pub fn push(&mut self, row: Row) {
		self.rows.push(row);
	}

	fn matching<'a>(&'a self, request: &'a PaginateRequest) -> impl Iterator<Item = &'a Row> + 'a {
		self.rows.iter().filter(move |row| matches(row, request))
	}
}

impl DataSource for MemoryDataSource {
	fn iterate(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
		let Some(request) = request else {
			return Ok(Box::new(self.rows.iter().cloned()));
		};

		let mut rows: Vec<&Row> = self.matching(request).collect();
		if !request.order.is_empty() {
			rows.sort_by(|a, b| {
				request
					.order
					.iter()
					.map(|key| {
						let ordering = compare(lookup(a, &key.field), lookup(b, &key.field));
						match key.direction {
							SortDirection::Ascending => ordering,
							SortDirection::Descending => ordering.reverse(),
						}
					})
					.find(|ordering| ordering.is_ne())
					.unwrap_or(Ordering::Equal)
			});
		}

		let start = usize::try_from(request.start).unwrap_or(usize::MAX);
		let length = request
			.length
			.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

		let page: Vec<Row> = rows.into_iter().skip(start).take(length).cloned().collect();
		tracing::trace!(rows = page.len(), "memory data source page");
		Ok(Box::new(page.into_iter()))
	}

	fn count_all(&self) -> Result<u64> {
		Ok(self.rows.len() as u64)
	}

	fn count_filtered(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
		if !self.filtered_count {
			return Ok(None);
		}
		Ok(Some(match request {
			Some(request) => self.matching(request).count() as u64,
			None => self.rows.len() as u64,
		}))
	}
}

fn matches(row: &Row, request: &PaginateRequest) -> bool {
	let global = match &request.search {
		None => true,
		Some(term) => {
			let term = term.to_lowercase();
			match &request.search_fields {
				None => row.values().any(|value| contains(Some(value), &term)),
				Some(fields) => fields.iter().any(|field| contains(lookup(row, field), &term)),
			}
		}
	};

	global
		&& request
			.column_filters
			.iter()
			.all(|(field, term)| contains(lookup(row, field), &term.to_lowercase()))
		&& request
			.filters
			.iter()
			.all(|(field, expected)| lookup(row, field).is_some_and(|v| value_to_text(v) == *expected))
}

fn contains(value: Option<&Value>, lowercase_term: &str) -> bool {
	value.is_some_and(|value| value_to_text(value).to_lowercase().contains(lowercase_term))
}

/// Missing and null values sort first, numbers numerically, the rest by text
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	let a = a.filter(|v| !v.is_null());
	let b = b.filter(|v| !v.is_null());
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(Value::Number(x)), Some(Value::Number(y))) => {
			let x = x.as_f64().unwrap_or(f64::NAN);
			let y = y.as_f64().unwrap_or(f64::NAN);
			x.total_cmp(&y)
		}
		(Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
		(Some(x), Some(y)) => value_to_text(x).cmp(&value_to_text(y)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::request::SortOrder;
	use indexmap::IndexMap;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn source() -> MemoryDataSource {
		MemoryDataSource::from_values([
			json!({"name": "Carl", "age": 40, "city": "Oslo", "status": "active"}),
			json!({"name": "ann", "age": 9, "city": "Paris", "status": "inactive"}),
			json!({"name": "Bob", "age": null, "city": "Paris", "status": "active"}),
			json!({"name": "Dina", "age": 40, "city": "Rome", "status": "active"}),
		])
	}

	fn names(source: &MemoryDataSource, request: &PaginateRequest) -> Vec<String> {
		source
			.iterate(Some(request))
			.unwrap()
			.map(|row| value_to_text(&row["name"]))
			.collect()
	}

	#[rstest]
	fn test_without_request_yields_everything(source: MemoryDataSource) {
		assert_eq!(source.iterate(None).unwrap().count(), 4);
		assert_eq!(source.count_filtered(None).unwrap(), Some(4));
	}

	#[rstest]
	fn test_multi_key_sort(source: MemoryDataSource) {
		let request = PaginateRequest {
			order: vec![
				SortOrder::new("age", SortDirection::Descending),
				SortOrder::new("name", SortDirection::Ascending),
			],
			..PaginateRequest::default()
		};

		assert_eq!(names(&source, &request), ["Carl", "Dina", "ann", "Bob"]);
	}

	#[rstest]
	fn test_slicing(source: MemoryDataSource) {
		let request = PaginateRequest {
			start: 1,
			length: Some(2),
			..PaginateRequest::default()
		};

		assert_eq!(names(&source, &request), ["ann", "Bob"]);
		assert_eq!(source.count_filtered(Some(&request)).unwrap(), Some(4));
	}

	#[rstest]
	fn test_start_past_end(source: MemoryDataSource) {
		let request = PaginateRequest {
			start: 10,
			..PaginateRequest::default()
		};
		assert!(names(&source, &request).is_empty());
	}

	#[rstest]
	fn test_search_restricted_to_fields(source: MemoryDataSource) {
		let request = PaginateRequest {
			search: Some("PAR".to_string()),
			search_fields: Some(vec!["name".to_string()]),
			..PaginateRequest::default()
		};
		assert!(names(&source, &request).is_empty());
	}

	#[rstest]
	#[case(None, 1)]
	#[case(Some(vec![]), 0)]
	#[case(Some(vec!["name".to_string()]), 0)]
	#[case(Some(vec!["password".to_string()]), 1)]
	fn test_search_scope(#[case] search_fields: Option<Vec<String>>, #[case] expected: usize) {
		let source = MemoryDataSource::from_values([json!({"name": "Ann", "password": "secret"})]);
		let request = PaginateRequest {
			search: Some("secret".to_string()),
			search_fields,
			..PaginateRequest::default()
		};

		assert_eq!(source.iterate(Some(&request)).unwrap().count(), expected);
		assert_eq!(source.count_filtered(Some(&request)).unwrap(), Some(expected as u64));
	}

	#[rstest]
	fn test_column_and_form_filters(source: MemoryDataSource) {
		let request = PaginateRequest {
			column_filters: IndexMap::from([("city".to_string(), "par".to_string())]),
			filters: IndexMap::from([("status".to_string(), "active".to_string())]),
			..PaginateRequest::default()
		};

		assert_eq!(names(&source, &request), ["Bob"]);
		assert_eq!(source.count_filtered(Some(&request)).unwrap(), Some(1));
		assert_eq!(source.count_all().unwrap(), 4);
	}

	#[rstest]
	fn test_filtered_count_unavailable(source: MemoryDataSource) {
		let source = source.without_filtered_count();
		assert_eq!(source.count_filtered(None).unwrap(), None);
		assert_eq!(source.count_all().unwrap(), 4);
	}
}
