//! Table settings
//!
//! Project-wide defaults shared by every table: the default template, the
//! ajax route, page length limits and the request parameter names of the
//! client grid protocol. Every field has a default, so a settings file only
//! needs the values it changes.
//!
//! ```toml
//! default_template = "tables/learners.html"
//! max_page_length = 500
//!
//! [request_keys]
//! search = "q"
//! ```

use crate::error::{Result, TableError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings applied to every table built from the same services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Template identifier used when a table does not override `template`
	pub default_template: String,
	/// Route used to build each table's `ajax_url`; `None` disables it
	pub ajax_route: Option<String>,
	/// Page length applied when a request does not specify one
	pub default_page_length: Option<u64>,
	/// Upper bound for requested page lengths
	pub max_page_length: Option<u64>,
	/// Appended to the table id to name its filter form
	pub filter_form_suffix: String,
	/// Name of the implicit submit control every filter form carries
	pub filter_submit_field: String,
	/// Request parameter names
	pub request_keys: RequestKeys,
}

impl Default for TableSettings {
	fn default() -> Self {
		Self {
			default_template: "datatables/default_table.html".to_string(),
			ajax_route: Some("datatables_ajax".to_string()),
			default_page_length: None,
			max_page_length: Some(1000),
			filter_form_suffix: "_filter".to_string(),
			filter_submit_field: "dofilter".to_string(),
			request_keys: RequestKeys::default(),
		}
	}
}

/// Names of the request parameters of the client grid protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestKeys {
	/// Echoed request counter
	pub draw: String,
	/// Offset of the first row
	pub start: String,
	/// Page length (`-1` for all rows)
	pub length: String,
	/// Prefix of the indexed sort parameters (`order[i][column]`, `order[i][dir]`)
	pub order: String,
	/// Prefix of the global search parameter (`search[value]`)
	pub search: String,
	/// Prefix of the indexed column parameters (`columns[i][search][value]`)
	pub columns: String,
}

impl Default for RequestKeys {
	fn default() -> Self {
		Self {
			draw: "draw".to_string(),
			start: "start".to_string(),
			length: "length".to_string(),
			order: "order".to_string(),
			search: "search".to_string(),
			columns: "columns".to_string(),
		}
	}
}

impl TableSettings {
	/// Parses settings from TOML
	///
	/// # Examples
	///
	/// ```
	/// use datatables_tables::settings::TableSettings;
	///
	/// let settings = TableSettings::from_toml_str("max_page_length = 50").unwrap();
	/// assert_eq!(settings.max_page_length, Some(50));
	/// assert_eq!(settings.request_keys.start, "start");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|e| TableError::Settings(e.to_string()))
	}

	/// Reads settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)
			.map_err(|e| TableError::Settings(format!("{}: {}", path.display(), e)))?;
		tracing::debug!(path = %path.display(), "loading table settings");
		Self::from_toml_str(&source)
	}

	/// Clamps a requested page length to `max_page_length`
	pub fn clamp_length(&self, length: u64) -> u64 {
		match self.max_page_length {
			Some(max) => length.min(max),
			None => length,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_empty_source_uses_defaults() {
		let settings = TableSettings::from_toml_str("").unwrap();
		assert_eq!(settings, TableSettings::default());
	}

	#[rstest]
	fn test_nested_request_keys() {
		let settings = TableSettings::from_toml_str(
			r#"
			ajax_route = "learners_ajax"

			[request_keys]
			search = "q"
			"#,
		)
		.unwrap();

		assert_eq!(settings.ajax_route.as_deref(), Some("learners_ajax"));
		assert_eq!(settings.request_keys.search, "q");
		assert_eq!(settings.request_keys.draw, "draw");
	}

	#[rstest]
	fn test_invalid_toml() {
		assert!(matches!(
			TableSettings::from_toml_str("max_page_length = \"many\""),
			Err(TableError::Settings(_))
		));
	}

	#[rstest]
	fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "default_template = \"custom.html\"").unwrap();

		let settings = TableSettings::from_file(file.path()).unwrap();
		assert_eq!(settings.default_template, "custom.html");
	}

	#[rstest]
	#[case(Some(100), 50, 50)]
	#[case(Some(100), 500, 100)]
	#[case(None, 500, 500)]
	fn test_clamp_length(#[case] max: Option<u64>, #[case] requested: u64, #[case] expected: u64) {
		let settings = TableSettings {
			max_page_length: max,
			..TableSettings::default()
		};
		assert_eq!(settings.clamp_length(requested), expected);
	}
}
