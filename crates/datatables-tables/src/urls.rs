//! URL generation for ajax endpoints

use crate::error::{Result, TableError};
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::HashMap;
use std::fmt::Debug;

/// Characters escaped inside a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

/// Builds URLs for named routes.
pub trait UrlGenerator: Debug + Send + Sync {
	/// Builds the URL of `route`, filling its placeholders from `params`
	fn build_url(&self, route: &str, params: &IndexMap<String, String>) -> Result<String>;
}

/// Named route patterns with `{placeholder}` segments.
///
/// Parameters matching a placeholder are substituted into the path; the rest
/// are appended as a query string in insertion order.
///
/// # Examples
///
/// ```
/// use datatables_tables::urls::{RouteMap, UrlGenerator};
/// use indexmap::IndexMap;
///
/// let mut routes = RouteMap::new();
/// routes.register("datatables_ajax", "/datatables/{table_id}");
///
/// let mut params = IndexMap::new();
/// params.insert("table_id".to_string(), "learners".to_string());
/// params.insert("group".to_string(), "7".to_string());
///
/// let url = routes.build_url("datatables_ajax", &params).unwrap();
/// assert_eq!(url, "/datatables/learners?group=7");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
	routes: HashMap<String, String>,
}

impl RouteMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers (or replaces) a named route pattern
	pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
		self.routes.insert(name.into(), pattern.into());
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}
}

impl UrlGenerator for RouteMap {
	fn build_url(&self, route: &str, params: &IndexMap<String, String>) -> Result<String> {
		let pattern = self
			.routes
			.get(route)
			.ok_or_else(|| TableError::UnknownRoute(route.to_string()))?;

		let mut used = Vec::new();
		let mut path = String::with_capacity(pattern.len());
		let mut chars = pattern.chars();
		while let Some(ch) = chars.next() {
			if ch != '{' {
				path.push(ch);
				continue;
			}
			let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
			match params.get(&name) {
				Some(value) => {
					path.extend(utf8_percent_encode(value, PATH_SEGMENT));
					used.push(name);
				}
				None => {
					return Err(TableError::InvalidRequest {
						param: name,
						message: format!("route \"{}\" requires this parameter", route),
					});
				}
			}
		}

		let mut query = url::form_urlencoded::Serializer::new(String::new());
		let mut has_query = false;
		for (key, value) in params.iter().filter(|(k, _)| !used.contains(k)) {
			query.append_pair(key, value);
			has_query = true;
		}
		if has_query {
			path.push('?');
			path.push_str(&query.finish());
		}

		Ok(path)
	}
}
