//! Raw data rows and field path lookup

use serde_json::Value;

/// A raw data row: field name to value.
pub type Row = serde_json::Map<String, Value>;

/// Looks up the value at a dot-separated field path.
///
/// A key matching the whole path wins (flat rows often use dotted keys such
/// as `"Learner.FirstName"`); otherwise each segment descends into nested
/// objects, or into arrays by numeric index. Any missing step yields `None`,
/// the missing-value sentinel handed to column formatters.
///
/// # Examples
///
/// ```
/// use datatables_tables::row::lookup;
/// use serde_json::json;
///
/// let row = json!({"Learner": {"FirstName": "Ann"}, "tags": ["a", "b"]});
/// let row = row.as_object().unwrap();
///
/// assert_eq!(lookup(row, "Learner.FirstName"), Some(&json!("Ann")));
/// assert_eq!(lookup(row, "tags.1"), Some(&json!("b")));
/// assert_eq!(lookup(row, "Learner.LastName"), None);
/// assert_eq!(lookup(row, "Manager.Name"), None);
/// ```
pub fn lookup<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
	if let Some(value) = row.get(path) {
		return Some(value);
	}

	let mut segments = path.split('.');
	let mut current = row.get(segments.next()?)?;
	for segment in segments {
		current = match current {
			Value::Object(map) => map.get(segment)?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}
	Some(current)
}

/// Renders a raw value as cell text.
///
/// Strings are used as-is, `null` renders empty, scalars use their JSON form
/// and composite values are serialized.
pub fn value_to_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::Array(_) | Value::Object(_) => value.to_string(),
	}
}

/// Converts a JSON object into a [`Row`]; other values yield `None`.
pub fn into_row(value: Value) -> Option<Row> {
	match value {
		Value::Object(map) => Some(map),
		_ => None,
	}
}
