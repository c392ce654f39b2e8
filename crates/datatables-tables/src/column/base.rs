//! Base column options and cell formatting
//!
//! Every column type declares these options and formats cells this way
//! unless it overrides the behavior. Overriding types call back into
//! [`configure_options`] and [`format_cell`] before adding their own logic,
//! so the base keys always exist.

use super::{Cell, ColumnContext};
use crate::error::{Result, TableError};
use crate::row::{Row, value_to_text};
use datatables_options::{OptionType, OptionValue, Options, OptionsError, OptionsResolver};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Layout hint (`"20%"`, `"120px"`)
pub const WIDTH: &str = "width";
/// Whether the client shows the column
pub const VISIBLE: &str = "visible";
/// Whether the client may sort by the column
pub const SORTABLE: &str = "sortable";
/// Whether the global search covers the column
pub const SEARCHABLE: &str = "searchable";
/// CSS class of the column's cells
pub const CLASS_NAME: &str = "class_name";
/// Markup rendered when the row has no value
pub const DEFAULT_CONTENT: &str = "default_content";
/// HTML-escape rendered cells
pub const AUTO_ESCAPE: &str = "auto_escape";
/// Permission required to see the column
pub const PERMISSION: &str = "permission";
/// Server-side value formatting hook, see [`FormatValueCallback`]
pub const FORMAT_VALUE: &str = "format_value";

/// Options exposed to the client grid, in output order
pub const CLIENT_SIDE_KEYS: &[&str] = &[
	WIDTH,
	VISIBLE,
	SORTABLE,
	SEARCHABLE,
	CLASS_NAME,
	DEFAULT_CONTENT,
];

/// Value formatting hook stored under [`FORMAT_VALUE`]
pub type FormatValueCallback = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Declares the base column options
pub fn configure_options(resolver: &mut OptionsResolver, context: &ColumnContext) {
	resolver
		.set_default(WIDTH, OptionValue::Null)
		.set_allowed_types(WIDTH, &[OptionType::String, OptionType::Null])
		.set_default(SORTABLE, true)
		.set_allowed_types(SORTABLE, &[OptionType::Bool])
		.set_default(SEARCHABLE, true)
		.set_allowed_types(SEARCHABLE, &[OptionType::Bool])
		.set_default(CLASS_NAME, "")
		.set_allowed_types(CLASS_NAME, &[OptionType::String])
		.set_default(DEFAULT_CONTENT, "")
		.set_allowed_types(DEFAULT_CONTENT, &[OptionType::String])
		.set_default(AUTO_ESCAPE, false)
		.set_allowed_types(AUTO_ESCAPE, &[OptionType::Bool])
		.set_default(PERMISSION, OptionValue::Null)
		.set_allowed_types(PERMISSION, &[OptionType::String, OptionType::Null])
		.set_default(FORMAT_VALUE, OptionValue::Null)
		.set_allowed_types(FORMAT_VALUE, &[OptionType::Callable, OptionType::Null]);

	let authorization = Arc::clone(&context.authorization);
	resolver
		.set_lazy_default(VISIBLE, move |options| match options.get(PERMISSION)? {
			OptionValue::String(permission) => Ok(authorization.is_granted(&permission).into()),
			_ => Ok(true.into()),
		})
		.set_allowed_types(VISIBLE, &[OptionType::Bool]);
}

/// Text of a cell before escaping: `default_content` for missing or null
/// values, otherwise the `format_value` hook or the plain text of the value.
pub fn format_text(cell: Cell<'_>, options: &Options) -> Result<String> {
	let value = match cell.value {
		None | Some(Value::Null) => return Ok(options.get_str(DEFAULT_CONTENT)?.to_string()),
		Some(value) => value,
	};

	Ok(match callable::<FormatValueCallback>(options, FORMAT_VALUE)? {
		Some(format) => format(value, cell.row),
		None => value_to_text(value),
	})
}

/// Renders a cell: [`format_text`], HTML-escaped when `auto_escape` is on.
pub fn format_cell(cell: Cell<'_>, options: &Options) -> Result<String> {
	let text = format_text(cell, options)?;

	if options.get_bool(AUTO_ESCAPE)? {
		Ok(escape_html(&text))
	} else {
		Ok(text)
	}
}

/// Reads a callable option, `null` meaning unset.
pub(crate) fn callable<'a, T: Any>(options: &'a Options, key: &str) -> Result<Option<&'a T>> {
	match options.require(key)? {
		OptionValue::Null => Ok(None),
		value => value.downcast_callable::<T>().map(Some).ok_or_else(|| {
			TableError::Options(OptionsError::InvalidOptionType {
				key: key.to_string(),
				actual: value.option_type(),
				expected: std::any::type_name::<T>().to_string(),
			})
		}),
	}
}

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use datatables_tables::column::base::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///     "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	input
		.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
