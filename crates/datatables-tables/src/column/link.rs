//! Link column type

use super::{Cell, ColumnContext, ColumnType, base};
use crate::error::{Result, TableError};
use crate::row::{lookup, value_to_text};
use datatables_options::{OptionType, OptionValue, Options, OptionsResolver};
use std::sync::Arc;

/// Row key holding the anchor text (required)
pub const LINK_TEXT_FIELD: &str = "LinkTextField";
/// Row key holding the alternative text, defaults to `LinkTextField`
pub const ALT_TEXT_FIELD: &str = "AltTextField";
/// Row key read by the default URL callback, defaults to `LinkTextField`
pub const URL_FIELD: &str = "UrlField";
/// Builds the link target, see [`UrlCallback`]
pub const URL_CALLBACK: &str = "UrlCallback";

/// Computes the target URL of a link cell
///
/// Receives the cell's base text (the `format_value` hook applied, not yet
/// escaped), the cell and the final options.
pub type UrlCallback = Arc<dyn Fn(&str, Cell<'_>, &Options) -> Result<String> + Send + Sync>;

/// Renders `<a href="URL" alt="TEXT">TEXT</a>`
///
/// `TEXT` is the row value at `LinkTextField`, `URL` is what `UrlCallback`
/// returns. The default callback reads the row value at `UrlField`. Rows
/// lacking either field fail with [`TableError::MissingField`].
///
/// # Examples
///
/// ```
/// use datatables_tables::builder::ColumnBuilder;
/// use datatables_tables::column::ColumnSpec;
/// use serde_json::json;
///
/// let mut builder = ColumnBuilder::default();
/// builder
///     .add("name", ColumnSpec::link("Name").option("LinkTextField", "name").option("UrlField", "url"))
///     .unwrap();
///
/// let row = json!({"name": "Ann", "url": "http://x"});
/// let row = row.as_object().unwrap();
/// let column = builder.columns().get("name").unwrap();
/// assert_eq!(
///     column.format_cell(row.get("name"), row).unwrap(),
///     r#"<a href="http://x" alt="Ann">Ann</a>"#
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkColumn;

impl ColumnType for LinkColumn {
	fn name(&self) -> &'static str {
		"link"
	}

	fn configure_options(&self, resolver: &mut OptionsResolver, context: &ColumnContext) {
		base::configure_options(resolver, context);

		let default_callback: UrlCallback = Arc::new(url_from_row);
		resolver
			.set_required(LINK_TEXT_FIELD)
			.set_allowed_types(LINK_TEXT_FIELD, &[OptionType::String])
			.set_lazy_default(ALT_TEXT_FIELD, |options| options.get(LINK_TEXT_FIELD))
			.set_allowed_types(ALT_TEXT_FIELD, &[OptionType::String])
			.set_lazy_default(URL_FIELD, |options| options.get(LINK_TEXT_FIELD))
			.set_allowed_types(URL_FIELD, &[OptionType::String])
			.set_default(URL_CALLBACK, OptionValue::callable(default_callback))
			.set_allowed_types(URL_CALLBACK, &[OptionType::Callable]);
	}

	fn format_cell(&self, cell: Cell<'_>, options: &Options) -> Result<String> {
		let value = base::format_text(cell, options)?;

		let text_field = options.get_str(LINK_TEXT_FIELD)?;
		let text = lookup(cell.row, text_field)
			.map(value_to_text)
			.ok_or_else(|| missing(cell.field, text_field))?;

		let callback = base::callable::<UrlCallback>(options, URL_CALLBACK)?
			.ok_or_else(|| missing(cell.field, URL_CALLBACK))?;
		let url = callback(&value, cell, options)?;

		let (url, text) = if options.get_bool(base::AUTO_ESCAPE)? {
			(base::escape_html(&url), base::escape_html(&text))
		} else {
			(url, text)
		};

		Ok(format!(r#"<a href="{url}" alt="{text}">{text}</a>"#))
	}
}

fn url_from_row(_value: &str, cell: Cell<'_>, options: &Options) -> Result<String> {
	let url_field = options.get_str(URL_FIELD)?;
	lookup(cell.row, url_field)
		.map(value_to_text)
		.ok_or_else(|| missing(cell.field, url_field))
}

fn missing(column: &str, field: &str) -> TableError {
	TableError::MissingField {
		column: column.to_string(),
		field: field.to_string(),
	}
}
