//! Boolean column type

use super::{Cell, ColumnContext, ColumnType, base};
use crate::error::Result;
use datatables_options::{OptionType, Options, OptionsResolver};
use serde_json::Value;

/// Label rendered for `true`
pub const TRUE_LABEL: &str = "true_label";
/// Label rendered for `false`
pub const FALSE_LABEL: &str = "false_label";

/// Renders booleans as labels
///
/// Non-boolean values fall back to the base rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanColumn;

impl ColumnType for BooleanColumn {
	fn name(&self) -> &'static str {
		"boolean"
	}

	fn configure_options(&self, resolver: &mut OptionsResolver, context: &ColumnContext) {
		base::configure_options(resolver, context);
		resolver
			.set_default(TRUE_LABEL, "✓")
			.set_allowed_types(TRUE_LABEL, &[OptionType::String])
			.set_default(FALSE_LABEL, "✗")
			.set_allowed_types(FALSE_LABEL, &[OptionType::String]);
	}

	fn format_cell(&self, cell: Cell<'_>, options: &Options) -> Result<String> {
		let label = match cell.value {
			Some(Value::Bool(true)) => TRUE_LABEL,
			Some(Value::Bool(false)) => FALSE_LABEL,
			_ => return base::format_cell(cell, options),
		};
		let text = options.get_str(label)?;

		if options.get_bool(base::AUTO_ESCAPE)? {
			Ok(base::escape_html(text))
		} else {
			Ok(text.to_string())
		}
	}
}
