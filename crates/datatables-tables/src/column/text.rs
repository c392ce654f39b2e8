//! Plain text column type

use super::ColumnType;

/// Renders the value as text with the base column behavior
///
/// Missing or null values render `default_content`; everything else goes
/// through the `format_value` hook when one is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextColumn;

impl ColumnType for TextColumn {
	fn name(&self) -> &'static str {
		"text"
	}
}
