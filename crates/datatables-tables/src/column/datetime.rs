//! Date and time column type

use super::{Cell, ColumnContext, ColumnType, base};
use crate::error::Result;
use crate::row::value_to_text;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use datatables_options::{OptionType, OptionValue, Options, OptionsError, OptionsResolver};
use serde_json::Value;
use std::fmt::Write;

/// Format of incoming string values; `null` accepts RFC 3339 and
/// `%Y-%m-%d %H:%M:%S` strings
pub const INPUT_FORMAT: &str = "input_format";
/// `strftime` format of the rendered cell
pub const OUTPUT_FORMAT: &str = "output_format";

const DEFAULT_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reformats dates and timestamps
///
/// Integers are read as unix timestamps (seconds). Values that cannot be
/// parsed render as plain text. A `format_value` hook takes precedence over
/// date parsing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeColumn;

impl ColumnType for DateTimeColumn {
	fn name(&self) -> &'static str {
		"datetime"
	}

	fn configure_options(&self, resolver: &mut OptionsResolver, context: &ColumnContext) {
		base::configure_options(resolver, context);
		resolver
			.set_default(INPUT_FORMAT, OptionValue::Null)
			.set_allowed_types(INPUT_FORMAT, &[OptionType::String, OptionType::Null])
			.set_default(OUTPUT_FORMAT, DEFAULT_OUTPUT_FORMAT)
			.set_allowed_types(OUTPUT_FORMAT, &[OptionType::String]);
	}

	fn format_cell(&self, cell: Cell<'_>, options: &Options) -> Result<String> {
		if !options.require(base::FORMAT_VALUE)?.is_null() {
			return base::format_cell(cell, options);
		}

		let parsed = match cell.value {
			Some(value) => parse(value, options.get_opt_str(INPUT_FORMAT)?),
			None => None,
		};
		let Some(datetime) = parsed else {
			if let Some(value) = cell.value.filter(|v| !v.is_null()) {
				tracing::debug!(
					field = cell.field,
					value = %value_to_text(value),
					"unparseable date value rendered as text"
				);
			}
			return base::format_cell(cell, options);
		};

		let output_format = options.get_str(OUTPUT_FORMAT)?;
		let mut text = String::new();
		write!(text, "{}", datetime.format(output_format)).map_err(|_| {
			OptionsError::InvalidOptionValue {
				key: OUTPUT_FORMAT.to_string(),
				value: format!("{:?}", output_format),
			}
		})?;

		if options.get_bool(base::AUTO_ESCAPE)? {
			Ok(base::escape_html(&text))
		} else {
			Ok(text)
		}
	}
}

fn parse(value: &Value, input_format: Option<&str>) -> Option<NaiveDateTime> {
	match value {
		Value::Number(n) => DateTime::from_timestamp(n.as_i64()?, 0).map(|dt| dt.naive_utc()),
		Value::String(s) => match input_format {
			Some(format) => NaiveDateTime::parse_from_str(s, format)
				.ok()
				.or_else(|| {
					NaiveDate::parse_from_str(s, format)
						.ok()
						.and_then(|d| d.and_hms_opt(0, 0, 0))
				}),
			None => DateTime::parse_from_rfc3339(s)
				.map(|dt| dt.naive_local())
				.ok()
				.or_else(|| NaiveDateTime::parse_from_str(s, DEFAULT_OUTPUT_FORMAT).ok()),
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use crate::column::base::FormatValueCallback;
	use crate::column::{ColumnContext, ColumnSpec};
	use crate::row::{Row, value_to_text};
	use datatables_options::OptionValue;
	use rstest::rstest;
	use serde_json::{Value, json};
	use std::sync::Arc;

	fn render(spec: ColumnSpec, value: Option<Value>) -> String {
		let column = spec
			.resolve("created".to_string(), &ColumnContext::default())
			.unwrap();
		column.format_cell(value.as_ref(), &Row::new()).unwrap()
	}

	#[rstest]
	#[case(json!("2024-03-01T10:20:30+09:00"), "2024-03-01 10:20:30")]
	#[case(json!("2024-03-01 10:20:30"), "2024-03-01 10:20:30")]
	#[case(json!(0), "1970-01-01 00:00:00")]
	#[case(json!("yesterday"), "yesterday")]
	fn test_default_formats(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(render(ColumnSpec::datetime("Created"), Some(value)), expected);
	}

	#[rstest]
	fn test_custom_formats() {
		let spec = ColumnSpec::datetime("Created")
			.option("input_format", "%d/%m/%Y")
			.option("output_format", "%Y-%m-%d");

		assert_eq!(render(spec, Some(json!("01/03/2024"))), "2024-03-01");
	}

	#[rstest]
	fn test_format_value_hook_takes_precedence() {
		let format: FormatValueCallback =
			Arc::new(|value: &Value, _row: &Row| format!("at {}", value_to_text(value)));
		let spec = ColumnSpec::datetime("Created").option("format_value", OptionValue::callable(format));

		assert_eq!(render(spec, Some(json!("2024-03-01 10:20:30"))), "at 2024-03-01 10:20:30");
	}

	#[rstest]
	fn test_missing_value_uses_default_content() {
		let spec = ColumnSpec::datetime("Created").option("default_content", "never");
		assert_eq!(render(spec, None), "never");
	}

	#[rstest]
	fn test_invalid_output_format_is_an_error() {
		let column = ColumnSpec::datetime("Created")
			.option("output_format", "%Q")
			.resolve("created".to_string(), &ColumnContext::default())
			.unwrap();

		assert!(column.format_cell(Some(&json!(0)), &Row::new()).is_err());
	}
}
