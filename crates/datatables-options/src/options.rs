//! Resolved option sets

use crate::error::{OptionsError, Result};
use crate::value::{OptionType, OptionValue};
use indexmap::IndexMap;

/// Insertion-ordered map of option names to values, used for overrides.
pub type OptionMap = IndexMap<String, OptionValue>;

/// A fully resolved, validated option set.
///
/// Produced by [`crate::OptionsResolver::resolve`]; holds no lazy providers,
/// only final values, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
	values: OptionMap,
}

impl Options {
	pub(crate) fn from_map(values: OptionMap) -> Self {
		Self { values }
	}

	/// Returns the value of `key`, if present
	pub fn get(&self, key: &str) -> Option<&OptionValue> {
		self.values.get(key)
	}

	/// Returns the value of `key`, failing with [`OptionsError::MissingOption`]
	pub fn require(&self, key: &str) -> Result<&OptionValue> {
		self.values
			.get(key)
			.ok_or_else(|| OptionsError::MissingOption {
				key: key.to_string(),
			})
	}

	/// Returns a boolean option
	///
	/// # Examples
	///
	/// ```
	/// use datatables_options::{OptionsResolver, option_map};
	///
	/// let mut resolver = OptionsResolver::new();
	/// resolver.set_default("visible", true);
	///
	/// let options = resolver.resolve(option_map! { "visible" => false }).unwrap();
	/// assert_eq!(options.get_bool("visible"), Ok(false));
	/// assert!(options.get_bool("width").is_err());
	/// ```
	pub fn get_bool(&self, key: &str) -> Result<bool> {
		let value = self.require(key)?;
		value.as_bool().ok_or_else(|| type_error(key, value, OptionType::Bool))
	}

	/// Returns a string option
	pub fn get_str(&self, key: &str) -> Result<&str> {
		let value = self.require(key)?;
		value
			.as_str()
			.ok_or_else(|| type_error(key, value, OptionType::String))
	}

	/// Returns a string option, treating `null` as absent
	pub fn get_opt_str(&self, key: &str) -> Result<Option<&str>> {
		match self.require(key)? {
			OptionValue::Null => Ok(None),
			OptionValue::String(s) => Ok(Some(s)),
			other => Err(type_error(key, other, OptionType::String)),
		}
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Copies the resolved values into an override map.
	///
	/// Feeding the result back into `resolve` reproduces this option set; this
	/// is how incremental reconfiguration layers new overrides on top of
	/// previously resolved values.
	pub fn to_map(&self) -> OptionMap {
		self.values.clone()
	}

	pub fn into_map(self) -> OptionMap {
		self.values
	}
}

fn type_error(key: &str, value: &OptionValue, expected: OptionType) -> OptionsError {
	OptionsError::InvalidOptionType {
		key: key.to_string(),
		actual: value.option_type(),
		expected: expected.to_string(),
	}
}
