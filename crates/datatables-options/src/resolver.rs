//! Layered option resolver
//!
//! An [`OptionsResolver`] holds a declared option schema: which keys exist,
//! their defaults (plain values or lazy providers), which are required, and
//! which types/values they accept. [`OptionsResolver::resolve`] merges caller
//! overrides over that schema and produces an immutable [`Options`] set.
//!
//! Lazy providers receive a [`LazyOptions`] view of the options resolved so
//! far. Requesting another key resolves it on demand (memoized for the rest of
//! the call); requesting a key that is still being resolved is reported as a
//! circular dependency instead of recursing forever.

use crate::error::{OptionsError, Result, join_types};
use crate::options::{OptionMap, Options};
use crate::value::{OptionType, OptionValue};
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Maximum nesting of lazy providers within a single resolution
const MAX_RESOLUTION_DEPTH: usize = 64;

/// A lazy default: computes a value from other options at resolution time.
pub type LazyProvider = Arc<dyn Fn(&mut LazyOptions<'_>) -> Result<OptionValue> + Send + Sync>;

/// Default for a declared option
#[derive(Clone)]
pub enum OptionDefault {
	/// Plain value
	Value(OptionValue),
	/// Value computed on demand from the other options
	Lazy(LazyProvider),
}

impl OptionDefault {
	pub fn value(value: impl Into<OptionValue>) -> Self {
		Self::Value(value.into())
	}

	pub fn lazy<F>(provider: F) -> Self
	where
		F: Fn(&mut LazyOptions<'_>) -> Result<OptionValue> + Send + Sync + 'static,
	{
		Self::Lazy(Arc::new(provider))
	}
}

impl From<OptionValue> for OptionDefault {
	fn from(value: OptionValue) -> Self {
		Self::Value(value)
	}
}

impl fmt::Debug for OptionDefault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
			Self::Lazy(_) => f.write_str("Lazy(..)"),
		}
	}
}

/// Declares an option schema and resolves override maps against it.
///
/// Resolution never mutates the schema: `resolve` takes `&self`, so repeated
/// calls with different overrides are independent.
///
/// # Examples
///
/// ```
/// use datatables_options::{OptionsResolver, OptionType, OptionValue, option_map};
///
/// let mut resolver = OptionsResolver::new();
/// resolver
///     .set_required("LinkTextField")
///     .set_lazy_default("UrlField", |options| options.get("LinkTextField"))
///     .set_allowed_types("LinkTextField", &[OptionType::String]);
///
/// let options = resolver
///     .resolve(option_map! { "LinkTextField" => "name" })
///     .unwrap();
/// assert_eq!(options.get_str("UrlField"), Ok("name"));
///
/// assert!(resolver.resolve(option_map! {}).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptionsResolver {
	defined: IndexSet<String>,
	defaults: HashMap<String, OptionDefault>,
	required: HashSet<String>,
	allowed_types: HashMap<String, Vec<OptionType>>,
	allowed_values: HashMap<String, Vec<OptionValue>>,
}

impl OptionsResolver {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a plain default value, declaring the key if needed.
	///
	/// Redefining an existing key overwrites its previous default.
	pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
		self.insert_default(key.into(), OptionDefault::Value(value.into()))
	}

	/// Sets a lazy default computed from the other options at resolution time.
	pub fn set_lazy_default<F>(&mut self, key: impl Into<String>, provider: F) -> &mut Self
	where
		F: Fn(&mut LazyOptions<'_>) -> Result<OptionValue> + Send + Sync + 'static,
	{
		self.insert_default(key.into(), OptionDefault::lazy(provider))
	}

	/// Registers several defaults at once
	pub fn set_defaults<I, K>(&mut self, defaults: I) -> &mut Self
	where
		I: IntoIterator<Item = (K, OptionDefault)>,
		K: Into<String>,
	{
		for (key, default) in defaults {
			self.insert_default(key.into(), default);
		}
		self
	}

	fn insert_default(&mut self, key: String, default: OptionDefault) -> &mut Self {
		self.defined.insert(key.clone());
		self.defaults.insert(key, default);
		self
	}

	/// Marks a key as mandatory
	pub fn set_required(&mut self, key: impl Into<String>) -> &mut Self {
		let key = key.into();
		self.defined.insert(key.clone());
		self.required.insert(key);
		self
	}

	/// Declares optional keys that have no default
	pub fn set_defined<I, K>(&mut self, keys: I) -> &mut Self
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		for key in keys {
			self.defined.insert(key.into());
		}
		self
	}

	/// Restricts the runtime types a key's final value may have
	pub fn set_allowed_types(&mut self, key: impl Into<String>, types: &[OptionType]) -> &mut Self {
		self.allowed_types.insert(key.into(), types.to_vec());
		self
	}

	/// Restricts a key's final value to a fixed set
	pub fn set_allowed_values<I, V>(&mut self, key: impl Into<String>, values: I) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: Into<OptionValue>,
	{
		self.allowed_values
			.insert(key.into(), values.into_iter().map(Into::into).collect());
		self
	}

	pub fn is_defined(&self, key: &str) -> bool {
		self.defined.contains(key)
	}

	pub fn is_required(&self, key: &str) -> bool {
		self.required.contains(key)
	}

	pub fn has_default(&self, key: &str) -> bool {
		self.defaults.contains_key(key)
	}

	/// Declared keys in declaration order
	pub fn defined_options(&self) -> impl Iterator<Item = &str> {
		self.defined.iter().map(String::as_str)
	}

	/// Required keys that have no default, in declaration order
	pub fn missing_options(&self) -> Vec<&str> {
		self.defined
			.iter()
			.filter(|key| self.required.contains(*key) && !self.defaults.contains_key(*key))
			.map(String::as_str)
			.collect()
	}

	/// Merges `overrides` over the declared defaults and validates the result.
	///
	/// Override values win over defaults. Lazy defaults are evaluated at most
	/// once, in first-use order, and observe overridden values of the keys
	/// they read.
	///
	/// # Errors
	///
	/// - [`OptionsError::UndefinedOption`] for an override key that was never declared
	/// - [`OptionsError::MissingOption`] for a required key without value
	/// - [`OptionsError::InvalidOptionType`] / [`OptionsError::InvalidOptionValue`]
	///   when a final value violates its constraints
	/// - [`OptionsError::CircularDependency`] when lazy providers form a cycle
	/// - any error returned by a provider
	pub fn resolve(&self, overrides: OptionMap) -> Result<Options> {
		tracing::trace!(
			defined = self.defined.len(),
			overrides = overrides.len(),
			"resolving options"
		);

		if let Some(key) = overrides.keys().find(|key| !self.defined.contains(*key)) {
			let mut defined: Vec<&str> = self.defined_options().collect();
			defined.sort_unstable();
			return Err(OptionsError::UndefinedOption {
				key: key.clone(),
				defined: defined.join("\", \""),
			});
		}

		if let Some(key) = self
			.missing_options()
			.into_iter()
			.find(|key| !overrides.contains_key(*key))
		{
			return Err(OptionsError::MissingOption {
				key: key.to_string(),
			});
		}

		let mut lazy = LazyOptions {
			resolver: self,
			overrides: &overrides,
			resolved: HashMap::new(),
			stack: Vec::new(),
		};

		let mut values = OptionMap::with_capacity(self.defined.len());
		for key in &self.defined {
			if !lazy.has_value(key) {
				continue;
			}
			let value = lazy.resolve_key(key)?;
			values.insert(key.clone(), value);
		}

		Ok(Options::from_map(values))
	}

	fn validate(&self, key: &str, value: &OptionValue) -> Result<()> {
		if let Some(types) = self.allowed_types.get(key) {
			if !types.contains(&value.option_type()) {
				return Err(OptionsError::InvalidOptionType {
					key: key.to_string(),
					actual: value.option_type(),
					expected: join_types(types),
				});
			}
		}
		if let Some(values) = self.allowed_values.get(key) {
			if !values.contains(value) {
				return Err(OptionsError::InvalidOptionValue {
					key: key.to_string(),
					value: format!("{:?}", value),
				});
			}
		}
		Ok(())
	}
}

/// The partially resolved option set handed to lazy providers.
pub struct LazyOptions<'a> {
	resolver: &'a OptionsResolver,
	overrides: &'a OptionMap,
	resolved: HashMap<String, OptionValue>,
	/// Keys whose providers are currently running, outermost first
	stack: Vec<String>,
}

impl LazyOptions<'_> {
	/// Returns the final value of `key`, resolving it first if needed.
	pub fn get(&mut self, key: &str) -> Result<OptionValue> {
		if let Some(value) = self.resolved.get(key) {
			return Ok(value.clone());
		}
		if !self.resolver.is_defined(key) {
			return Err(OptionsError::UndefinedOption {
				key: key.to_string(),
				defined: self.resolver.defined_options().collect::<Vec<_>>().join("\", \""),
			});
		}
		self.resolve_key(key)
	}

	/// Returns a string option
	pub fn get_str(&mut self, key: &str) -> Result<String> {
		match self.get(key)? {
			OptionValue::String(s) => Ok(s),
			other => Err(OptionsError::InvalidOptionType {
				key: key.to_string(),
				actual: other.option_type(),
				expected: OptionType::String.to_string(),
			}),
		}
	}

	/// Returns a boolean option
	pub fn get_bool(&mut self, key: &str) -> Result<bool> {
		match self.get(key)? {
			OptionValue::Bool(b) => Ok(b),
			other => Err(OptionsError::InvalidOptionType {
				key: key.to_string(),
				actual: other.option_type(),
				expected: OptionType::Bool.to_string(),
			}),
		}
	}

	/// Whether `key` has a value (override or default) in this resolution
	pub fn has_value(&self, key: &str) -> bool {
		self.overrides.contains_key(key) || self.resolver.defaults.contains_key(key)
	}

	fn resolve_key(&mut self, key: &str) -> Result<OptionValue> {
		if let Some(value) = self.resolved.get(key) {
			return Ok(value.clone());
		}

		if let Some(start) = self.stack.iter().position(|k| k == key) {
			let path = format!("{} -> {}", self.stack[start..].join(" -> "), key);
			tracing::debug!(key, %path, "circular option dependency");
			return Err(OptionsError::CircularDependency {
				key: key.to_string(),
				path,
			});
		}

		if self.stack.len() >= MAX_RESOLUTION_DEPTH {
			return Err(OptionsError::MaxDepthExceeded(self.stack.len()));
		}

		let resolver = self.resolver;
		let value = if let Some(value) = self.overrides.get(key) {
			value.clone()
		} else {
			match resolver.defaults.get(key) {
				Some(OptionDefault::Value(value)) => value.clone(),
				Some(OptionDefault::Lazy(provider)) => {
					self.stack.push(key.to_string());
					let result = provider(self);
					self.stack.pop();
					result?
				}
				None => {
					return Err(OptionsError::MissingOption {
						key: key.to_string(),
					});
				}
			}
		};

		resolver.validate(key, &value)?;
		self.resolved.insert(key.to_string(), value.clone());
		Ok(value)
	}
}
