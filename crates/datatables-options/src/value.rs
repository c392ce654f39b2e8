//! Option values and their runtime types

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased payload carried by [`OptionValue::Callable`] and
/// [`OptionValue::Object`].
pub type SharedAny = Arc<dyn Any + Send + Sync>;

/// A single configuration value.
///
/// Plain data mirrors the JSON data model so that client-safe options can be
/// handed to a front-end unchanged. Functions and collaborator objects are
/// stored type-erased and recovered with [`OptionValue::downcast_callable`] /
/// [`OptionValue::downcast_object`].
#[derive(Clone)]
pub enum OptionValue {
	/// Explicit absence of a value
	Null,
	/// Boolean flag
	Bool(bool),
	/// Signed integer
	Int(i64),
	/// Floating point number
	Float(f64),
	/// UTF-8 string
	String(String),
	/// JSON array
	Array(Vec<Value>),
	/// JSON object
	Map(serde_json::Map<String, Value>),
	/// A function (callback) of any concrete type
	Callable(SharedAny),
	/// Any other shared value (layouts, services)
	Object(SharedAny),
}

/// Runtime type tag of an [`OptionValue`], used for allowed-type constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
	/// `null`
	Null,
	/// `bool`
	Bool,
	/// `int`
	Int,
	/// `float`
	Float,
	/// `string`
	String,
	/// `array`
	Array,
	/// `map`
	Map,
	/// `callable`
	Callable,
	/// `object`
	Object,
}

impl OptionType {
	/// Lowercase name used in error messages
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::Array => "array",
			Self::Map => "map",
			Self::Callable => "callable",
			Self::Object => "object",
		}
	}
}

impl fmt::Display for OptionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl OptionValue {
	/// Wraps a function (usually an `Arc<dyn Fn(..)>` alias) as a callable option.
	///
	/// # Examples
	///
	/// ```
	/// use datatables_options::{OptionType, OptionValue};
	/// use std::sync::Arc;
	///
	/// type Greeter = Arc<dyn Fn(&str) -> String + Send + Sync>;
	///
	/// let greeter: Greeter = Arc::new(|name| format!("Hello, {name}"));
	/// let value = OptionValue::callable(greeter);
	///
	/// assert_eq!(value.option_type(), OptionType::Callable);
	/// let f = value.downcast_callable::<Greeter>().unwrap();
	/// assert_eq!(f("Ann"), "Hello, Ann");
	/// ```
	pub fn callable<T: Any + Send + Sync>(f: T) -> Self {
		Self::Callable(Arc::new(f))
	}

	/// Wraps an arbitrary shared value as an object option.
	pub fn object<T: Any + Send + Sync>(value: T) -> Self {
		Self::Object(Arc::new(value))
	}

	/// Returns the runtime type tag of this value
	pub fn option_type(&self) -> OptionType {
		match self {
			Self::Null => OptionType::Null,
			Self::Bool(_) => OptionType::Bool,
			Self::Int(_) => OptionType::Int,
			Self::Float(_) => OptionType::Float,
			Self::String(_) => OptionType::String,
			Self::Array(_) => OptionType::Array,
			Self::Map(_) => OptionType::Map,
			Self::Callable(_) => OptionType::Callable,
			Self::Object(_) => OptionType::Object,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(i) => Some(*i as f64),
			Self::Float(f) => Some(*f),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(a) => Some(a),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&serde_json::Map<String, Value>> {
		match self {
			Self::Map(m) => Some(m),
			_ => None,
		}
	}

	/// Recovers the concrete function stored by [`OptionValue::callable`]
	pub fn downcast_callable<T: Any>(&self) -> Option<&T> {
		match self {
			Self::Callable(f) => f.downcast_ref::<T>(),
			_ => None,
		}
	}

	/// Recovers the concrete value stored by [`OptionValue::object`]
	pub fn downcast_object<T: Any>(&self) -> Option<&T> {
		match self {
			Self::Object(o) => o.downcast_ref::<T>(),
			_ => None,
		}
	}

	/// Converts to JSON.
	///
	/// Returns `None` for callables and objects, which have no JSON form.
	pub fn to_json(&self) -> Option<Value> {
		match self {
			Self::Null => Some(Value::Null),
			Self::Bool(b) => Some(Value::Bool(*b)),
			Self::Int(i) => Some(Value::from(*i)),
			Self::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
			Self::String(s) => Some(Value::String(s.clone())),
			Self::Array(a) => Some(Value::Array(a.clone())),
			Self::Map(m) => Some(Value::Object(m.clone())),
			Self::Callable(_) | Self::Object(_) => None,
		}
	}
}

impl PartialEq for OptionValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::Array(a), Self::Array(b)) => a == b,
			(Self::Map(a), Self::Map(b)) => a == b,
			// identity only
			(Self::Callable(a), Self::Callable(b)) | (Self::Object(a), Self::Object(b)) => {
				Arc::ptr_eq(a, b)
			}
			_ => false,
		}
	}
}

impl fmt::Debug for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
			Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
			Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
			Self::String(s) => f.debug_tuple("String").field(s).finish(),
			Self::Array(a) => f.debug_tuple("Array").field(a).finish(),
			Self::Map(m) => f.debug_tuple("Map").field(m).finish(),
			Self::Callable(_) => f.write_str("Callable(..)"),
			Self::Object(_) => f.write_str("Object(..)"),
		}
	}
}

impl From<Value> for OptionValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(b) => Self::Bool(b),
			Value::Number(n) => match n.as_i64() {
				Some(i) => Self::Int(i),
				None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			Value::String(s) => Self::String(s),
			Value::Array(a) => Self::Array(a),
			Value::Object(m) => Self::Map(m),
		}
	}
}

impl From<bool> for OptionValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for OptionValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for OptionValue {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<u32> for OptionValue {
	fn from(value: u32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<u64> for OptionValue {
	fn from(value: u64) -> Self {
		i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
	}
}

impl From<usize> for OptionValue {
	fn from(value: usize) -> Self {
		i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
	}
}

impl From<f64> for OptionValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for OptionValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for OptionValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for OptionValue {
	fn from(value: Vec<Value>) -> Self {
		Self::Array(value)
	}
}

impl From<serde_json::Map<String, Value>> for OptionValue {
	fn from(value: serde_json::Map<String, Value>) -> Self {
		Self::Map(value)
	}
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), OptionType::Null)]
	#[case(json!(true), OptionType::Bool)]
	#[case(json!(42), OptionType::Int)]
	#[case(json!(1.5), OptionType::Float)]
	#[case(json!("x"), OptionType::String)]
	#[case(json!([1, 2]), OptionType::Array)]
	#[case(json!({"a": 1}), OptionType::Map)]
	fn test_json_conversion_types(#[case] input: Value, #[case] expected: OptionType) {
		let value = OptionValue::from(input.clone());
		assert_eq!(value.option_type(), expected);
		assert_eq!(value.to_json(), Some(input));
	}

	#[rstest]
	fn test_callable_has_no_json_form() {
		let value = OptionValue::callable(|| 1);
		assert_eq!(value.to_json(), None);
	}

	#[rstest]
	fn test_callables_compare_by_identity() {
		let a = OptionValue::object(String::from("layout"));
		let b = a.clone();
		let c = OptionValue::object(String::from("layout"));

		assert_eq!(a, b);
		assert_ne!(a, c);
	}

	#[rstest]
	fn test_downcast_wrong_type_is_none() {
		let value = OptionValue::object(7_u8);
		assert_eq!(value.downcast_object::<u8>(), Some(&7));
		assert!(value.downcast_object::<String>().is_none());
		assert!(value.downcast_callable::<u8>().is_none());
	}

	#[rstest]
	fn test_option_conversion() {
		assert_eq!(OptionValue::from(None::<&str>), OptionValue::Null);
		assert_eq!(
			OptionValue::from(Some("20%")),
			OptionValue::String("20%".to_string())
		);
	}
}
