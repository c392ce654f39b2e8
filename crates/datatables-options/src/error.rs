//! Option resolution errors

use crate::value::OptionType;

/// Errors raised while declaring or resolving options
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
	/// A required option was given neither a default nor a value
	#[error("The required option \"{key}\" is missing.")]
	MissingOption {
		/// Name of the missing option
		key: String,
	},

	/// A value was supplied for an option that was never declared
	#[error("The option \"{key}\" does not exist. Defined options are: {defined}.")]
	UndefinedOption {
		/// Name of the unknown option
		key: String,
		/// Comma separated list of declared options
		defined: String,
	},

	/// The final value's runtime type is not among the allowed types
	#[error("The option \"{key}\" with value of type \"{actual}\" is expected to be of type {expected}.")]
	InvalidOptionType {
		/// Name of the offending option
		key: String,
		/// Runtime type of the resolved value
		actual: OptionType,
		/// Allowed types, joined with `|`
		expected: String,
	},

	/// The final value is not among the allowed values
	#[error("The option \"{key}\" has an invalid value: {value}.")]
	InvalidOptionValue {
		/// Name of the offending option
		key: String,
		/// Debug rendering of the rejected value
		value: String,
	},

	/// A lazy provider depends, directly or transitively, on its own key
	#[error("Circular option dependency detected: {key}\n  Path: {path}")]
	CircularDependency {
		/// Option that closed the cycle
		key: String,
		/// Resolution path (format: a -> b -> a)
		path: String,
	},

	/// Lazy providers nested deeper than the resolver allows
	#[error("Maximum option resolution depth exceeded: {0}")]
	MaxDepthExceeded(usize),

	/// A lazy provider failed for a domain reason
	#[error("The provider for option \"{key}\" failed: {message}")]
	Provider {
		/// Option whose provider failed
		key: String,
		/// Failure description
		message: String,
	},
}

/// Result type for option resolution
pub type Result<T> = std::result::Result<T, OptionsError>;

pub(crate) fn join_types(types: &[OptionType]) -> String {
	types
		.iter()
		.map(OptionType::as_str)
		.collect::<Vec<_>>()
		.join("|")
}
