//! Layered option resolution
//!
//! This crate declares option schemas (defaults, required keys, allowed
//! types and values, lazily computed defaults) and resolves caller-supplied
//! overrides against them into immutable, validated option sets.
//!
//! Tables and columns use it to configure themselves; it has no knowledge of
//! either.
//!
//! # Example
//!
//! ```rust
//! use datatables_options::{OptionsResolver, OptionType, option_map};
//!
//! let mut resolver = OptionsResolver::new();
//! resolver
//!     .set_default("client_side_filtering", false)
//!     .set_allowed_types("client_side_filtering", &[OptionType::Bool])
//!     .set_lazy_default("server_side", |options| {
//!         Ok((!options.get_bool("client_side_filtering")?).into())
//!     });
//!
//! let options = resolver
//!     .resolve(option_map! { "client_side_filtering" => true })
//!     .unwrap();
//! assert_eq!(options.get_bool("server_side"), Ok(false));
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod options;
pub mod resolver;
pub mod value;

pub use error::{OptionsError, Result};
pub use options::{OptionMap, Options};
pub use resolver::{LazyOptions, LazyProvider, OptionDefault, OptionsResolver};
pub use value::{OptionType, OptionValue, SharedAny};

/// Builds an [`OptionMap`] from `key => value` pairs.
///
/// Values go through `OptionValue::from`, so plain literals work.
///
/// ```
/// use datatables_options::{OptionValue, option_map};
///
/// let overrides = option_map! { "width" => "20%", "visible" => false };
/// assert_eq!(overrides["visible"], OptionValue::Bool(false));
/// ```
#[macro_export]
macro_rules! option_map {
	() => {
		$crate::OptionMap::new()
	};
	($($key:expr => $value:expr),+ $(,)?) => {{
		let mut map = $crate::OptionMap::new();
		$(
			map.insert(::std::string::String::from($key), $crate::OptionValue::from($value));
		)+
		map
	}};
}
