//! Options module.
//!
//! This module provides layered option resolution: defaults, required keys,
//! type and value constraints, and lazy defaults computed from other options.
//!
//! # Examples
//!
//! ```rust
//! use datatables::options::{OptionsResolver, option_map};
//!
//! let mut resolver = OptionsResolver::new();
//! resolver
//!     .set_default("width", "auto")
//!     .set_lazy_default("label", |options| options.get("width"));
//!
//! let options = resolver.resolve(option_map! { "width" => "20%" }).unwrap();
//! assert_eq!(options.get_str("label"), Ok("20%"));
//! ```

pub use datatables_options::*;
