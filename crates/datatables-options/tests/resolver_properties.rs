use datatables_options::{OptionMap, OptionValue, OptionsError, OptionsResolver};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn schema() -> impl Strategy<Value = BTreeMap<String, i64>> {
	prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12)
}

proptest! {
	#[test]
	fn resolving_without_overrides_returns_declared_defaults(defaults in schema()) {
		let mut resolver = OptionsResolver::new();
		for (key, value) in &defaults {
			resolver.set_default(key.clone(), *value);
		}

		let options = resolver.resolve(OptionMap::new()).unwrap();

		prop_assert_eq!(options.len(), defaults.len());
		for (key, value) in &defaults {
			prop_assert_eq!(options.get(key), Some(&OptionValue::Int(*value)));
		}
	}

	#[test]
	fn lazy_default_observes_overridden_dependency(default in any::<i64>(), overridden in any::<i64>()) {
		let mut resolver = OptionsResolver::new();
		resolver
			.set_default("source", default)
			.set_lazy_default("mirror", |options| options.get("source"));

		let mut overrides = OptionMap::new();
		overrides.insert("source".to_string(), OptionValue::Int(overridden));
		let options = resolver.resolve(overrides).unwrap();

		prop_assert_eq!(options.get("mirror"), Some(&OptionValue::Int(overridden)));
	}

	#[test]
	fn missing_required_key_always_fails(defaults in schema(), required in "[A-Z]{1,8}") {
		let mut resolver = OptionsResolver::new();
		for (key, value) in &defaults {
			resolver.set_default(key.clone(), *value);
		}
		resolver.set_required(required.clone());

		let err = resolver.resolve(OptionMap::new()).unwrap_err();
		prop_assert_eq!(err, OptionsError::MissingOption { key: required });
	}

	#[test]
	fn cycle_of_any_length_is_detected(len in 1usize..10) {
		let mut resolver = OptionsResolver::new();
		for i in 0..len {
			let next = format!("k{}", (i + 1) % len);
			resolver.set_lazy_default(format!("k{i}"), move |options| options.get(&next));
		}

		let result = resolver.resolve(OptionMap::new());
		let is_cycle = matches!(result, Err(OptionsError::CircularDependency { .. }));
		prop_assert!(is_cycle);
	}
}
