//! Filter forms
//!
//! Only the contract tables rely on lives here: a named builder that collects
//! fields, the resulting [`Form`] (its field count and a serializable view),
//! and extraction of submitted values into filter criteria. Widget rendering
//! and validation belong to the form subsystem of the surrounding
//! application.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Debug;

/// Kind of a filter form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
	/// Submit/apply control; carries no criteria
	Button,
	Text,
	Number,
	Date,
	Choice,
	Checkbox,
	Hidden,
}

/// A declared form field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
	name: String,
	#[serde(rename = "type")]
	field_type: FieldType,
	label: Option<String>,
}

impl FormField {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn field_type(&self) -> FieldType {
		self.field_type
	}

	pub fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}
}

/// Creates named form builders
pub trait FormFactory: Debug + Send + Sync {
	/// Starts a form whose fields are submitted under `name[field]`
	fn create_named_builder(&self, name: &str) -> FormBuilder;
}

/// Factory producing plain [`FormBuilder`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormFactory;

impl FormFactory for DefaultFormFactory {
	fn create_named_builder(&self, name: &str) -> FormBuilder {
		FormBuilder::new(name)
	}
}

/// Collects fields for a [`Form`]
///
/// # Examples
///
/// ```
/// use datatables_tables::form::{FieldType, FormBuilder};
///
/// let form = FormBuilder::new("learners_filter")
///     .add("dofilter", FieldType::Button)
///     .add("status", FieldType::Choice)
///     .get_form();
///
/// assert_eq!(form.count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
	name: String,
	fields: IndexMap<String, FormField>,
}

impl FormBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: IndexMap::new(),
		}
	}

	/// Adds a field; re-adding a name replaces the earlier field in place
	pub fn add(self, name: impl Into<String>, field_type: FieldType) -> Self {
		self.add_field(name.into(), field_type, None)
	}

	/// Adds a field with a display label
	pub fn add_labeled(
		self,
		name: impl Into<String>,
		field_type: FieldType,
		label: impl Into<String>,
	) -> Self {
		self.add_field(name.into(), field_type, Some(label.into()))
	}

	fn add_field(mut self, name: String, field_type: FieldType, label: Option<String>) -> Self {
		self.fields.insert(
			name.clone(),
			FormField {
				name,
				field_type,
				label,
			},
		);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn get_form(self) -> Form {
		Form {
			name: self.name,
			fields: self.fields,
		}
	}
}

/// A built filter form
#[derive(Debug, Clone)]
pub struct Form {
	name: String,
	fields: IndexMap<String, FormField>,
}

impl Form {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Number of fields, including the submit control
	pub fn count(&self) -> usize {
		self.fields.len()
	}

	pub fn fields(&self) -> impl Iterator<Item = &FormField> {
		self.fields.values()
	}

	pub fn field(&self, name: &str) -> Option<&FormField> {
		self.fields.get(name)
	}

	/// Request parameter name of a field: `form_name[field]`
	pub fn param_name(&self, field: &str) -> String {
		format!("{}[{}]", self.name, field)
	}

	/// Extracts submitted, non-empty values of the form's data fields.
	///
	/// Buttons never produce criteria. The result is keyed by field name in
	/// field declaration order.
	///
	/// # Examples
	///
	/// ```
	/// use datatables_tables::form::{FieldType, FormBuilder};
	/// use std::collections::HashMap;
	///
	/// let form = FormBuilder::new("f")
	///     .add("dofilter", FieldType::Button)
	///     .add("status", FieldType::Choice)
	///     .add("city", FieldType::Text)
	///     .get_form();
	///
	/// let params = HashMap::from([
	///     ("f[status]".to_string(), "active".to_string()),
	///     ("f[city]".to_string(), String::new()),
	///     ("f[dofilter]".to_string(), "1".to_string()),
	/// ]);
	///
	/// let criteria = form.criteria(&params);
	/// assert_eq!(criteria.len(), 1);
	/// assert_eq!(criteria["status"], "active");
	/// ```
	pub fn criteria<S: std::hash::BuildHasher>(
		&self,
		params: &std::collections::HashMap<String, String, S>,
	) -> IndexMap<String, String> {
		self.fields
			.values()
			.filter(|field| field.field_type != FieldType::Button)
			.filter_map(|field| {
				let value = params.get(&self.param_name(&field.name))?;
				let value = value.trim();
				(!value.is_empty()).then(|| (field.name.clone(), value.to_string()))
			})
			.collect()
	}

	/// Builds the serializable view handed to templates
	pub fn create_view(&self) -> FormView {
		FormView {
			name: self.name.clone(),
			fields: self
				.fields
				.values()
				.map(|field| FieldView {
					id: format!("{}_{}", self.name, field.name),
					full_name: self.param_name(&field.name),
					field: field.clone(),
				})
				.collect(),
		}
	}
}

/// Template-facing view of a [`Form`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
	pub name: String,
	pub fields: Vec<FieldView>,
}

/// Template-facing view of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
	/// HTML id attribute
	pub id: String,
	/// Submitted parameter name
	pub full_name: String,
	#[serde(flatten)]
	pub field: FormField,
}
