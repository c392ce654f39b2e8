//! Error types for table definition, formatting and request handling

use datatables_options::OptionsError;

/// Errors raised by tables and their columns
#[derive(Debug, thiserror::Error)]
pub enum TableError {
	/// Option declaration or resolution failed
	#[error(transparent)]
	Options(#[from] OptionsError),

	/// Two columns were declared for the same field
	#[error("A column is already registered for field \"{0}\"")]
	DuplicateColumn(String),

	/// A column was declared with an empty field
	#[error("Column field must not be empty (label: \"{0}\")")]
	EmptyField(String),

	/// A row lacks a field a column needs to render
	#[error("Column \"{column}\" requires field \"{field}\" which is missing from the row")]
	MissingField {
		/// Field bound to the column that failed
		column: String,
		/// Row key that could not be found
		field: String,
	},

	/// Table state was read before resolution completed
	#[error("Table is not resolved yet: {0}")]
	Unresolved(&'static str),

	/// The memoized filter form was read before it was first built
	#[error("The filter form has not been built yet")]
	FilterFormNotBuilt,

	/// The table was built without an identifier
	#[error("Table identifier has not been set")]
	TableIdNotSet,

	/// A second identifier was assigned
	#[error("Table identifier is already set to \"{0}\"")]
	TableIdAlreadySet(String),

	/// The inbound request carried malformed parameters
	#[error("Invalid request parameter \"{param}\": {message}")]
	InvalidRequest {
		/// Offending parameter name
		param: String,
		/// What was wrong with it
		message: String,
	},

	/// A URL could not be generated for a route
	#[error("Unknown route \"{0}\"")]
	UnknownRoute(String),

	/// No table is registered under the requested name
	#[error("No table registered under \"{0}\"")]
	UnknownTable(String),

	/// The underlying data source failed; returned by [`crate::datasource::DataSource`]
	/// implementations backed by external storage
	#[error("Data source error: {0}")]
	DataSource(String),

	/// Settings could not be loaded
	#[error("Invalid settings: {0}")]
	Settings(String),

	/// An HTTP response could not be assembled
	#[error("HTTP error: {0}")]
	Http(#[from] http::Error),

	/// The view-model could not be serialized
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;
