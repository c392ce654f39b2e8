//! Server-side data tables
//!
//! This crate declares data tables on the server and produces everything a
//! client-side grid needs: column definitions, formatted rows, row counts
//! and ajax payloads.
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[DataTable] --> B[TableDefinition]
//!     A --> C[ColumnSet]
//!     A --> D[Table Options]
//!     A --> E[Filter Form]
//!     A --> F[PaginateRequest]
//!     B --> G[DataSource]
//!     C --> H[Column]
//!     H --> I[ColumnType]
//!     I --> J[TextColumn]
//!     I --> K[LinkColumn]
//!     I --> L[DateTimeColumn]
//!     I --> M[BooleanColumn]
//!     A --> N[Formatter]
//!     A --> O[TableView / AjaxResponse]
//! ```
//!
//! Options of tables and columns are declared and resolved with
//! [`datatables_options`]: defaults, required keys, type constraints and
//! lazy defaults computed from other options.
//!
//! # Example
//!
//! ```
//! use datatables_tables::prelude::*;
//! use serde_json::json;
//!
//! struct Learners(MemoryDataSource);
//!
//! impl TableDefinition for Learners {
//!     fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
//!         builder
//!             .add("Learner.LastName", ColumnSpec::text("Last name"))?
//!             .add("Learner.FirstName", ColumnSpec::text("First name"))?;
//!         Ok(())
//!     }
//!
//!     fn data_iterator(&self, request: Option<&PaginateRequest>) -> Result<RowIter<'_>> {
//!         self.0.iterate(request)
//!     }
//!
//!     fn unfiltered_count(&self) -> Result<u64> {
//!         self.0.count_all()
//!     }
//!
//!     fn filtered_count(&self, request: Option<&PaginateRequest>) -> Result<Option<u64>> {
//!         self.0.count_filtered(request)
//!     }
//! }
//!
//! let source = MemoryDataSource::from_values([
//!     json!({"Learner": {"FirstName": "Ann", "LastName": "Lee"}}),
//! ]);
//! let table = DataTable::builder(Learners(source)).table_id("learners")?.build()?;
//!
//! let view = table.build_view()?.to_json()?;
//! assert_eq!(view["data"], json!([{"Learner.LastName": "Lee", "Learner.FirstName": "Ann"}]));
//! assert_eq!(view["filteredRowsCount"], json!(1));
//! # Ok::<(), TableError>(())
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod builder;
pub mod column;
pub mod datasource;
pub mod error;
pub mod form;
pub mod formatter;
pub mod layout;
pub mod registry;
pub mod request;
pub mod row;
pub mod settings;
pub mod table;
pub mod urls;

pub use error::{Result, TableError};

/// Commonly used types
pub mod prelude {
	pub use crate::auth::{AllowAll, AuthorizationChecker, PermissionSet};
	pub use crate::builder::{ColumnBuilder, ColumnSet};
	pub use crate::column::{
		BooleanColumn, Column, ColumnContext, ColumnSpec, ColumnType, DateTimeColumn, LinkColumn,
		TextColumn,
	};
	pub use crate::datasource::{DataSource, MemoryDataSource, RowIter};
	pub use crate::error::{Result, TableError};
	pub use crate::form::{FieldType, FormBuilder};
	pub use crate::formatter::{Formatter, ValueFormatter};
	pub use crate::layout::{Bootstrap, Layout, Plain};
	pub use crate::registry::{AnyTable, DataTableRegistry};
	pub use crate::request::{PaginateRequest, SortDirection, SortOrder};
	pub use crate::row::Row;
	pub use crate::settings::TableSettings;
	pub use crate::table::{DataTable, TableDefinition, TableServices};
	pub use datatables_options::{OptionValue, option_map};
}
