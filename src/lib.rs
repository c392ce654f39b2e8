//! # Datatables
//!
//! Server-side data tables for client-side grids.
//!
//! A table is declared once on the server: its columns, how each cell is
//! rendered, which options the client grid receives and where the rows come
//! from. The same declaration then produces the view-model for the initial
//! page render and the ajax payloads for every subsequent page, sort or
//! search request.
//!
//! ## Crates
//!
//! - [`options`] - layered option resolution with lazy defaults
//! - [`tables`] - columns, tables, requests, data sources and views
//!
//! ## Feature Flags
//!
//! - `tables` (default) - everything in [`tables`]; without it only
//!   [`options`] is available
//!
//! ## Quick Example
//!
//! ```rust
//! use datatables::prelude::*;
//! use serde_json::json;
//!
//! struct Learners(MemoryDataSource);
//!
//! impl TableDefinition for Learners {
//!     fn build_columns(&self, builder: &mut ColumnBuilder) -> Result<()> {
//!         builder
//!             .add("name", ColumnSpec::link("Name").option("LinkTextField", "name").option("UrlField", "url"))?
//!             .add("active", ColumnSpec::boolean("Active"))?;
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
//!     json!({"name": "Ann", "url": "/learners/1", "active": true}),
//! ]);
//! let mut table = DataTable::builder(Learners(source)).table_id("learners")?.build()?;
//! table.handle_query("draw=1&start=0&length=10")?;
//!
//! let response = serde_json::to_value(table.ajax_response()?).unwrap();
//! assert_eq!(response["data"][0]["name"], json!(r#"<a href="/learners/1" alt="Ann">Ann</a>"#));
//! # Ok::<(), TableError>(())
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod options;
#[cfg(feature = "tables")]
pub mod tables;

#[cfg(feature = "tables")]
pub use datatables_tables::{Result, TableError};

/// Commonly used types
pub mod prelude {
	pub use datatables_options::{
		OptionMap, OptionType, OptionValue, Options, OptionsError, OptionsResolver, option_map,
	};

	#[cfg(feature = "tables")]
	pub use datatables_tables::prelude::*;
}
