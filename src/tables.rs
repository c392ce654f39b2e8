//! Tables module.
//!
//! This module provides table definitions, column types, request parsing,
//! data sources and the view-model consumed by client grids.

pub use datatables_tables::*;
