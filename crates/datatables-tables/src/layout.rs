//! Client grid layouts

use std::fmt::Debug;

/// Describes how the client grid arranges its controls around the table.
pub trait Layout: Debug + Send + Sync {
	/// Short identifier, usable by templates
	fn name(&self) -> &str;

	/// Control placement string understood by the grid widget
	fn dom(&self) -> &str;

	/// CSS classes applied to the `<table>` element
	fn table_class(&self) -> &str {
		""
	}
}

/// Bootstrap grid markup (the default layout)
#[derive(Debug, Clone, Copy, Default)]
pub struct Bootstrap;

impl Layout for Bootstrap {
	fn name(&self) -> &str {
		"bootstrap"
	}

	fn dom(&self) -> &str {
		"<'row'<'col-sm-6'l><'col-sm-6'f>><'row'<'col-sm-12'tr>><'row'<'col-sm-5'i><'col-sm-7'p>>"
	}

	fn table_class(&self) -> &str {
		"table table-striped table-bordered"
	}
}

/// Unstyled layout using the widget's built-in placement
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Layout for Plain {
	fn name(&self) -> &str {
		"plain"
	}

	fn dom(&self) -> &str {
		"lfrtip"
	}
}
