use crate::auth::{AllowAll, AuthorizationChecker};
use crate::form::{DefaultFormFactory, FormFactory};
use crate::settings::TableSettings;
use crate::urls::{RouteMap, UrlGenerator};
use std::sync::Arc;

/// Collaborators and settings shared by the tables of an application
///
/// The default grants every permission, builds plain forms and routes
/// `datatables_ajax` to `/datatables/{table_id}`.
#[derive(Debug, Clone)]
pub struct TableServices {
	pub form_factory: Arc<dyn FormFactory>,
	pub authorization: Arc<dyn AuthorizationChecker>,
	pub router: Arc<dyn UrlGenerator>,
	pub settings: Arc<TableSettings>,
}

impl TableServices {
	pub fn with_settings(mut self, settings: TableSettings) -> Self {
		self.settings = Arc::new(settings);
		self
	}

	pub fn with_authorization(mut self, authorization: impl AuthorizationChecker + 'static) -> Self {
		self.authorization = Arc::new(authorization);
		self
	}

	pub fn with_router(mut self, router: impl UrlGenerator + 'static) -> Self {
		self.router = Arc::new(router);
		self
	}

	pub fn with_form_factory(mut self, form_factory: impl FormFactory + 'static) -> Self {
		self.form_factory = Arc::new(form_factory);
		self
	}
}

impl Default for TableServices {
	fn default() -> Self {
		let mut routes = RouteMap::new();
		routes.register("datatables_ajax", "/datatables/{table_id}");

		Self {
			form_factory: Arc::new(DefaultFormFactory),
			authorization: Arc::new(AllowAll),
			router: Arc::new(routes),
			settings: Arc::new(TableSettings::default()),
		}
	}
}
