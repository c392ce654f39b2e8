//! Authorization checks used to gate column visibility

use std::collections::HashSet;
use std::fmt::Debug;

/// Answers whether the current user holds a permission.
///
/// Columns consult it from their lazy `visible` default when a `permission`
/// option is set.
pub trait AuthorizationChecker: Debug + Send + Sync {
	/// Returns whether `permission` is granted
	fn is_granted(&self, permission: &str) -> bool;
}

/// Grants every permission
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationChecker for AllowAll {
	fn is_granted(&self, _permission: &str) -> bool {
		true
	}
}

/// Grants a fixed set of permissions, or everything for superusers
///
/// # Examples
///
/// ```
/// use datatables_tables::auth::{AuthorizationChecker, PermissionSet};
///
/// let perms = PermissionSet::new(["learners.view_email"]);
/// assert!(perms.is_granted("learners.view_email"));
/// assert!(!perms.is_granted("learners.delete"));
///
/// assert!(PermissionSet::superuser().is_granted("anything"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
	permissions: HashSet<String>,
	superuser: bool,
}

impl PermissionSet {
	pub fn new<I, S>(permissions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			permissions: permissions.into_iter().map(Into::into).collect(),
			superuser: false,
		}
	}

	pub fn superuser() -> Self {
		Self {
			permissions: HashSet::new(),
			superuser: true,
		}
	}

	pub fn grant(&mut self, permission: impl Into<String>) {
		self.permissions.insert(permission.into());
	}
}

impl AuthorizationChecker for PermissionSet {
	fn is_granted(&self, permission: &str) -> bool {
		self.superuser || self.permissions.contains(permission)
	}
}
