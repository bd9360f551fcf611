use serde::{Deserialize, Serialize};
use crate::ac::permission::PermissionCategory;

/// A single `(code, category)` row resolved from the role assignment
/// join for one principal.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct PermissionGrant {
    pub code: String,
    pub category: PermissionCategory,
}

/// The permissions resolved for one principal, normalized so the result
/// is independent of assignment row order.  A principal without a role
/// resolves to the empty set.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PermissionSet(Vec<PermissionGrant>);

mod impls;
