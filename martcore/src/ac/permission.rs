use serde::{Deserialize, Serialize};

/// A catalog entry as persisted.  Codes are immutable once provisioned;
/// assignments reference entries by id.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: PermissionCategory,
}

/// The two categories a permission code may belong to.  This set is
/// closed: `menu` gates visibility of a console section, `action` gates
/// an operation within one.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionCategory {
    Menu,
    Action,
}

mod impls;
pub use impls::{
    menu_code,
    parse_code,
};
