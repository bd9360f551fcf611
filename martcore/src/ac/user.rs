use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// The single role this user belongs to; `None` resolves to the
    /// empty permission set rather than an error.
    pub role_id: Option<i64>,
    pub created_ts: i64,
}
