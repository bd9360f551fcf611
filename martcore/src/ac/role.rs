use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_ts: i64,
}
