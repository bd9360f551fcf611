use serde::{
    Deserialize,
    Deserializer,
};
use crate::ac::permission::PermissionCategory;
use super::{
    PermissionGrant,
    PermissionSet,
};

// Incoming payloads are renormalized so membership checks stay valid
// regardless of the order the producer emitted the grants in.
impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {
        Ok(Vec::<PermissionGrant>::deserialize(deserializer)?.into())
    }
}

impl From<Vec<PermissionGrant>> for PermissionSet {
    fn from(mut grants: Vec<PermissionGrant>) -> Self {
        grants.sort();
        grants.dedup_by(|a, b| a.code == b.code);
        Self(grants)
    }
}

impl FromIterator<PermissionGrant> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = PermissionGrant>>(iter: I) -> Self {
        iter.into_iter()
            .collect::<Vec<_>>()
            .into()
    }
}

impl IntoIterator for PermissionSet {
    type Item = PermissionGrant;
    type IntoIter = std::vec::IntoIter<PermissionGrant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PermissionSet {
    pub fn contains(&self, code: &str) -> bool {
        self.0
            .binary_search_by(|grant| grant.code.as_str().cmp(code))
            .is_ok()
    }

    /// The subset gating console section visibility.
    pub fn menu(&self) -> PermissionSet {
        self.filtered(PermissionCategory::Menu)
    }

    /// The subset gating operations.
    pub fn action(&self) -> PermissionSet {
        self.filtered(PermissionCategory::Action)
    }

    fn filtered(&self, category: PermissionCategory) -> PermissionSet {
        Self(self.0
            .iter()
            .filter(|grant| grant.category == category)
            .cloned()
            .collect()
        )
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .map(|grant| grant.code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionGrant> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
