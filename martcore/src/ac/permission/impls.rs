use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::{
    Permission,
    PermissionCategory,
};

impl From<PermissionCategory> for &'static str {
    fn from(category: PermissionCategory) -> &'static str {
        match category {
            PermissionCategory::Menu => "menu",
            PermissionCategory::Action => "action",
        }
    }
}

impl fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str((*self).into())
    }
}

impl FromStr for PermissionCategory {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(PermissionCategory::Menu),
            "action" => Ok(PermissionCategory::Action),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl Permission {
    /// The `<resource>` segment of this permission's code.
    pub fn resource(&self) -> Option<&str> {
        parse_code(&self.code)
            .map(|(_, resource)| resource)
            .ok()
    }
}

/// Validates a permission code against the `menu.<resource>` /
/// `action.<resource>.<verb>` format, returning the category together
/// with the `<resource>` segment.  Codes are case-sensitive and every
/// segment must be non-empty.
pub fn parse_code(code: &str) -> Result<(PermissionCategory, &str), ValueError> {
    if let Some(resource) = code.strip_prefix("menu.") {
        if !resource.is_empty() && !resource.contains('.') {
            return Ok((PermissionCategory::Menu, resource));
        }
    } else if let Some(rest) = code.strip_prefix("action.") {
        let mut segments = rest.splitn(2, '.');
        if let (Some(resource), Some(verb)) = (segments.next(), segments.next()) {
            if !resource.is_empty() && !verb.is_empty() && !verb.contains('.') {
                return Ok((PermissionCategory::Action, resource));
            }
        }
    }
    Err(ValueError::Unsupported(
        format!("{code} is not a valid permission code")
    ))
}

/// The menu code that gates visibility for the given resource.
pub fn menu_code(resource: &str) -> String {
    format!("menu.{resource}")
}
