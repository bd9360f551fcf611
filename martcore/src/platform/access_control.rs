use crate::{
    platform::PlatformUrl,
    ac::{
        traits::{
            PermissionBackend,
            RoleBackend,
            SessionBackend,
            UserBackend,
        },
    },
};

/// ACPlatform - Access Control Platform
///
/// This platform is used to persist the role and permission assignment
/// records that access decisions are derived from.
///
/// This trait is applicable to everything that correctly implements the
/// relevant backends that compose this trait.
pub trait ACPlatform: PermissionBackend
    + RoleBackend
    + UserBackend
    + SessionBackend

    + PlatformUrl

    + Send
    + Sync
{
    fn as_dyn(&self) -> &dyn ACPlatform;
}

pub trait DefaultACPlatform: ACPlatform {}

impl<P: PermissionBackend
    + RoleBackend
    + UserBackend
    + SessionBackend

    + PlatformUrl

    + DefaultACPlatform

    + Send
    + Sync
> ACPlatform for P {
    fn as_dyn(&self) -> &(dyn ACPlatform) {
        self
    }
}
