//! Access policy
//!
//! One capability check for every order read and mutation: the acting
//! user may proceed when they are an admin or own the resource.
//! Denials are written to the `security` log target.

use thiserror::Error;

use crate::auth::CurrentUser;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("You do not have access to this resource")]
    NotOwner,

    #[error("Admin role required")]
    AdminRequired,
}

impl From<AccessDenied> for AppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::NotOwner => AppError::with_message(ErrorCode::PermissionDenied, denied.to_string()),
            AccessDenied::AdminRequired => AppError::admin_required(),
        }
    }
}

/// Grant when `actor` is an admin or `owner_id` is the actor.
pub fn authorize(actor: &CurrentUser, owner_id: i64, resource: &str, resource_id: i64) -> Result<(), AccessDenied> {
    if actor.is_admin() || actor.id == owner_id {
        return Ok(());
    }
    security_log!(
        WARN,
        "access_denied",
        user_id = actor.id,
        username = %actor.username,
        resource = resource,
        resource_id = resource_id
    );
    Err(AccessDenied::NotOwner)
}

/// Grant only to admins.
pub fn authorize_admin(actor: &CurrentUser) -> Result<(), AccessDenied> {
    if actor.is_admin() {
        return Ok(());
    }
    security_log!(
        WARN,
        "admin_required",
        user_id = actor.id,
        username = %actor.username,
        role = %actor.role
    );
    Err(AccessDenied::AdminRequired)
}
