//! CurrentUser Extractor
//!
//! Handlers take `user: CurrentUser` directly; the value is the one
//! [`crate::auth::require_auth`] placed in the request extensions.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::utils::AppError;

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
