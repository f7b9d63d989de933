//! Request extractors.
//!
//! The auth middleware resolves the bearer token ahead of routing; these
//! extractors only read the result from the request extensions, so a handler
//! states its auth requirement in its signature.

use axum::{extract::FromRequestParts, http::request::Parts};
use vidtube_common::AppError;
use vidtube_db::entities::user;

/// Authenticated user extractor. Rejects with a 401 envelope when no valid
/// bearer token accompanied the request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authenticated user extractor for endpoints that adapt their
/// response to the viewer but serve anonymous requests too.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
