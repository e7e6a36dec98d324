//! Request extractors.

use ajoclub_db::entities::user::{self, UserRole};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

/// Authenticated user extractor.
///
/// The user row is placed in request extensions by the identity
/// middleware; requests without a resolvable actor are rejected.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Administrator extractor. Rejects non-admin actors.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if user.role != UserRole::Admin {
            return Err((StatusCode::FORBIDDEN, "Administrator access required"));
        }

        Ok(Self(user))
    }
}
