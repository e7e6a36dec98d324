//! API endpoints.

mod auth;
mod contributions;
mod investments;
mod support;
mod upload;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/upload", upload::router())
        .nest("/contributions", contributions::router())
        .nest("/investments", investments::router())
        .nest("/support", support::router())
}
