//! API middleware.

#![allow(missing_docs)]

use ajoclub_core::{
    ContributionService, InvestmentService, SupportService, UploadService, UserService,
};
use ajoclub_db::entities::user::UserStatus;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub upload_service: UploadService,
    pub contribution_service: ContributionService,
    pub investment_service: InvestmentService,
    pub support_service: SupportService,
}

/// Identity middleware.
///
/// Authentication is an external collaborator here: the caller's
/// identity arrives as an `X-Actor-Id` header and is resolved to a user
/// row, which downstream extractors turn into an explicit actor context.
/// Inactive accounts resolve to no actor at all.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(header) = req.headers().get("X-Actor-Id")
        && let Ok(actor_id) = header.to_str()
        && let Ok(Some(user)) = state.user_service.find_by_id(actor_id).await
        && user.status == UserStatus::Active
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
