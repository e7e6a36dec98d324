//! Auth stub endpoints.
//!
//! There is no session or token protocol; identity is an external
//! collaborator. This router only keeps the role-switcher stub the SPA
//! uses during development.

use ajoclub_common::AppError;
use axum::{Router, extract::Path, routing::get};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/switch-role/{role}", get(switch_role))
}

/// Role switch acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRoleResponse {
    pub role: String,
    pub message: String,
}

/// Validate a role name and acknowledge the switch.
async fn switch_role(
    Path(role): Path<String>,
) -> Result<ApiResponse<SwitchRoleResponse>, AppError> {
    if role != "admin" && role != "member" {
        return Err(AppError::Validation("Invalid role".to_string()));
    }

    Ok(ApiResponse::ok(SwitchRoleResponse {
        message: format!("Switched to {role} role"),
        role,
    }))
}
