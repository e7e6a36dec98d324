//! User endpoints.

use ajoclub_common::AppError;
use ajoclub_core::{Actor, CreateUserInput, UpdateUserInput};
use ajoclub_db::entities::user::{Model as UserModel, UserRole, UserStatus};
use ajoclub_db::repositories::UserStats;
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me/profile-picture", put(set_profile_picture))
        .route("/{id}", get(show_user).put(update_user).delete(deactivate_user))
        .route("/{id}/stats", get(user_stats))
}

/// User response. Email stays visible to the member themselves and to
/// admins only through these endpoints' access rules.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            status: u.status,
            profile_picture_url: u.profile_picture_url,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.map(|d| d.to_rfc3339()),
        }
    }
}

/// User statistics response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_contributions: i64,
    pub total_contribution_amount: f64,
    pub total_investments: i64,
    pub total_investment_amount: f64,
}

impl From<UserStats> for UserStatsResponse {
    fn from(s: UserStats) -> Self {
        Self {
            total_contributions: s.total_contributions,
            total_contribution_amount: s.total_contribution_amount,
            total_investments: s.total_investments,
            total_investment_amount: s.total_investment_amount,
        }
    }
}

/// Request to set the caller's profile picture.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProfilePictureRequest {
    pub file_id: String,
}

/// List all users (admin).
async fn list_users(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UserResponse>>, AppError> {
    let users = state.user_service.list().await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Register a new member or admin (admin).
async fn create_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.user_service.create(input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Get a user (the user themselves, or an admin).
async fn show_user(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    if caller.id != id && !Actor::from(&caller).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's account".to_string(),
        ));
    }

    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Update a user. Members may edit their own name and email; role and
/// status changes are admin-only.
async fn update_user(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let is_admin = Actor::from(&caller).is_admin();

    if caller.id != id && !is_admin {
        return Err(AppError::Forbidden(
            "Cannot edit another member's account".to_string(),
        ));
    }
    if !is_admin && (input.role.is_some() || input.status.is_some()) {
        return Err(AppError::Forbidden(
            "Only administrators can change role or status".to_string(),
        ));
    }

    let user = state.user_service.update(&id, input).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Deactivate a user (admin). Accounts are never hard-deleted; the
/// status flips to inactive instead.
async fn deactivate_user(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state.user_service.deactivate(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Set the caller's profile picture from one of their uploads.
async fn set_profile_picture(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<SetProfilePictureRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let user = state
        .user_service
        .set_profile_picture(&Actor::from(&caller), &request.file_id)
        .await?;
    Ok(ApiResponse::ok(user.into()))
}

/// Aggregate statistics for a user (the user themselves, or an admin).
async fn user_stats(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserStatsResponse>, AppError> {
    if caller.id != id && !Actor::from(&caller).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's statistics".to_string(),
        ));
    }

    let stats = state.user_service.stats(&id).await?;
    Ok(ApiResponse::ok(stats.into()))
}
