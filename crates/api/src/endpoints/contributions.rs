//! Contribution endpoints.

use ajoclub_common::AppError;
use ajoclub_core::{Actor, SetContributionStatusInput, SubmitContributionInput};
use ajoclub_db::entities::{
    contribution::{ContributionStatus, Model as ContributionModel},
    user::Model as UserModel,
};
use ajoclub_db::repositories::{ContributionSummary, MonthlyContributionSummary};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create contribution router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_contribution).get(list_contributions))
        .route("/stats/summary", get(stats_summary))
        .route("/stats/monthly", get(stats_monthly))
        .route("/user/{user_id}", get(list_user_contributions))
        .route("/{id}", get(show_contribution))
        .route("/{id}/status", put(set_contribution_status))
}

/// Contribution response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub amount: f64,
    pub transaction_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_proof_url: Option<String>,
    pub contribution_date: NaiveDate,
    pub status: ContributionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: String,
}

impl From<ContributionModel> for ContributionResponse {
    fn from(c: ContributionModel) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            user_name: None,
            amount: c.amount,
            transaction_reference: c.transaction_reference,
            payment_proof_url: c.payment_proof_url,
            contribution_date: c.contribution_date,
            status: c.status,
            validated_by: c.validated_by,
            validation_date: c.validation_date.map(|d| d.to_rfc3339()),
            rejection_reason: c.rejection_reason,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

impl From<(ContributionModel, Option<UserModel>)> for ContributionResponse {
    fn from((c, u): (ContributionModel, Option<UserModel>)) -> Self {
        let mut response = Self::from(c);
        response.user_name = u.map(|u| u.name);
        response
    }
}

/// Summary statistics response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_contributions: i64,
    pub total_amount_validated: f64,
    pub total_amount_pending: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_contribution: Option<f64>,
}

impl From<ContributionSummary> for SummaryResponse {
    fn from(s: ContributionSummary) -> Self {
        Self {
            total_contributions: s.total_contributions,
            total_amount_validated: s.total_amount_validated,
            total_amount_pending: s.total_amount_pending,
            average_contribution: s.average_contribution,
        }
    }
}

/// Monthly summary response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryResponse {
    pub month: String,
    pub contribution_count: i64,
    pub total_amount: f64,
    pub average_amount: f64,
}

impl From<MonthlyContributionSummary> for MonthlySummaryResponse {
    fn from(m: MonthlyContributionSummary) -> Self {
        Self {
            month: m.month,
            contribution_count: m.contribution_count,
            total_amount: m.total_amount,
            average_amount: m.average_amount,
        }
    }
}

/// Submit a new contribution (starts `pending`).
async fn submit_contribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitContributionInput>,
) -> Result<ApiResponse<ContributionResponse>, AppError> {
    let contribution = state
        .contribution_service
        .submit(&Actor::from(&user), input)
        .await?;
    Ok(ApiResponse::ok(contribution.into()))
}

/// List all contributions (admin).
async fn list_contributions(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ContributionResponse>>, AppError> {
    let contributions = state.contribution_service.list_all().await?;
    Ok(ApiResponse::ok(
        contributions.into_iter().map(Into::into).collect(),
    ))
}

/// List a user's contributions (the user themselves, or an admin).
async fn list_user_contributions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<ContributionResponse>>, AppError> {
    if user.id != user_id && !Actor::from(&user).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's contributions".to_string(),
        ));
    }

    let contributions = state.contribution_service.list_for_user(&user_id).await?;
    Ok(ApiResponse::ok(
        contributions.into_iter().map(Into::into).collect(),
    ))
}

/// Get a single contribution.
async fn show_contribution(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ContributionResponse>, AppError> {
    let contribution = state.contribution_service.get(&id).await?;

    if contribution.user_id != user.id && !Actor::from(&user).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's contribution".to_string(),
        ));
    }

    Ok(ApiResponse::ok(contribution.into()))
}

/// Validate or reject a contribution (admin).
async fn set_contribution_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetContributionStatusInput>,
) -> Result<ApiResponse<ContributionResponse>, AppError> {
    let contribution = state
        .contribution_service
        .set_status(&id, &Actor::from(&admin), input)
        .await?;
    Ok(ApiResponse::ok(contribution.into()))
}

/// Club-wide contribution statistics.
async fn stats_summary(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<SummaryResponse>, AppError> {
    let summary = state.contribution_service.summary().await?;
    Ok(ApiResponse::ok(summary.into()))
}

/// Monthly grouped statistics over validated contributions.
async fn stats_monthly(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<MonthlySummaryResponse>>, AppError> {
    let months = state.contribution_service.monthly_summary().await?;
    Ok(ApiResponse::ok(months.into_iter().map(Into::into).collect()))
}
