//! Investment endpoints.

use ajoclub_common::AppError;
use ajoclub_core::{
    Actor, AddUpdateInput, CreateOpportunityInput, ParticipateInput, PerformanceMetrics,
    SetParticipationStatusInput, UpdateOpportunityInput,
};
use ajoclub_db::entities::{
    investment_opportunity::{Model as OpportunityModel, OpportunityStatus, RiskLevel},
    investment_participant::{Model as ParticipantModel, ParticipationStatus},
    investment_update::{Model as UpdateModel, UpdateType},
    user::Model as UserModel,
};
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

/// Create investment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_opportunity).get(list_opportunities))
        .route("/user/{user_id}/participations", get(user_participations))
        .route("/participations/{id}/status", put(set_participation_status))
        .route(
            "/{id}",
            get(show_opportunity)
                .put(update_opportunity)
                .delete(delete_opportunity),
        )
        .route("/{id}/participants", get(list_participants).post(participate))
        .route("/{id}/performance", get(performance))
        .route("/{id}/updates", get(list_updates).post(add_update))
}

/// Investment opportunity response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub minimum_investment: f64,
    pub expected_returns: f64,
    pub duration: i32,
    pub risk_level: RiskLevel,
    pub status: OpportunityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub created_by: String,
    pub created_at: String,
}

impl From<OpportunityModel> for OpportunityResponse {
    fn from(o: OpportunityModel) -> Self {
        Self {
            id: o.id,
            title: o.title,
            description: o.description,
            target_amount: o.target_amount,
            minimum_investment: o.minimum_investment,
            expected_returns: o.expected_returns,
            duration: o.duration,
            risk_level: o.risk_level,
            status: o.status,
            start_date: o.start_date,
            end_date: o.end_date,
            created_by: o.created_by,
            created_at: o.created_at.to_rfc3339(),
        }
    }
}

/// Participant response (joined with the member's details).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub amount: f64,
    pub status: ParticipationStatus,
    pub joined_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns_amount: Option<f64>,
}

impl From<(ParticipantModel, Option<UserModel>)> for ParticipantResponse {
    fn from((p, u): (ParticipantModel, Option<UserModel>)) -> Self {
        let (user_name, user_email) = match u {
            Some(u) => (Some(u.name), Some(u.email)),
            None => (None, None),
        };
        Self {
            id: p.id,
            user_id: p.user_id,
            user_name,
            user_email,
            amount: p.amount,
            status: p.status,
            joined_at: p.joined_at.to_rfc3339(),
            completed_at: p.completed_at.map(|d| d.to_rfc3339()),
            returns_amount: p.returns_amount,
        }
    }
}

impl From<ParticipantModel> for ParticipantResponse {
    fn from(p: ParticipantModel) -> Self {
        Self::from((p, None))
    }
}

/// A member's participation joined with its opportunity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationResponse {
    pub id: String,
    pub investment_id: String,
    pub amount: f64,
    pub status: ParticipationStatus,
    pub joined_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_returns: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_status: Option<OpportunityStatus>,
}

impl From<(ParticipantModel, Option<OpportunityModel>)> for ParticipationResponse {
    fn from((p, o): (ParticipantModel, Option<OpportunityModel>)) -> Self {
        let (title, expected_returns, duration, risk_level, investment_status) = match o {
            Some(o) => (
                Some(o.title),
                Some(o.expected_returns),
                Some(o.duration),
                Some(o.risk_level),
                Some(o.status),
            ),
            None => (None, None, None, None, None),
        };
        Self {
            id: p.id,
            investment_id: p.investment_id,
            amount: p.amount,
            status: p.status,
            joined_at: p.joined_at.to_rfc3339(),
            completed_at: p.completed_at.map(|d| d.to_rfc3339()),
            returns_amount: p.returns_amount,
            title,
            expected_returns,
            duration,
            risk_level,
            investment_status,
        }
    }
}

/// Investment update response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub id: String,
    pub investment_id: String,
    pub title: String,
    pub description: String,
    pub update_type: UpdateType,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    pub created_at: String,
}

impl From<(UpdateModel, Option<UserModel>)> for UpdateResponse {
    fn from((u, creator): (UpdateModel, Option<UserModel>)) -> Self {
        Self {
            id: u.id,
            investment_id: u.investment_id,
            title: u.title,
            description: u.description,
            update_type: u.update_type,
            created_by: u.created_by,
            created_by_name: creator.map(|c| c.name),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

impl From<UpdateModel> for UpdateResponse {
    fn from(u: UpdateModel) -> Self {
        Self::from((u, None))
    }
}

/// Funding metrics response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub participant_count: i64,
    pub total_invested: f64,
    pub min_investment: f64,
    pub max_investment: f64,
    pub average_investment: f64,
    pub target_amount: f64,
    pub funding_percentage: f64,
}

impl From<PerformanceMetrics> for PerformanceResponse {
    fn from(m: PerformanceMetrics) -> Self {
        Self {
            participant_count: m.participant_count,
            total_invested: m.total_invested,
            min_investment: m.min_investment,
            max_investment: m.max_investment,
            average_investment: m.average_investment,
            target_amount: m.target_amount,
            funding_percentage: m.funding_percentage,
        }
    }
}

/// Create a new opportunity in `draft` (admin).
async fn create_opportunity(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOpportunityInput>,
) -> Result<ApiResponse<OpportunityResponse>, AppError> {
    let opportunity = state
        .investment_service
        .create(&Actor::from(&admin), input)
        .await?;
    Ok(ApiResponse::ok(opportunity.into()))
}

/// List all opportunities.
async fn list_opportunities(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<OpportunityResponse>>, AppError> {
    let opportunities = state.investment_service.list().await?;
    Ok(ApiResponse::ok(
        opportunities.into_iter().map(Into::into).collect(),
    ))
}

/// Get a single opportunity.
async fn show_opportunity(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<OpportunityResponse>, AppError> {
    let opportunity = state.investment_service.get(&id).await?;
    Ok(ApiResponse::ok(opportunity.into()))
}

/// Update or transition an opportunity (admin).
async fn update_opportunity(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOpportunityInput>,
) -> Result<ApiResponse<OpportunityResponse>, AppError> {
    let opportunity = state.investment_service.update(&id, input).await?;
    Ok(ApiResponse::ok(opportunity.into()))
}

/// Delete an opportunity (admin).
async fn delete_opportunity(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.investment_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

/// List an opportunity's participants.
async fn list_participants(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<ParticipantResponse>>, AppError> {
    let participants = state.investment_service.participants(&id).await?;
    Ok(ApiResponse::ok(
        participants.into_iter().map(Into::into).collect(),
    ))
}

/// Join an open opportunity.
async fn participate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ParticipateInput>,
) -> Result<ApiResponse<ParticipantResponse>, AppError> {
    let participant = state
        .investment_service
        .participate(&id, &Actor::from(&user), input)
        .await?;
    Ok(ApiResponse::ok(participant.into()))
}

/// Funding metrics for an opportunity.
async fn performance(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<PerformanceResponse>, AppError> {
    let metrics = state.investment_service.performance(&id).await?;
    Ok(ApiResponse::ok(metrics.into()))
}

/// List a member's participations (the member themselves, or an admin).
async fn user_participations(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<ParticipationResponse>>, AppError> {
    if user.id != user_id && !Actor::from(&user).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's participations".to_string(),
        ));
    }

    let participations = state
        .investment_service
        .user_participations(&user_id)
        .await?;
    Ok(ApiResponse::ok(
        participations.into_iter().map(Into::into).collect(),
    ))
}

/// Activate or complete a participation (admin).
async fn set_participation_status(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetParticipationStatusInput>,
) -> Result<ApiResponse<ParticipantResponse>, AppError> {
    let participant = state
        .investment_service
        .set_participation_status(&id, input)
        .await?;
    Ok(ApiResponse::ok(participant.into()))
}

/// Append an update to an opportunity's log (admin).
async fn add_update(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddUpdateInput>,
) -> Result<ApiResponse<UpdateResponse>, AppError> {
    let update = state
        .investment_service
        .add_update(&id, &Actor::from(&admin), input)
        .await?;
    Ok(ApiResponse::ok(update.into()))
}

/// List an opportunity's updates.
async fn list_updates(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Vec<UpdateResponse>>, AppError> {
    let updates = state.investment_service.list_updates(&id).await?;
    Ok(ApiResponse::ok(updates.into_iter().map(Into::into).collect()))
}
