//! Support endpoints (inquiries and FAQs).

use ajoclub_common::AppError;
use ajoclub_core::{
    Actor, CreateFaqInput, CreateInquiryInput, RespondToInquiryInput, UpdateFaqInput,
};
use ajoclub_db::entities::{
    faq::{FaqCategory, Model as FaqModel},
    inquiry::{InquiryPriority, InquiryStatus, Model as InquiryModel},
    inquiry_response::Model as InquiryResponseModel,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create support router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inquiries", post(create_inquiry).get(list_inquiries))
        .route("/inquiries/{id}", get(show_inquiry))
        .route("/inquiries/{id}/status", put(set_inquiry_status))
        .route("/inquiries/{id}/responses", post(respond_to_inquiry))
        .route("/faqs", get(list_faqs).post(create_faq))
        .route("/faqs/all", get(list_all_faqs))
        .route("/faqs/{id}", put(update_faq))
}

/// Inquiry response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryResponseBody {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub message: String,
    pub status: InquiryStatus,
    pub priority: InquiryPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<InquiryReplyBody>>,
}

impl From<InquiryModel> for InquiryResponseBody {
    fn from(i: InquiryModel) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            subject: i.subject,
            message: i.message,
            status: i.status,
            priority: i.priority,
            assigned_to: i.assigned_to,
            created_at: i.created_at.to_rfc3339(),
            responses: None,
        }
    }
}

/// One reply in an inquiry thread.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryReplyBody {
    pub id: String,
    pub responder_id: String,
    pub message: String,
    pub created_at: String,
}

impl From<InquiryResponseModel> for InquiryReplyBody {
    fn from(r: InquiryResponseModel) -> Self {
        Self {
            id: r.id,
            responder_id: r.responder_id,
            message: r.message,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// FAQ response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqResponseBody {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: FaqCategory,
    pub is_published: bool,
}

impl From<FaqModel> for FaqResponseBody {
    fn from(f: FaqModel) -> Self {
        Self {
            id: f.id,
            question: f.question,
            answer: f.answer,
            category: f.category,
            is_published: f.is_published,
        }
    }
}

/// Request to move an inquiry through its lifecycle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInquiryStatusRequest {
    pub status: InquiryStatus,
}

/// FAQ listing filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqQuery {
    pub category: Option<FaqCategory>,
}

/// Open a new inquiry.
async fn create_inquiry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateInquiryInput>,
) -> Result<ApiResponse<InquiryResponseBody>, AppError> {
    let inquiry = state
        .support_service
        .create_inquiry(&Actor::from(&user), input)
        .await?;
    Ok(ApiResponse::ok(inquiry.into()))
}

/// List inquiries: admins see all, members see their own.
async fn list_inquiries(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<InquiryResponseBody>>, AppError> {
    let actor = Actor::from(&user);
    let inquiries = if actor.is_admin() {
        state.support_service.list_inquiries().await?
    } else {
        state.support_service.list_inquiries_for_user(&actor).await?
    };
    Ok(ApiResponse::ok(
        inquiries.into_iter().map(Into::into).collect(),
    ))
}

/// Get an inquiry with its response thread.
async fn show_inquiry(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<InquiryResponseBody>, AppError> {
    let (inquiry, responses) = state.support_service.get_inquiry(&id).await?;

    if inquiry.user_id != user.id && !Actor::from(&user).is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another member's inquiry".to_string(),
        ));
    }

    let mut body = InquiryResponseBody::from(inquiry);
    body.responses = Some(responses.into_iter().map(Into::into).collect());
    Ok(ApiResponse::ok(body))
}

/// Move an inquiry through its status lifecycle (admin).
async fn set_inquiry_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetInquiryStatusRequest>,
) -> Result<ApiResponse<InquiryResponseBody>, AppError> {
    let inquiry = state
        .support_service
        .set_inquiry_status(&id, &Actor::from(&admin), request.status)
        .await?;
    Ok(ApiResponse::ok(inquiry.into()))
}

/// Respond to an inquiry (admin).
async fn respond_to_inquiry(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RespondToInquiryInput>,
) -> Result<ApiResponse<InquiryReplyBody>, AppError> {
    let response = state
        .support_service
        .respond(&id, &Actor::from(&admin), input)
        .await?;
    Ok(ApiResponse::ok(response.into()))
}

/// List published FAQs, optionally filtered by category.
async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> Result<ApiResponse<Vec<FaqResponseBody>>, AppError> {
    let faqs = state.support_service.list_faqs(query.category).await?;
    Ok(ApiResponse::ok(faqs.into_iter().map(Into::into).collect()))
}

/// List all FAQs including unpublished (admin).
async fn list_all_faqs(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<FaqResponseBody>>, AppError> {
    let faqs = state.support_service.list_all_faqs().await?;
    Ok(ApiResponse::ok(faqs.into_iter().map(Into::into).collect()))
}

/// Create a FAQ (admin).
async fn create_faq(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFaqInput>,
) -> Result<ApiResponse<FaqResponseBody>, AppError> {
    let faq = state.support_service.create_faq(input).await?;
    Ok(ApiResponse::ok(faq.into()))
}

/// Update a FAQ (admin).
async fn update_faq(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateFaqInput>,
) -> Result<ApiResponse<FaqResponseBody>, AppError> {
    let faq = state.support_service.update_faq(&id, input).await?;
    Ok(ApiResponse::ok(faq.into()))
}
