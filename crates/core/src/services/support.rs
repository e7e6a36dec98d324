//! Support service (inquiries and FAQs).

use ajoclub_common::{AppError, AppResult, IdGenerator};
use ajoclub_db::entities::{
    faq::{self, FaqCategory},
    inquiry::{self, InquiryPriority, InquiryStatus},
    inquiry_response,
};
use ajoclub_db::repositories::{FaqRepository, InquiryRepository};
use chrono::Utc;
use sea_orm::{ActiveEnum, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::Actor;

/// Input for opening an inquiry.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryInput {
    #[validate(length(min = 1, max = 256))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub priority: Option<InquiryPriority>,
}

/// Input for responding to an inquiry.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondToInquiryInput {
    #[validate(length(min = 1))]
    pub message: String,
}

/// Input for creating a FAQ.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFaqInput {
    #[validate(length(min = 1, max = 512))]
    pub question: String,
    #[validate(length(min = 1))]
    pub answer: String,
    pub category: FaqCategory,
}

/// Input for a partial FAQ update.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFaqInput {
    #[validate(length(min = 1, max = 512))]
    pub question: Option<String>,
    #[validate(length(min = 1))]
    pub answer: Option<String>,
    pub category: Option<FaqCategory>,
    pub is_published: Option<bool>,
}

/// Service for member support.
#[derive(Clone)]
pub struct SupportService {
    inquiry_repo: InquiryRepository,
    faq_repo: FaqRepository,
    id_gen: IdGenerator,
}

impl SupportService {
    /// Create a new support service.
    #[must_use]
    pub const fn new(inquiry_repo: InquiryRepository, faq_repo: FaqRepository) -> Self {
        Self {
            inquiry_repo,
            faq_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Open a new inquiry on behalf of the acting member.
    pub async fn create_inquiry(
        &self,
        actor: &Actor,
        input: CreateInquiryInput,
    ) -> AppResult<inquiry::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = inquiry::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            subject: Set(input.subject),
            message: Set(input.message),
            status: Set(InquiryStatus::Pending),
            priority: Set(input.priority.unwrap_or(InquiryPriority::Medium)),
            assigned_to: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        self.inquiry_repo.create(model).await
    }

    /// Get an inquiry with its response thread.
    pub async fn get_inquiry(
        &self,
        id: &str,
    ) -> AppResult<(inquiry::Model, Vec<inquiry_response::Model>)> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let responses = self.inquiry_repo.find_responses(id).await?;
        Ok((inquiry, responses))
    }

    /// List all inquiries (admin view).
    pub async fn list_inquiries(&self) -> AppResult<Vec<inquiry::Model>> {
        self.inquiry_repo.find_all().await
    }

    /// List the acting member's inquiries.
    pub async fn list_inquiries_for_user(&self, actor: &Actor) -> AppResult<Vec<inquiry::Model>> {
        self.inquiry_repo.find_by_user(&actor.id).await
    }

    /// Move an inquiry through its status lifecycle, optionally
    /// assigning it to the acting admin.
    pub async fn set_inquiry_status(
        &self,
        id: &str,
        actor: &Actor,
        status: InquiryStatus,
    ) -> AppResult<inquiry::Model> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;

        if !inquiry.status.can_transition_to(status) {
            return Err(AppError::InvalidState(format!(
                "Cannot change inquiry status from {} to {}",
                inquiry.status.to_value(),
                status.to_value()
            )));
        }

        let mut model: inquiry::ActiveModel = inquiry.into();
        model.status = Set(status);
        if status == InquiryStatus::InProgress {
            model.assigned_to = Set(Some(actor.id.clone()));
        }
        model.updated_at = Set(Some(Utc::now()));

        self.inquiry_repo.update(model).await
    }

    /// Append a response to an inquiry.
    pub async fn respond(
        &self,
        inquiry_id: &str,
        actor: &Actor,
        input: RespondToInquiryInput,
    ) -> AppResult<inquiry_response::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.inquiry_repo.get_by_id(inquiry_id).await?;

        let model = inquiry_response::ActiveModel {
            id: Set(self.id_gen.generate()),
            inquiry_id: Set(inquiry_id.to_string()),
            responder_id: Set(actor.id.clone()),
            message: Set(input.message),
            created_at: Set(Utc::now()),
        };

        self.inquiry_repo.create_response(model).await
    }

    /// List published FAQs, optionally by category.
    pub async fn list_faqs(&self, category: Option<FaqCategory>) -> AppResult<Vec<faq::Model>> {
        self.faq_repo.find_published(category).await
    }

    /// List all FAQs including unpublished (admin view).
    pub async fn list_all_faqs(&self) -> AppResult<Vec<faq::Model>> {
        self.faq_repo.find_all().await
    }

    /// Create a new published FAQ.
    pub async fn create_faq(&self, input: CreateFaqInput) -> AppResult<faq::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = faq::ActiveModel {
            id: Set(self.id_gen.generate()),
            question: Set(input.question),
            answer: Set(input.answer),
            category: Set(input.category),
            is_published: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        self.faq_repo.create(model).await
    }

    /// Partially update a FAQ.
    pub async fn update_faq(&self, id: &str, input: UpdateFaqInput) -> AppResult<faq::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let faq = self.faq_repo.get_by_id(id).await?;

        let mut model: faq::ActiveModel = faq.into();
        if let Some(question) = input.question {
            model.question = Set(question);
        }
        if let Some(answer) = input.answer {
            model.answer = Set(answer);
        }
        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(is_published) = input.is_published {
            model.is_published = Set(is_published);
        }
        model.updated_at = Set(Some(Utc::now()));

        self.faq_repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ajoclub_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn member() -> Actor {
        Actor {
            id: "member1".to_string(),
            role: UserRole::Member,
        }
    }

    fn admin() -> Actor {
        Actor {
            id: "admin1".to_string(),
            role: UserRole::Admin,
        }
    }

    fn mock_inquiry(id: &str, status: InquiryStatus) -> inquiry::Model {
        inquiry::Model {
            id: id.to_string(),
            user_id: "member1".to_string(),
            subject: "Missing contribution".to_string(),
            message: "My July payment still shows pending".to_string(),
            status,
            priority: InquiryPriority::Medium,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> SupportService {
        let db = Arc::new(db);
        SupportService::new(
            InquiryRepository::new(Arc::clone(&db)),
            FaqRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_inquiry_defaults_to_medium_priority() {
        let created = mock_inquiry("i1", InquiryStatus::Pending);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[created]])
            .into_connection();
        let service = service(db);

        let result = service
            .create_inquiry(
                &member(),
                CreateInquiryInput {
                    subject: "Missing contribution".to_string(),
                    message: "My July payment still shows pending".to_string(),
                    priority: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.status, InquiryStatus::Pending);
        assert_eq!(result.priority, InquiryPriority::Medium);
    }

    #[tokio::test]
    async fn test_create_inquiry_requires_subject() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db);

        let result = service
            .create_inquiry(
                &member(),
                CreateInquiryInput {
                    subject: String::new(),
                    message: "hello".to_string(),
                    priority: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_in_progress_assigns_the_admin() {
        let pending = mock_inquiry("i1", InquiryStatus::Pending);
        let mut in_progress = pending.clone();
        in_progress.status = InquiryStatus::InProgress;
        in_progress.assigned_to = Some("admin1".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_query_results([[in_progress]])
            .into_connection();
        let service = service(db);

        let result = service
            .set_inquiry_status("i1", &admin(), InquiryStatus::InProgress)
            .await
            .unwrap();

        assert_eq!(result.assigned_to.as_deref(), Some("admin1"));
    }

    #[tokio::test]
    async fn test_closed_inquiry_is_terminal() {
        let closed = mock_inquiry("i1", InquiryStatus::Closed);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[closed]])
            .into_connection();
        let service = service(db);

        let result = service
            .set_inquiry_status("i1", &admin(), InquiryStatus::Pending)
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }
}
