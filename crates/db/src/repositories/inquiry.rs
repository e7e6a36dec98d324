//! Inquiry repository (inquiries and their responses).

use std::sync::Arc;

use crate::entities::{Inquiry, InquiryResponse, inquiry, inquiry_response};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

/// Inquiry repository for database operations.
#[derive(Clone)]
pub struct InquiryRepository {
    db: Arc<DatabaseConnection>,
}

impl InquiryRepository {
    /// Create a new inquiry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an inquiry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<inquiry::Model>> {
        Inquiry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an inquiry by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<inquiry::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inquiry: {id}")))
    }

    /// List all inquiries, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<inquiry::Model>> {
        Inquiry::find()
            .order_by(inquiry::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's inquiries, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<inquiry::Model>> {
        Inquiry::find()
            .filter(inquiry::Column::UserId.eq(user_id))
            .order_by(inquiry::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new inquiry.
    pub async fn create(&self, model: inquiry::ActiveModel) -> AppResult<inquiry::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an inquiry.
    pub async fn update(&self, model: inquiry::ActiveModel) -> AppResult<inquiry::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List responses to an inquiry, oldest first.
    pub async fn find_responses(
        &self,
        inquiry_id: &str,
    ) -> AppResult<Vec<inquiry_response::Model>> {
        InquiryResponse::find()
            .filter(inquiry_response::Column::InquiryId.eq(inquiry_id))
            .order_by(inquiry_response::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Append a response to an inquiry.
    pub async fn create_response(
        &self,
        model: inquiry_response::ActiveModel,
    ) -> AppResult<inquiry_response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
