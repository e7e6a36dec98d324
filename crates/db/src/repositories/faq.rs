//! FAQ repository.

use std::sync::Arc;

use crate::entities::{Faq, faq};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

/// FAQ repository for database operations.
#[derive(Clone)]
pub struct FaqRepository {
    db: Arc<DatabaseConnection>,
}

impl FaqRepository {
    /// Create a new FAQ repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a FAQ by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<faq::Model>> {
        Faq::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a FAQ by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<faq::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("FAQ: {id}")))
    }

    /// List published FAQs, optionally filtered by category.
    pub async fn find_published(
        &self,
        category: Option<faq::FaqCategory>,
    ) -> AppResult<Vec<faq::Model>> {
        let mut query = Faq::find().filter(faq::Column::IsPublished.eq(true));

        if let Some(cat) = category {
            query = query.filter(faq::Column::Category.eq(cat));
        }

        query
            .order_by(faq::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all FAQs (for admin), including unpublished.
    pub async fn find_all(&self) -> AppResult<Vec<faq::Model>> {
        Faq::find()
            .order_by(faq::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new FAQ.
    pub async fn create(&self, model: faq::ActiveModel) -> AppResult<faq::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a FAQ.
    pub async fn update(&self, model: faq::ActiveModel) -> AppResult<faq::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
