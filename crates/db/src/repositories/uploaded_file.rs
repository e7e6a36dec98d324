//! Uploaded file repository.

use std::sync::Arc;

use crate::entities::{UploadedFile, uploaded_file};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, Order, QueryFilter,
    QueryOrder,
};

/// Uploaded file metadata repository.
#[derive(Clone)]
pub struct UploadedFileRepository {
    db: Arc<DatabaseConnection>,
}

impl UploadedFileRepository {
    /// Create a new uploaded file repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a file record by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<uploaded_file::Model>> {
        UploadedFile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a file record by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<uploaded_file::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File: {id}")))
    }

    /// List a user's file records, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<uploaded_file::Model>> {
        UploadedFile::find()
            .filter(uploaded_file::Column::UserId.eq(user_id))
            .order_by(uploaded_file::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new file record.
    pub async fn create(
        &self,
        model: uploaded_file::ActiveModel,
    ) -> AppResult<uploaded_file::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a file record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let file = self.find_by_id(id).await?;
        if let Some(f) = file {
            f.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
