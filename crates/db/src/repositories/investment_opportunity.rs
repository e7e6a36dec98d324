//! Investment opportunity repository.

use std::sync::Arc;

use crate::entities::{InvestmentOpportunity, investment_opportunity};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Order, QueryOrder,
};

/// Investment opportunity repository for database operations.
#[derive(Clone)]
pub struct InvestmentOpportunityRepository {
    db: Arc<DatabaseConnection>,
}

impl InvestmentOpportunityRepository {
    /// Create a new investment opportunity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an opportunity by ID.
    pub async fn find_by_id(
        &self,
        id: &str,
    ) -> AppResult<Option<investment_opportunity::Model>> {
        InvestmentOpportunity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an opportunity by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<investment_opportunity::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Investment opportunity: {id}")))
    }

    /// List all opportunities, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<investment_opportunity::Model>> {
        InvestmentOpportunity::find()
            .order_by(investment_opportunity::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new opportunity.
    pub async fn create(
        &self,
        model: investment_opportunity::ActiveModel,
    ) -> AppResult<investment_opportunity::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an opportunity.
    pub async fn update(
        &self,
        model: investment_opportunity::ActiveModel,
    ) -> AppResult<investment_opportunity::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an opportunity (participants and updates cascade).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let opportunity = self.get_by_id(id).await?;
        opportunity
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
