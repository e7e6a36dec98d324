//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    Order, QueryFilter, QueryOrder, Statement,
};

/// Per-member aggregate figures shown on the profile page.
///
/// Only `validated` contributions count toward the committed total.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserStats {
    pub total_contributions: i64,
    pub total_contribution_amount: f64,
    pub total_investments: i64,
    pub total_investment_amount: f64,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User: {id}")))
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by email, excluding a given user ID (for update checks).
    pub async fn find_by_email_excluding(
        &self,
        email: &str,
        excluded_id: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::Id.ne(excluded_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all users, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<user::Model>> {
        User::find()
            .order_by(user::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(msg)
            }
        })
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Compute aggregate statistics for a user.
    pub async fn stats(&self, user_id: &str) -> AppResult<UserStats> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            r"SELECT
                (SELECT COUNT(*) FROM contribution WHERE user_id = ?) AS total_contributions,
                (SELECT COALESCE(SUM(amount), 0.0) FROM contribution
                    WHERE user_id = ? AND status = 'validated') AS total_contribution_amount,
                (SELECT COUNT(DISTINCT investment_id) FROM investment_participant
                    WHERE user_id = ?) AS total_investments,
                (SELECT COALESCE(SUM(amount), 0.0) FROM investment_participant
                    WHERE user_id = ?) AS total_investment_amount",
            [
                user_id.into(),
                user_id.into(),
                user_id.into(),
                user_id.into(),
            ],
        );

        UserStats::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Internal("Stats query returned no row".to_string()))
    }
}
