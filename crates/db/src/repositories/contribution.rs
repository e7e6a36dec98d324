//! Contribution repository.

use std::sync::Arc;

use crate::entities::{Contribution, User, contribution, user};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    Order, QueryFilter, QueryOrder, Statement,
};

/// Club-wide contribution totals.
///
/// Only `validated` rows count toward committed financial totals;
/// pending and rejected amounts are reported separately or excluded.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ContributionSummary {
    pub total_contributions: i64,
    pub total_amount_validated: f64,
    pub total_amount_pending: f64,
    pub average_contribution: Option<f64>,
}

/// One month of validated contributions.
#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlyContributionSummary {
    /// Month in `YYYY-MM` form.
    pub month: String,
    pub contribution_count: i64,
    pub total_amount: f64,
    pub average_amount: f64,
}

/// Contribution repository for database operations.
#[derive(Clone)]
pub struct ContributionRepository {
    db: Arc<DatabaseConnection>,
}

impl ContributionRepository {
    /// Create a new contribution repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a contribution by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contribution::Model>> {
        Contribution::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a contribution by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<contribution::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contribution: {id}")))
    }

    /// Find a contribution by its transaction reference.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> AppResult<Option<contribution::Model>> {
        Contribution::find()
            .filter(contribution::Column::TransactionReference.eq(reference))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all contributions with their owners, newest first.
    pub async fn find_all_with_users(
        &self,
    ) -> AppResult<Vec<(contribution::Model, Option<user::Model>)>> {
        Contribution::find()
            .find_also_related(User)
            .order_by(contribution::Column::ContributionDate, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's contributions, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<contribution::Model>> {
        Contribution::find()
            .filter(contribution::Column::UserId.eq(user_id))
            .order_by(contribution::Column::ContributionDate, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new contribution.
    pub async fn create(&self, model: contribution::ActiveModel) -> AppResult<contribution::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                AppError::Conflict("Transaction reference already used".to_string())
            } else {
                AppError::Database(msg)
            }
        })
    }

    /// Update a contribution.
    pub async fn update(&self, model: contribution::ActiveModel) -> AppResult<contribution::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Club-wide summary statistics.
    pub async fn summary(&self) -> AppResult<ContributionSummary> {
        let stmt = Statement::from_string(
            DbBackend::Sqlite,
            r"SELECT
                COUNT(*) AS total_contributions,
                COALESCE(SUM(CASE WHEN status = 'validated' THEN amount ELSE 0.0 END), 0.0)
                    AS total_amount_validated,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0.0 END), 0.0)
                    AS total_amount_pending,
                AVG(CASE WHEN status = 'validated' THEN amount END) AS average_contribution
            FROM contribution"
                .to_string(),
        );

        ContributionSummary::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Internal("Summary query returned no row".to_string()))
    }

    /// Monthly grouped summary of validated contributions, newest first.
    pub async fn monthly_summary(&self) -> AppResult<Vec<MonthlyContributionSummary>> {
        let stmt = Statement::from_string(
            DbBackend::Sqlite,
            r"SELECT
                strftime('%Y-%m', contribution_date) AS month,
                COUNT(*) AS contribution_count,
                COALESCE(SUM(amount), 0.0) AS total_amount,
                COALESCE(AVG(amount), 0.0) AS average_amount
            FROM contribution
            WHERE status = 'validated'
            GROUP BY strftime('%Y-%m', contribution_date)
            ORDER BY month DESC"
                .to_string(),
        );

        MonthlyContributionSummary::find_by_statement(stmt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
