//! Investment participant repository.

use std::sync::Arc;

use crate::entities::{
    InvestmentOpportunity, InvestmentParticipant, User, investment_opportunity,
    investment_participant, user,
};
use ajoclub_common::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    FromQueryResult, Order, QueryFilter, QueryOrder, Statement,
};

/// Funding metrics for one opportunity.
#[derive(Debug, Clone, FromQueryResult)]
pub struct PerformanceRow {
    pub participant_count: i64,
    pub total_invested: f64,
    pub min_investment: Option<f64>,
    pub max_investment: Option<f64>,
    pub avg_investment: Option<f64>,
    pub target_amount: f64,
    pub funding_percentage: f64,
}

/// Investment participant repository for database operations.
#[derive(Clone)]
pub struct InvestmentParticipantRepository {
    db: Arc<DatabaseConnection>,
}

impl InvestmentParticipantRepository {
    /// Create a new investment participant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a participation by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<investment_participant::Model>> {
        InvestmentParticipant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a participation by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<investment_participant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participation: {id}")))
    }

    /// Insert a pending participation only if the opportunity's committed
    /// total plus `amount` stays within its target amount.
    ///
    /// The sum is recomputed inside the insert itself, so two concurrent
    /// calls can never jointly overcommit the target: `SQLite` serializes
    /// the writes and the later one sees the earlier row. Returns `false`
    /// when the guard rejected the insert (zero rows affected).
    pub async fn insert_if_within_target(
        &self,
        id: &str,
        investment_id: &str,
        user_id: &str,
        amount: f64,
        joined_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            r"INSERT INTO investment_participant
                (id, investment_id, user_id, amount, status, joined_at)
            SELECT ?, ?, ?, ?, 'pending', ?
            WHERE (SELECT COALESCE(SUM(amount), 0.0) FROM investment_participant
                    WHERE investment_id = ?) + ?
                <= (SELECT target_amount FROM investment_opportunity WHERE id = ?)",
            [
                id.into(),
                investment_id.into(),
                user_id.into(),
                amount.into(),
                joined_at.into(),
                investment_id.into(),
                amount.into(),
                investment_id.into(),
            ],
        );

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Sum of all participant amounts for an opportunity.
    pub async fn committed_total(&self, investment_id: &str) -> AppResult<f64> {
        #[derive(FromQueryResult)]
        struct SumRow {
            total: f64,
        }

        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT COALESCE(SUM(amount), 0.0) AS total FROM investment_participant \
             WHERE investment_id = ?",
            [investment_id.into()],
        );

        let row = SumRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0.0, |r| r.total))
    }

    /// List participants of an opportunity with their user rows, newest first.
    pub async fn find_by_investment_with_users(
        &self,
        investment_id: &str,
    ) -> AppResult<Vec<(investment_participant::Model, Option<user::Model>)>> {
        InvestmentParticipant::find()
            .filter(investment_participant::Column::InvestmentId.eq(investment_id))
            .find_also_related(User)
            .order_by(investment_participant::Column::JoinedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's participations with their opportunities, newest first.
    pub async fn find_by_user_with_opportunities(
        &self,
        user_id: &str,
    ) -> AppResult<
        Vec<(
            investment_participant::Model,
            Option<investment_opportunity::Model>,
        )>,
    > {
        InvestmentParticipant::find()
            .filter(investment_participant::Column::UserId.eq(user_id))
            .find_also_related(InvestmentOpportunity)
            .order_by(investment_participant::Column::JoinedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a participation.
    pub async fn update(
        &self,
        model: investment_participant::ActiveModel,
    ) -> AppResult<investment_participant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Funding metrics for an opportunity, or `None` when it does not exist.
    ///
    /// An opportunity with zero participants yields a row with zero totals.
    pub async fn performance(&self, investment_id: &str) -> AppResult<Option<PerformanceRow>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Sqlite,
            r"SELECT
                COUNT(ip.id) AS participant_count,
                COALESCE(SUM(ip.amount), 0.0) AS total_invested,
                MIN(ip.amount) AS min_investment,
                MAX(ip.amount) AS max_investment,
                AVG(ip.amount) AS avg_investment,
                io.target_amount AS target_amount,
                COALESCE(ROUND(SUM(ip.amount) * 100.0 / io.target_amount, 2), 0.0)
                    AS funding_percentage
            FROM investment_opportunity io
            LEFT JOIN investment_participant ip ON ip.investment_id = io.id
            WHERE io.id = ?
            GROUP BY io.id",
            [investment_id.into()],
        );

        PerformanceRow::find_by_statement(stmt)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
