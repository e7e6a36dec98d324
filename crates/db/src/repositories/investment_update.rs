//! Investment update repository.

use std::sync::Arc;

use crate::entities::{InvestmentUpdate, User, investment_update, user};
use ajoclub_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
};

/// Investment update repository. The log is append-only: there is no
/// update or delete here on purpose.
#[derive(Clone)]
pub struct InvestmentUpdateRepository {
    db: Arc<DatabaseConnection>,
}

impl InvestmentUpdateRepository {
    /// Create a new investment update repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a new update.
    pub async fn create(
        &self,
        model: investment_update::ActiveModel,
    ) -> AppResult<investment_update::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List updates for an opportunity with their authors, newest first.
    pub async fn find_by_investment_with_creators(
        &self,
        investment_id: &str,
    ) -> AppResult<Vec<(investment_update::Model, Option<user::Model>)>> {
        InvestmentUpdate::find()
            .filter(investment_update::Column::InvestmentId.eq(investment_id))
            .find_also_related(User)
            .order_by(investment_update::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
