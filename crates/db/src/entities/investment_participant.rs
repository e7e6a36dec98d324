//! Investment participant entity (one member's pledge toward an opportunity).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a participation.
///
/// `Completed` is terminal and requires a recorded returns amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl ParticipationStatus {
    /// Transition table for participation statuses.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Pending, Self::Completed)
                | (Self::Active, Self::Completed)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_participant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub investment_id: String,

    pub user_id: String,

    /// Pledged amount, at least the opportunity's minimum investment
    pub amount: f64,

    pub status: ParticipationStatus,

    pub joined_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeUtc>,

    /// Required when the participation completes
    #[sea_orm(nullable)]
    pub returns_amount: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investment_opportunity::Entity",
        from = "Column::InvestmentId",
        to = "super::investment_opportunity::Column::Id",
        on_delete = "Cascade"
    )]
    Opportunity,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::investment_opportunity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Opportunity.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(ParticipationStatus::Pending.can_transition_to(ParticipationStatus::Active));
        assert!(ParticipationStatus::Pending.can_transition_to(ParticipationStatus::Completed));
        assert!(ParticipationStatus::Active.can_transition_to(ParticipationStatus::Completed));

        assert!(!ParticipationStatus::Active.can_transition_to(ParticipationStatus::Pending));
        assert!(!ParticipationStatus::Completed.can_transition_to(ParticipationStatus::Active));
        assert!(!ParticipationStatus::Completed.can_transition_to(ParticipationStatus::Pending));
    }
}
