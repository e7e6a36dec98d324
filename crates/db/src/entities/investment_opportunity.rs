//! Investment opportunity entity (admin-defined pooled investment offers).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Risk classification shown to members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

/// Lifecycle status of an opportunity.
///
/// Participation is only accepted while `Open`. The `Draft -> Open`
/// transition additionally requires both start and end dates to be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl OpportunityStatus {
    /// Transition table for opportunity statuses.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Open)
                | (Self::Open, Self::Closed)
                | (Self::Open, Self::Completed)
                | (Self::Closed, Self::Completed)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_opportunity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Funding ceiling: participant amounts may never sum past this
    pub target_amount: f64,

    /// Floor for a single participation, at most `target_amount`
    pub minimum_investment: f64,

    /// Expected returns in percent (0-100)
    pub expected_returns: f64,

    /// Duration in months (1-120)
    pub duration: i32,

    pub risk_level: RiskLevel,

    pub status: OpportunityStatus,

    #[sea_orm(nullable)]
    pub start_date: Option<Date>,

    #[sea_orm(nullable)]
    pub end_date: Option<Date>,

    /// Admin who created this opportunity
    pub created_by: String,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::investment_participant::Entity")]
    Participants,

    #[sea_orm(has_many = "super::investment_update::Entity")]
    Updates,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::investment_participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::investment_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Updates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(OpportunityStatus::Draft.can_transition_to(OpportunityStatus::Open));
        assert!(OpportunityStatus::Open.can_transition_to(OpportunityStatus::Closed));
        assert!(OpportunityStatus::Open.can_transition_to(OpportunityStatus::Completed));
        assert!(OpportunityStatus::Closed.can_transition_to(OpportunityStatus::Completed));

        assert!(!OpportunityStatus::Draft.can_transition_to(OpportunityStatus::Closed));
        assert!(!OpportunityStatus::Completed.can_transition_to(OpportunityStatus::Open));
        assert!(!OpportunityStatus::Closed.can_transition_to(OpportunityStatus::Open));
    }
}
