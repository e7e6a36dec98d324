//! Inquiry entity (member support tickets).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an inquiry. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl InquiryStatus {
    /// Transition table for inquiry statuses.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Resolved)
                | (Self::InProgress, Self::Resolved)
                | (Self::InProgress, Self::Closed)
                | (Self::Resolved, Self::Closed)
        )
    }
}

/// Priority assigned by the submitting member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum InquiryPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inquiry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Submitting member
    pub user_id: String,

    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub message: String,

    pub status: InquiryStatus,

    pub priority: InquiryPriority,

    /// Admin handling this inquiry
    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "super::inquiry_response::Entity")]
    Responses,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::inquiry_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(InquiryStatus::Pending.can_transition_to(InquiryStatus::InProgress));
        assert!(InquiryStatus::Pending.can_transition_to(InquiryStatus::Resolved));
        assert!(InquiryStatus::InProgress.can_transition_to(InquiryStatus::Closed));
        assert!(InquiryStatus::Resolved.can_transition_to(InquiryStatus::Closed));

        assert!(!InquiryStatus::Closed.can_transition_to(InquiryStatus::Pending));
        assert!(!InquiryStatus::Closed.can_transition_to(InquiryStatus::InProgress));
        assert!(!InquiryStatus::Resolved.can_transition_to(InquiryStatus::Pending));
    }
}
