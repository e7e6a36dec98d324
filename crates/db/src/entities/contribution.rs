//! Contribution entity (monthly member payments with proof).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a contribution.
///
/// `Validated` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    /// Awaiting admin review.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Reconciled against the uploaded payment proof.
    #[sea_orm(string_value = "validated")]
    Validated,
    /// Rejected with a mandatory reason.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ContributionStatus {
    /// Transition table: only `pending -> validated` and
    /// `pending -> rejected` are legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Validated) | (Self::Pending, Self::Rejected)
        )
    }

    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Validated | Self::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contribution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    pub user_id: String,

    /// Amount in naira
    pub amount: f64,

    #[sea_orm(unique)]
    pub transaction_reference: String,

    /// URL of the uploaded payment proof
    #[sea_orm(nullable)]
    pub payment_proof_url: Option<String>,

    pub contribution_date: Date,

    pub status: ContributionStatus,

    /// Admin who validated or rejected this contribution
    #[sea_orm(nullable)]
    pub validated_by: Option<String>,

    #[sea_orm(nullable)]
    pub validation_date: Option<DateTimeUtc>,

    /// Required iff status is `rejected`
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

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
    Owner,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ValidatedBy",
        to = "super::user::Column::Id"
    )]
    Validator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
