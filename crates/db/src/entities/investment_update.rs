//! Investment update entity (append-only progress log for an opportunity).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of update being posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    #[sea_orm(string_value = "progress")]
    Progress,
    #[sea_orm(string_value = "returns")]
    Returns,
    #[sea_orm(string_value = "completion")]
    Completion,
}

/// Append-only: rows are never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_update")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub investment_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub update_type: UpdateType,

    /// Admin who posted this update
    pub created_by: String,

    pub created_at: DateTimeUtc,
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
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::investment_opportunity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Opportunity.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
