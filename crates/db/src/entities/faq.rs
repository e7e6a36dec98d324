//! FAQ entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// FAQ grouping shown on the public help page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum FaqCategory {
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "contributions")]
    Contributions,
    #[sea_orm(string_value = "investments")]
    Investments,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faq")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub question: String,

    #[sea_orm(column_type = "Text")]
    pub answer: String,

    pub category: FaqCategory,

    /// Only published FAQs are visible to members
    pub is_published: bool,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
