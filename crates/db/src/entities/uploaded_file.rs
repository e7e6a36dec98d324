//! Uploaded file entity (metadata for blobs held in object storage).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Functional category of an uploaded file, determining its validation
/// policy (allowed MIME types and size ceiling).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum UploadPurpose {
    /// Profile picture.
    #[sea_orm(string_value = "profile")]
    Profile,
    /// Proof-of-payment for a contribution.
    #[sea_orm(string_value = "contribution")]
    Contribution,
    /// General club document.
    #[sea_orm(string_value = "document")]
    Document,
}

impl UploadPurpose {
    /// Parse a purpose from its wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "profile" => Some(Self::Profile),
            "contribution" => Some(Self::Contribution),
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// Created exactly once per successful upload. The row must never
/// reference a URL absent from the blob store, so deletion removes the
/// blob first and only then this row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "uploaded_file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Public URL in the blob store
    pub url: String,

    /// Original file name
    pub filename: String,

    /// File size in bytes
    pub size: i64,

    /// MIME type
    pub content_type: String,

    pub purpose: UploadPurpose,

    /// Owner user ID
    pub user_id: String,

    /// Blob store key
    pub storage_key: String,

    /// MD5 hash of the content
    pub md5: String,

    pub created_at: DateTimeUtc,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
