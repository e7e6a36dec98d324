//! Create support tables migration (inquiries, responses, FAQs).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inquiry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inquiry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inquiry::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Inquiry::Subject).string_len(256).not_null())
                    .col(ColumnDef::new(Inquiry::Message).text().not_null())
                    .col(
                        ColumnDef::new(Inquiry::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Inquiry::Priority)
                            .string_len(16)
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Inquiry::AssignedTo).string_len(32))
                    .col(
                        ColumnDef::new(Inquiry::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Inquiry::UpdatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_user")
                            .from(Inquiry::Table, Inquiry::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_assignee")
                            .from(Inquiry::Table, Inquiry::AssignedTo)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InquiryResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InquiryResponse::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InquiryResponse::InquiryId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InquiryResponse::ResponderId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InquiryResponse::Message).text().not_null())
                    .col(
                        ColumnDef::new(InquiryResponse::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_response_inquiry")
                            .from(InquiryResponse::Table, InquiryResponse::InquiryId)
                            .to(Inquiry::Table, Inquiry::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inquiry_response_responder")
                            .from(InquiryResponse::Table, InquiryResponse::ResponderId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Faq::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Faq::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Faq::Question).string_len(512).not_null())
                    .col(ColumnDef::new(Faq::Answer).text().not_null())
                    .col(ColumnDef::new(Faq::Category).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Faq::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Faq::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Faq::UpdatedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        // Index: user_id (a member's inquiries)
        manager
            .create_index(
                Index::create()
                    .name("idx_inquiry_user")
                    .table(Inquiry::Table)
                    .col(Inquiry::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (admin queue)
        manager
            .create_index(
                Index::create()
                    .name("idx_inquiry_status")
                    .table(Inquiry::Table)
                    .col(Inquiry::Status)
                    .to_owned(),
            )
            .await?;

        // Index: inquiry_id (response threads)
        manager
            .create_index(
                Index::create()
                    .name("idx_inquiry_response")
                    .table(InquiryResponse::Table)
                    .col(InquiryResponse::InquiryId)
                    .to_owned(),
            )
            .await?;

        // Index: category + published (public FAQ listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_faq_category")
                    .table(Faq::Table)
                    .col(Faq::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_faq_published")
                    .table(Faq::Table)
                    .col(Faq::IsPublished)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InquiryResponse::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inquiry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Faq::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Inquiry {
    Table,
    Id,
    UserId,
    Subject,
    Message,
    Status,
    Priority,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InquiryResponse {
    Table,
    Id,
    InquiryId,
    ResponderId,
    Message,
    CreatedAt,
}

#[derive(Iden)]
enum Faq {
    Table,
    Id,
    Question,
    Answer,
    Category,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
