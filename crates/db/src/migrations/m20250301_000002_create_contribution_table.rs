//! Create `contribution` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contribution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contribution::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contribution::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contribution::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Contribution::TransactionReference)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Contribution::PaymentProofUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Contribution::ContributionDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contribution::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Contribution::ValidatedBy).string_len(32))
                    .col(ColumnDef::new(Contribution::ValidationDate).timestamp())
                    .col(ColumnDef::new(Contribution::RejectionReason).text())
                    .col(
                        ColumnDef::new(Contribution::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Contribution::UpdatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contribution_user")
                            .from(Contribution::Table, Contribution::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contribution_validator")
                            .from(Contribution::Table, Contribution::ValidatedBy)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a member's contributions)
        manager
            .create_index(
                Index::create()
                    .name("idx_contribution_user_id")
                    .table(Contribution::Table)
                    .col(Contribution::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: status (pending queue for admins)
        manager
            .create_index(
                Index::create()
                    .name("idx_contribution_status")
                    .table(Contribution::Table)
                    .col(Contribution::Status)
                    .to_owned(),
            )
            .await?;

        // Index: contribution_date (monthly summaries)
        manager
            .create_index(
                Index::create()
                    .name("idx_contribution_date")
                    .table(Contribution::Table)
                    .col(Contribution::ContributionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contribution::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contribution {
    Table,
    Id,
    UserId,
    Amount,
    TransactionReference,
    PaymentProofUrl,
    ContributionDate,
    Status,
    ValidatedBy,
    ValidationDate,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
