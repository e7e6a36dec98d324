//! Create investment tables migration (opportunities, participants, updates).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestmentOpportunity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentOpportunity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::Title)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::TargetAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::MinimumInvestment)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::ExpectedReturns)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::Duration)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::RiskLevel)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(InvestmentOpportunity::StartDate).date())
                    .col(ColumnDef::new(InvestmentOpportunity::EndDate).date())
                    .col(
                        ColumnDef::new(InvestmentOpportunity::CreatedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentOpportunity::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(InvestmentOpportunity::UpdatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_opportunity_creator")
                            .from(
                                InvestmentOpportunity::Table,
                                InvestmentOpportunity::CreatedBy,
                            )
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvestmentParticipant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentParticipant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestmentParticipant::InvestmentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentParticipant::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentParticipant::Amount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentParticipant::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(InvestmentParticipant::JoinedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(InvestmentParticipant::CompletedAt).timestamp())
                    .col(ColumnDef::new(InvestmentParticipant::ReturnsAmount).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_participant_opportunity")
                            .from(
                                InvestmentParticipant::Table,
                                InvestmentParticipant::InvestmentId,
                            )
                            .to(InvestmentOpportunity::Table, InvestmentOpportunity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_participant_user")
                            .from(
                                InvestmentParticipant::Table,
                                InvestmentParticipant::UserId,
                            )
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvestmentUpdate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentUpdate::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::InvestmentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::Title)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::UpdateType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::CreatedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentUpdate::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_update_opportunity")
                            .from(InvestmentUpdate::Table, InvestmentUpdate::InvestmentId)
                            .to(InvestmentOpportunity::Table, InvestmentOpportunity::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_update_creator")
                            .from(InvestmentUpdate::Table, InvestmentUpdate::CreatedBy)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (open opportunity listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_investment_opportunity_status")
                    .table(InvestmentOpportunity::Table)
                    .col(InvestmentOpportunity::Status)
                    .to_owned(),
            )
            .await?;

        // Index: risk_level (filtered browsing)
        manager
            .create_index(
                Index::create()
                    .name("idx_investment_opportunity_risk")
                    .table(InvestmentOpportunity::Table)
                    .col(InvestmentOpportunity::RiskLevel)
                    .to_owned(),
            )
            .await?;

        // Index: (investment_id, user_id) for committed-total sums and
        // per-member lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_investment_participant")
                    .table(InvestmentParticipant::Table)
                    .col(InvestmentParticipant::InvestmentId)
                    .col(InvestmentParticipant::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: investment_id (update timelines)
        manager
            .create_index(
                Index::create()
                    .name("idx_investment_update")
                    .table(InvestmentUpdate::Table)
                    .col(InvestmentUpdate::InvestmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentUpdate::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvestmentParticipant::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvestmentOpportunity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum InvestmentOpportunity {
    Table,
    Id,
    Title,
    Description,
    TargetAmount,
    MinimumInvestment,
    ExpectedReturns,
    Duration,
    RiskLevel,
    Status,
    StartDate,
    EndDate,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum InvestmentParticipant {
    Table,
    Id,
    InvestmentId,
    UserId,
    Amount,
    Status,
    JoinedAt,
    CompletedAt,
    ReturnsAmount,
}

#[derive(Iden)]
enum InvestmentUpdate {
    Table,
    Id,
    InvestmentId,
    Title,
    Description,
    UpdateType,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
