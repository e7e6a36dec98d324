//! Create `uploaded_file` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadedFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadedFile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UploadedFile::Url)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadedFile::Filename)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UploadedFile::Size).big_integer().not_null())
                    .col(
                        ColumnDef::new(UploadedFile::ContentType)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadedFile::Purpose)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadedFile::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadedFile::StorageKey)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UploadedFile::Md5).string_len(32).not_null())
                    .col(
                        ColumnDef::new(UploadedFile::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_uploaded_file_user")
                            .from(UploadedFile::Table, UploadedFile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a member's files)
        manager
            .create_index(
                Index::create()
                    .name("idx_uploaded_file_user_id")
                    .table(UploadedFile::Table)
                    .col(UploadedFile::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: md5 (duplicate detection)
        manager
            .create_index(
                Index::create()
                    .name("idx_uploaded_file_md5")
                    .table(UploadedFile::Table)
                    .col(UploadedFile::Md5)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadedFile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UploadedFile {
    Table,
    Id,
    Url,
    Filename,
    Size,
    ContentType,
    Purpose,
    UserId,
    StorageKey,
    Md5,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
