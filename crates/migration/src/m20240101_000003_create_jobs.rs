//! Create `jobs` table.
//!
//! Postings go through moderation; `status` starts as `pending`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(uuid(Jobs::Id).primary_key())
                    .col(string_len(Jobs::Title, 255).not_null())
                    .col(string_len(Jobs::Company, 255).not_null())
                    .col(ColumnDef::new(Jobs::Location).string_len(255).null())
                    .col(ColumnDef::new(Jobs::Description).text().null())
                    .col(ColumnDef::new(Jobs::JobUrl).string_len(1024).null())
                    .col(ColumnDef::new(Jobs::SalaryRange).string_len(128).null())
                    .col(ColumnDef::new(Jobs::JobType).string_len(64).null())
                    .col(ColumnDef::new(Jobs::Source).string_len(64).null())
                    .col(ColumnDef::new(Jobs::ExternalId).string_len(255).null())
                    .col(string_len(Jobs::Status, 32).not_null().default("pending"))
                    .col(timestamp_with_time_zone(Jobs::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Jobs::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Jobs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Title,
    Company,
    Location,
    Description,
    JobUrl,
    SalaryRange,
    JobType,
    Source,
    ExternalId,
    Status,
    CreatedAt,
    UpdatedAt,
}
