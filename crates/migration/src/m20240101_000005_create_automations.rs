//! Create `automations` table with FK to `users`.
//!
//! `platforms` is a JSON array of board names.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Automations::Table)
                    .if_not_exists()
                    .col(uuid(Automations::Id).primary_key())
                    .col(uuid(Automations::UserId).not_null())
                    .col(string_len(Automations::Name, 255).not_null())
                    .col(ColumnDef::new(Automations::TargetTitles).text().null())
                    .col(ColumnDef::new(Automations::Locations).text().null())
                    .col(integer(Automations::DailyLimit).not_null().default(25))
                    .col(json_binary(Automations::Platforms).not_null())
                    .col(ColumnDef::new(Automations::CoverLetterTemplate).text().null())
                    .col(string_len(Automations::Status, 32).not_null().default("paused"))
                    .col(integer(Automations::TotalApplied).not_null().default(0))
                    .col(timestamp_with_time_zone(Automations::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Automations::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_automations_user")
                            .from(Automations::Table, Automations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Automations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Automations {
    Table,
    Id,
    UserId,
    Name,
    TargetTitles,
    Locations,
    DailyLimit,
    Platforms,
    CoverLetterTemplate,
    Status,
    TotalApplied,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
