//! Create `user_jobs` table: the user/job association that tracks an application.
//!
//! One row per (user, job); automation link is nulled when the automation goes away.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserJobs::Table)
                    .if_not_exists()
                    .col(uuid(UserJobs::Id).primary_key())
                    .col(uuid(UserJobs::UserId).not_null())
                    .col(uuid(UserJobs::JobId).not_null())
                    .col(ColumnDef::new(UserJobs::AutomationId).uuid().null())
                    .col(string_len(UserJobs::Status, 32).not_null().default("saved"))
                    .col(
                        ColumnDef::new(UserJobs::AppliedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(UserJobs::Notes).text().null())
                    .col(ColumnDef::new(UserJobs::ResumePath).string_len(512).null())
                    .col(ColumnDef::new(UserJobs::CoverLetterPath).string_len(512).null())
                    .col(timestamp_with_time_zone(UserJobs::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(UserJobs::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_jobs_user")
                            .from(UserJobs::Table, UserJobs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_jobs_job")
                            .from(UserJobs::Table, UserJobs::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_jobs_automation")
                            .from(UserJobs::Table, UserJobs::AutomationId)
                            .to(Automations::Table, Automations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_user_jobs_user_job")
                    .table(UserJobs::Table)
                    .col(UserJobs::UserId)
                    .col(UserJobs::JobId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserJobs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserJobs {
    Table,
    Id,
    UserId,
    JobId,
    AutomationId,
    Status,
    AppliedAt,
    Notes,
    ResumePath,
    CoverLetterPath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Jobs { Table, Id }

#[derive(DeriveIden)]
enum Automations { Table, Id }
