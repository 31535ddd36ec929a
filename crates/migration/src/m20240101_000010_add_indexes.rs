use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Jobs: listing filters on status and orders by created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status_created")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .col(Jobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_automations_user")
                    .table(Automations::Table)
                    .col(Automations::UserId)
                    .to_owned(),
            )
            .await?;

        // UserJobs: per-automation daily counts
        manager
            .create_index(
                Index::create()
                    .name("idx_user_jobs_automation_applied")
                    .table(UserJobs::Table)
                    .col(UserJobs::AutomationId)
                    .col(UserJobs::AppliedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_jobs_job")
                    .table(UserJobs::Table)
                    .col(UserJobs::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_jobs_status_created").table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_automations_user").table(Automations::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_jobs_automation_applied").table(UserJobs::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_jobs_job").table(UserJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Jobs { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum Automations { Table, UserId }

#[derive(DeriveIden)]
enum UserJobs { Table, JobId, AutomationId, AppliedAt }
