//! Create `user_setups` table holding onboarding state.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSetups::Table)
                    .if_not_exists()
                    .col(uuid(UserSetups::Id).primary_key())
                    .col(uuid(UserSetups::UserId).unique_key().not_null())
                    .col(ColumnDef::new(UserSetups::FullName).string_len(255).null())
                    .col(ColumnDef::new(UserSetups::Email).string_len(255).null())
                    .col(ColumnDef::new(UserSetups::Phone).string_len(64).null())
                    .col(ColumnDef::new(UserSetups::Location).string_len(255).null())
                    .col(ColumnDef::new(UserSetups::LinkedinUrl).string_len(512).null())
                    .col(ColumnDef::new(UserSetups::YearsExperience).string_len(32).null())
                    .col(ColumnDef::new(UserSetups::TopSkills).text().null())
                    .col(ColumnDef::new(UserSetups::ResumeFileName).string_len(255).null())
                    .col(ColumnDef::new(UserSetups::ResumeFilePath).string_len(1024).null())
                    .col(boolean(UserSetups::SetupComplete).not_null().default(false))
                    .col(timestamp_with_time_zone(UserSetups::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(UserSetups::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_setups_user")
                            .from(UserSetups::Table, UserSetups::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserSetups::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserSetups {
    Table,
    Id,
    UserId,
    FullName,
    Email,
    Phone,
    Location,
    LinkedinUrl,
    YearsExperience,
    TopSkills,
    ResumeFileName,
    ResumeFilePath,
    SetupComplete,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
