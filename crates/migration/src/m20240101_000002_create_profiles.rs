//! Create `profiles` table, one row per user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(uuid(Profiles::Id).primary_key())
                    .col(uuid(Profiles::UserId).unique_key().not_null())
                    .col(ColumnDef::new(Profiles::FirstName).string_len(128).null())
                    .col(ColumnDef::new(Profiles::LastName).string_len(128).null())
                    .col(ColumnDef::new(Profiles::Phone).string_len(64).null())
                    .col(ColumnDef::new(Profiles::Address).text().null())
                    .col(ColumnDef::new(Profiles::ResumePath).string_len(512).null())
                    .col(ColumnDef::new(Profiles::CoverLetterPath).string_len(512).null())
                    .col(ColumnDef::new(Profiles::LinkedinUrl).string_len(512).null())
                    .col(ColumnDef::new(Profiles::GithubUrl).string_len(512).null())
                    .col(ColumnDef::new(Profiles::PortfolioUrl).string_len(512).null())
                    .col(ColumnDef::new(Profiles::Bio).text().null())
                    .col(ColumnDef::new(Profiles::Headline).string_len(255).null())
                    .col(ColumnDef::new(Profiles::PrimaryLocation).string_len(255).null())
                    .col(ColumnDef::new(Profiles::YearsExperience).string_len(32).null())
                    .col(ColumnDef::new(Profiles::CompensationCurrency).string_len(16).null())
                    .col(ColumnDef::new(Profiles::TopSkills).text().null())
                    .col(ColumnDef::new(Profiles::CoverLetterTone).string_len(64).null())
                    .col(ColumnDef::new(Profiles::MatchingPreferences).text().null())
                    .col(timestamp_with_time_zone(Profiles::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Profiles::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Profiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Phone,
    Address,
    ResumePath,
    CoverLetterPath,
    LinkedinUrl,
    GithubUrl,
    PortfolioUrl,
    Bio,
    Headline,
    PrimaryLocation,
    YearsExperience,
    CompensationCurrency,
    TopSkills,
    CoverLetterTone,
    MatchingPreferences,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
