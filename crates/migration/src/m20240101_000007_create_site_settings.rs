//! Create `site_settings` singleton table (row id = 1).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SiteSettings::Table)
                    .if_not_exists()
                    .col(integer(SiteSettings::Id).primary_key())
                    .col(boolean(SiteSettings::MaintenanceMode).not_null().default(false))
                    .col(boolean(SiteSettings::NewUserRegistration).not_null().default(true))
                    .col(boolean(SiteSettings::RequireEmailVerification).not_null().default(false))
                    .col(integer(SiteSettings::MaxAutomationsPerUser).not_null().default(10))
                    .col(string_len(SiteSettings::SiteName, 255).not_null())
                    .col(string_len(SiteSettings::SupportEmail, 255).not_null())
                    .col(timestamp_with_time_zone(SiteSettings::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SiteSettings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SiteSettings {
    Table,
    Id,
    MaintenanceMode,
    NewUserRegistration,
    RequireEmailVerification,
    MaxAutomationsPerUser,
    SiteName,
    SupportEmail,
    UpdatedAt,
}
