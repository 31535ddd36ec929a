//! Create `users` table.
//!
//! Account rows; password hash lives here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len(Users::HashedPassword, 255).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255).null())
                    .col(ColumnDef::new(Users::Username).string_len(64).unique_key().null())
                    .col(boolean(Users::EmailVerified).not_null().default(false))
                    .col(
                        ColumnDef::new(Users::PasswordChangedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(boolean(Users::TwoFactorEnabled).not_null().default(false))
                    .col(boolean(Users::IsActive).not_null().default(true))
                    .col(boolean(Users::IsSuperuser).not_null().default(false))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Users::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    HashedPassword,
    FullName,
    Username,
    EmailVerified,
    PasswordChangedAt,
    TwoFactorEnabled,
    IsActive,
    IsSuperuser,
    CreatedAt,
    UpdatedAt,
}
