//! Migrator registering table migrations in foreign-key order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_profiles;
mod m20240101_000003_create_jobs;
mod m20240101_000004_create_user_setups;
mod m20240101_000005_create_automations;
mod m20240101_000006_create_user_jobs;
mod m20240101_000007_create_site_settings;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_profiles::Migration),
            Box::new(m20240101_000003_create_jobs::Migration),
            Box::new(m20240101_000004_create_user_setups::Migration),
            Box::new(m20240101_000005_create_automations::Migration),
            Box::new(m20240101_000006_create_user_jobs::Migration),
            Box::new(m20240101_000007_create_site_settings::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
