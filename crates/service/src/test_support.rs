#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DATABASE_URL};
use uuid::Uuid;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_db_config() -> configs::DatabaseConfig {
    configs::DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 10,
        min_connections: 1,
        acquire_timeout_secs: 10,
        connect_timeout_secs: 5,
        ..Default::default()
    }
}

/// Migrated connection, or `None` when `SKIP_DB_TESTS` is set or the database is unreachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let db = match connect_with_config(&test_db_config()).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {e}");
                    return false;
                }
            };
            match migration::Migrator::up(&db, None).await {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skip: migrate up failed: {e}");
                    false
                }
            }
        })
        .await;
    if !migrated {
        return None;
    }
    // fresh connection for the current test's runtime
    connect_with_config(&test_db_config()).await.ok()
}

/// Insert a throwaway user with a unique email.
pub async fn make_user(db: &DatabaseConnection, full_name: Option<&str>) -> anyhow::Result<models::user::Model> {
    let email = format!("svc_{}@example.com", Uuid::new_v4());
    let hash = crate::auth::password::hash_password("12345678")?;
    Ok(models::user::create(db, &email, &hash, full_name.map(str::to_string)).await?)
}

/// Insert an approved job with the given title and location.
pub async fn make_job(db: &DatabaseConnection, title: &str, location: &str) -> anyhow::Result<models::job::Model> {
    Ok(models::job::create(
        db,
        models::job::NewJob {
            title: title.to_string(),
            company: format!("Co {}", Uuid::new_v4()),
            location: Some(location.to_string()),
            description: Some(format!("{title} role")),
            status: Some(models::job::JobStatus::Approved),
            ..Default::default()
        },
    )
    .await?)
}
