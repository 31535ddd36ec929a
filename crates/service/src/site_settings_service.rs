use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use models::site_settings::{self, SINGLETON_ID};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettingsUpdate {
    pub maintenance_mode: Option<bool>,
    pub new_user_registration: Option<bool>,
    pub require_email_verification: Option<bool>,
    pub max_automations_per_user: Option<i32>,
    pub site_name: Option<String>,
    pub support_email: Option<String>,
}

/// The singleton row, inserted with defaults on first read.
pub async fn get_or_create<C: ConnectionTrait>(db: &C) -> Result<site_settings::Model, ServiceError> {
    if let Some(found) = site_settings::Entity::find_by_id(SINGLETON_ID).one(db).await? {
        return Ok(found);
    }
    let created = site_settings::defaults().insert(db).await?;
    info!("site_settings_initialized");
    Ok(created)
}

#[instrument(skip(db, input))]
pub async fn update<C: ConnectionTrait>(db: &C, input: SiteSettingsUpdate) -> Result<site_settings::Model, ServiceError> {
    if let Some(n) = input.max_automations_per_user {
        if n < 1 {
            return Err(ServiceError::Validation("max_automations_per_user must be >= 1".into()));
        }
    }
    if let Some(email) = input.support_email.as_deref() {
        models::user::validate_email(email)?;
    }
    let mut am: site_settings::ActiveModel = get_or_create(db).await?.into();
    if let Some(v) = input.maintenance_mode {
        am.maintenance_mode = Set(v);
    }
    if let Some(v) = input.new_user_registration {
        am.new_user_registration = Set(v);
    }
    if let Some(v) = input.require_email_verification {
        am.require_email_verification = Set(v);
    }
    if let Some(v) = input.max_automations_per_user {
        am.max_automations_per_user = Set(v);
    }
    if let Some(v) = input.site_name {
        am.site_name = Set(v);
    }
    if let Some(v) = input.support_email {
        am.support_email = Set(v);
    }
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    info!(max_automations = saved.max_automations_per_user, "site_settings_updated");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn singleton_is_created_and_updated() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let first = get_or_create(&db).await?;
        let again = get_or_create(&db).await?;
        assert_eq!(first.id, again.id);

        let bad = update(&db, SiteSettingsUpdate { max_automations_per_user: Some(0), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        let saved = update(&db, SiteSettingsUpdate { site_name: Some(first.site_name.clone()), ..Default::default() }).await?;
        assert_eq!(saved.max_automations_per_user, first.max_automations_per_user);
        Ok(())
    }
}
