use uuid::Uuid;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::user;
use crate::auth::password::{hash_password, verify_password};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub display_name: String,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    pub password_last_changed: Option<String>,
    pub two_factor_enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    pub display_name: Option<String>,
    pub username: Option<String>,
}

/// Coarse "n days ago" rendering of the last password change.
pub fn format_password_changed(at: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> Option<String> {
    let days = (now - at?.with_timezone(&Utc)).num_days();
    Some(match days {
        d if d < 1 => "Today".to_string(),
        1 => "1 day ago".to_string(),
        d if d < 30 => format!("{d} days ago"),
        d if d < 60 => "1 month ago".to_string(),
        d if d < 365 => format!("{} months ago", d / 30),
        d => format!("{} year(s) ago", d / 365),
    })
}

pub fn view(u: &user::Model) -> SettingsView {
    SettingsView {
        display_name: u.full_name.clone().unwrap_or_default(),
        username: u.username.clone().unwrap_or_default(),
        email: u.email.clone(),
        email_verified: u.email_verified,
        password_last_changed: format_password_changed(u.password_changed_at, Utc::now()),
        two_factor_enabled: u.two_factor_enabled,
    }
}

async fn load(db: &DatabaseConnection, user_id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

async fn save(db: &DatabaseConnection, mut am: user::ActiveModel) -> Result<user::Model, ServiceError> {
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, user_id: Uuid) -> Result<SettingsView, ServiceError> {
    Ok(view(&load(db, user_id).await?))
}

/// Blank display name or username clears the field; usernames are stored lowercased.
#[instrument(skip(db, input))]
pub async fn update_account(db: &DatabaseConnection, user_id: Uuid, input: AccountUpdate) -> Result<SettingsView, ServiceError> {
    let current = load(db, user_id).await?;
    let mut am: user::ActiveModel = current.into();
    if let Some(name) = input.display_name {
        let name = name.trim();
        am.full_name = Set((!name.is_empty()).then(|| name.to_string()));
    }
    if let Some(raw) = input.username {
        let username = raw.trim().to_lowercase();
        if username.is_empty() {
            am.username = Set(None);
        } else {
            user::validate_username(&username)?;
            let taken = user::Entity::find()
                .filter(user::Column::Username.eq(username.as_str()))
                .filter(user::Column::Id.ne(user_id))
                .one(db)
                .await?;
            if taken.is_some() {
                return Err(ServiceError::Conflict("Username already taken.".into()));
            }
            am.username = Set(Some(username));
        }
    }
    Ok(view(&save(db, am).await?))
}

/// Changing the address clears the verification flag.
#[instrument(skip(db))]
pub async fn update_email(db: &DatabaseConnection, user_id: Uuid, email: &str) -> Result<SettingsView, ServiceError> {
    user::validate_email(email)?;
    let email = user::normalize_email(email);
    if let Some(existing) = user::find_by_email(db, &email).await? {
        if existing.id != user_id {
            return Err(ServiceError::Conflict("Email already in use.".into()));
        }
    }
    let mut am: user::ActiveModel = load(db, user_id).await?.into();
    am.email = Set(email);
    am.email_verified = Set(false);
    let saved = save(db, am).await?;
    info!(user_id = %user_id, "email_changed");
    Ok(view(&saved))
}

#[instrument(skip(db, current_password, new_password))]
pub async fn change_password(
    db: &DatabaseConnection,
    user_id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<(), ServiceError> {
    let u = load(db, user_id).await?;
    if !verify_password(current_password, &u.hashed_password) {
        return Err(ServiceError::Validation("Current password is incorrect.".into()));
    }
    user::validate_password(new_password)?;
    let hash = hash_password(new_password).map_err(|e| ServiceError::Internal(e.to_string()))?;
    let mut am: user::ActiveModel = u.into();
    am.hashed_password = Set(hash);
    am.password_changed_at = Set(Some(Utc::now().into()));
    save(db, am).await?;
    info!(user_id = %user_id, "password_changed");
    Ok(())
}

/// Only flips the flag; no second factor is enrolled.
pub async fn enable_2fa(db: &DatabaseConnection, user_id: Uuid) -> Result<SettingsView, ServiceError> {
    let mut am: user::ActiveModel = load(db, user_id).await?.into();
    am.two_factor_enabled = Set(true);
    Ok(view(&save(db, am).await?))
}

/// Soft delete: the row stays, the account is deactivated.
#[instrument(skip(db))]
pub async fn delete_account(db: &DatabaseConnection, user_id: Uuid, confirmation: &str) -> Result<(), ServiceError> {
    if confirmation != "DELETE" {
        return Err(ServiceError::Validation("Invalid confirmation. Type DELETE to confirm.".into()));
    }
    let mut am: user::ActiveModel = load(db, user_id).await?.into();
    am.is_active = Set(false);
    save(db, am).await?;
    info!(user_id = %user_id, "account_deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::test_support::{get_db, make_user};

    fn ago(days: i64) -> Option<String> {
        let now = Utc::now();
        format_password_changed(Some((now - Duration::days(days)).fixed_offset()), now)
    }

    #[test]
    fn password_age_buckets() {
        assert_eq!(format_password_changed(None, Utc::now()), None);
        assert_eq!(ago(0).as_deref(), Some("Today"));
        assert_eq!(ago(1).as_deref(), Some("1 day ago"));
        assert_eq!(ago(12).as_deref(), Some("12 days ago"));
        assert_eq!(ago(45).as_deref(), Some("1 month ago"));
        assert_eq!(ago(95).as_deref(), Some("3 months ago"));
        assert_eq!(ago(800).as_deref(), Some("2 year(s) ago"));
    }

    #[tokio::test]
    async fn account_settings_flow() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, Some("Grace Hopper")).await?;
        let other = make_user(&db, None).await?;

        let s = get(&db, u.id).await?;
        assert_eq!(s.display_name, "Grace Hopper");
        assert_eq!(s.password_last_changed.as_deref(), Some("Today"));

        let handle = format!("G_{}", &Uuid::new_v4().simple().to_string()[..8]);
        let s = update_account(&db, u.id, AccountUpdate { username: Some(handle.clone()), ..Default::default() }).await?;
        assert_eq!(s.username, handle.to_lowercase());
        let dup = update_account(&db, other.id, AccountUpdate { username: Some(handle), ..Default::default() }).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));
        let bad = update_account(&db, u.id, AccountUpdate { username: Some("no spaces".into()), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        assert!(matches!(update_email(&db, u.id, &other.email).await, Err(ServiceError::Conflict(_))));

        let wrong = change_password(&db, u.id, "not-it-at-all", "newpassword1").await.unwrap_err();
        assert_eq!(wrong.to_string(), "validation error: Current password is incorrect.");
        change_password(&db, u.id, "12345678", "newpassword1").await?;

        assert!(enable_2fa(&db, u.id).await?.two_factor_enabled);

        assert!(delete_account(&db, u.id, "delete").await.is_err());
        delete_account(&db, u.id, "DELETE").await?;
        let reloaded = user::Entity::find_by_id(u.id).one(&db).await?.expect("user row kept");
        assert!(!reloaded.is_active);
        Ok(())
    }
}
