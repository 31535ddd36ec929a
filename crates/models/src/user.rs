use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{automation, profile, user_job, user_setup};

pub const PASSWORD_MIN_LEN: usize = 8;
/// Upper bound kept compatible with bcrypt-era hashes.
pub const PASSWORD_MAX_LEN: usize = 72;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    #[sea_orm(unique)]
    pub username: Option<String>,
    pub email_verified: bool,
    pub password_changed_at: Option<DateTimeWithTimeZone>,
    pub two_factor_enabled: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Profile,
    Setup,
    Automations,
    UserJobs,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Profile => Entity::has_one(profile::Entity).into(),
            Relation::Setup => Entity::has_one(user_setup::Entity).into(),
            Relation::Automations => Entity::has_many(automation::Entity).into(),
            Relation::UserJobs => Entity::has_many(user_job::Entity).into(),
        }
    }
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::Profile.def() }
}

impl Related<user_setup::Entity> for Entity {
    fn to() -> RelationDef { Relation::Setup.def() }
}

impl Related<automation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Automations.def() }
}

impl Related<user_job::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserJobs.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lowercase and trim an address before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() || email.len() > 255 || email.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    let labels_ok = domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if !labels_ok {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ModelError::Validation(format!(
            "password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// Usernames: 1-64 of `A-Z a-z 0-9 _ . -`.
pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let ok = (1..=64).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !ok {
        return Err(ModelError::Validation(
            "username may only contain letters, digits, '_', '.' and '-' (max 64)".into(),
        ));
    }
    Ok(())
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Insert a user with an already-hashed password.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    hashed_password: &str,
    full_name: Option<String>,
) -> Result<Model, ModelError> {
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(normalize_email(email)),
        hashed_password: Set(hashed_password.to_string()),
        full_name: Set(full_name.filter(|n| !n.trim().is_empty())),
        username: Set(None),
        email_verified: Set(false),
        password_changed_at: Set(Some(now)),
        two_factor_enabled: Set(false),
        is_active: Set(true),
        is_superuser: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("  bob.s@mail.co.uk ").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a@example..com").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(72)).is_ok());
        assert!(validate_password(&"x".repeat(73)).is_err());
    }

    #[test]
    fn username_charset() {
        assert!(validate_username("alice_s").is_ok());
        assert!(validate_username("a.b-c_9").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("émile").is_err());
        assert!(validate_username(&"u".repeat(65)).is_err());
    }
}
