use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::profile::{self, encode_preferences, initials, split_full_name};
use crate::errors::ServiceError;

/// Create/update payload; absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    /// Split into first/last name.
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub bio: Option<String>,
    pub headline: Option<String>,
    pub primary_location: Option<String>,
    pub years_experience: Option<String>,
    pub compensation_currency: Option<String>,
    pub top_skills: Option<String>,
    pub cover_letter_tone: Option<String>,
    pub matching_preferences: Option<Vec<String>>,
}

/// Profile row plus the derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: profile::Model,
    pub full_name: Option<String>,
    pub initials: String,
    pub matching_preferences: Vec<String>,
}

/// Derive display name/initials; the account's full name is the fallback.
pub fn view(p: profile::Model, user_full_name: Option<&str>) -> ProfileView {
    let joined = [p.first_name.as_deref(), p.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let full_name = if joined.is_empty() {
        user_full_name.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
    } else {
        Some(joined)
    };
    let initials = full_name.as_deref().map(initials).unwrap_or_default();
    let matching_preferences = p.preferences();
    ProfileView { profile: p, full_name, initials, matching_preferences }
}

macro_rules! set_present {
    ($am:ident, $input:ident, $($field:ident),+ $(,)?) => {
        $( if let Some(v) = $input.$field { $am.$field = Set(Some(v)); } )+
    };
}

fn apply(am: &mut profile::ActiveModel, input: ProfileInput) {
    if let Some(full) = input.full_name.as_deref() {
        let (first, last) = split_full_name(full);
        am.first_name = Set(first);
        am.last_name = Set(last);
    }
    if let Some(prefs) = input.matching_preferences.as_deref() {
        am.matching_preferences = Set(Some(encode_preferences(prefs)));
    }
    set_present!(
        am, input,
        first_name, last_name, phone, address, resume_path, cover_letter_path,
        linkedin_url, github_url, portfolio_url, bio, headline, primary_location,
        years_experience, compensation_currency, top_skills, cover_letter_tone,
    );
}

/// Current user's profile, created blank (names split from the account) on first access.
#[instrument(skip(db))]
pub async fn get_or_create(db: &DatabaseConnection, user_id: Uuid, user_full_name: Option<&str>) -> Result<ProfileView, ServiceError> {
    if let Some(p) = profile::find_by_user(db, user_id).await? {
        return Ok(view(p, user_full_name));
    }
    let created = profile::new_for_user(user_id, user_full_name).insert(db).await?;
    info!(%user_id, "profile_created");
    Ok(view(created, user_full_name))
}

#[instrument(skip(db, input))]
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    user_full_name: Option<&str>,
    input: ProfileInput,
) -> Result<ProfileView, ServiceError> {
    if profile::find_by_user(db, user_id).await?.is_some() {
        return Err(ServiceError::Conflict("profile already exists".into()));
    }
    let mut am = profile::new_for_user(user_id, None);
    apply(&mut am, input);
    let created = am.insert(db).await?;
    info!(%user_id, "profile_created");
    Ok(view(created, user_full_name))
}

#[instrument(skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: Uuid,
    user_full_name: Option<&str>,
    input: ProfileInput,
) -> Result<ProfileView, ServiceError> {
    let existing = profile::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("profile"))?;
    let mut am: profile::ActiveModel = existing.into();
    apply(&mut am, input);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(view(updated, user_full_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_user};

    fn blank(user_id: Uuid) -> profile::Model {
        let now = Utc::now().into();
        profile::Model {
            id: Uuid::new_v4(),
            user_id,
            first_name: None,
            last_name: None,
            phone: None,
            address: None,
            resume_path: None,
            cover_letter_path: None,
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            bio: None,
            headline: None,
            primary_location: None,
            years_experience: None,
            compensation_currency: None,
            top_skills: None,
            cover_letter_tone: None,
            matching_preferences: Some("broken".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn view_prefers_profile_names() {
        let mut p = blank(Uuid::new_v4());
        p.first_name = Some("Grace".into());
        p.last_name = Some("Hopper".into());
        let v = view(p, Some("Someone Else"));
        assert_eq!(v.full_name.as_deref(), Some("Grace Hopper"));
        assert_eq!(v.initials, "GH");
        assert!(v.matching_preferences.is_empty());
    }

    #[test]
    fn view_falls_back_to_account_name() {
        let v = view(blank(Uuid::new_v4()), Some("Alan Turing"));
        assert_eq!(v.full_name.as_deref(), Some("Alan Turing"));
        assert_eq!(v.initials, "AT");
        let v = view(blank(Uuid::new_v4()), None);
        assert_eq!(v.full_name, None);
        assert_eq!(v.initials, "");
    }

    #[tokio::test]
    async fn profile_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, Some("Ada Lovelace")).await?;

        let v = get_or_create(&db, u.id, u.full_name.as_deref()).await?;
        assert_eq!(v.profile.first_name.as_deref(), Some("Ada"));

        let dup = create(&db, u.id, None, ProfileInput::default()).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let input = ProfileInput {
            full_name: Some("Augusta Ada King".into()),
            headline: Some("Analyst".into()),
            matching_preferences: Some(vec!["remote".into()]),
            ..Default::default()
        };
        let v = update(&db, u.id, None, input).await?;
        assert_eq!(v.profile.first_name.as_deref(), Some("Augusta"));
        assert_eq!(v.profile.last_name.as_deref(), Some("Ada King"));
        assert_eq!(v.profile.headline.as_deref(), Some("Analyst"));
        assert_eq!(v.matching_preferences, vec!["remote"]);
        assert_eq!(v.initials, "AK");

        // absent fields untouched
        let v = update(&db, u.id, None, ProfileInput { phone: Some("555".into()), ..Default::default() }).await?;
        assert_eq!(v.profile.headline.as_deref(), Some("Analyst"));
        Ok(())
    }
}
