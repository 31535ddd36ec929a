use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
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
    /// JSON-encoded list of strings; exposed decoded by the profile view.
    #[serde(skip_serializing)]
    pub matching_preferences: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored preferences; anything that is not a JSON list of strings reads as empty.
    pub fn preferences(&self) -> Vec<String> {
        decode_preferences(self.matching_preferences.as_deref())
    }
}

pub fn decode_preferences(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}

pub fn encode_preferences(prefs: &[String]) -> String {
    serde_json::to_string(prefs).unwrap_or_else(|_| "[]".to_string())
}

/// Split "First Middle Last" into ("First", "Middle Last").
pub fn split_full_name(full_name: &str) -> (Option<String>, Option<String>) {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return (None, None);
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => {
            let rest = rest.trim();
            (Some(first.to_string()), (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (Some(trimmed.to_string()), None),
    }
}

/// First letters of the first and last word; a single word gives its first two letters.
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
        [first, .., last] => {
            let mut out = String::new();
            out.extend(first.chars().next());
            out.extend(last.chars().next());
            out.to_uppercase()
        }
    }
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

/// Blank profile for a user; names split from `full_name` when given.
pub fn new_for_user(user_id: Uuid, full_name: Option<&str>) -> ActiveModel {
    let (first, last) = full_name.map(split_full_name).unwrap_or((None, None));
    let now = Utc::now().into();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        first_name: Set(first),
        last_name: Set(last),
        phone: Set(None),
        address: Set(None),
        resume_path: Set(None),
        cover_letter_path: Set(None),
        linkedin_url: Set(None),
        github_url: Set(None),
        portfolio_url: Set(None),
        bio: Set(None),
        headline: Set(None),
        primary_location: Set(None),
        years_experience: Set(None),
        compensation_currency: Set(None),
        top_skills: Set(None),
        cover_letter_tone: Set(None),
        matching_preferences: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
