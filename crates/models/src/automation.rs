use std::fmt;
use std::str::FromStr;

use sea_orm::{entity::prelude::*, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{user, user_job};

pub const DEFAULT_DAILY_LIMIT: i32 = 25;
pub const MAX_DAILY_LIMIT: i32 = 500;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "automations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Comma-separated title keywords.
    pub target_titles: Option<String>,
    /// Comma-separated location terms.
    pub locations: Option<String>,
    pub daily_limit: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub platforms: Json,
    pub cover_letter_template: Option<String>,
    /// One of [`AutomationStatus`].
    pub status: String,
    pub total_applied: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    UserJobs,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::UserJobs => Entity::has_many(user_job::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<user_job::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserJobs.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationStatus {
    Running,
    Paused,
}

impl AutomationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutomationStatus::Running => "running",
            AutomationStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for AutomationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutomationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(AutomationStatus::Running),
            "paused" => Ok(AutomationStatus::Paused),
            other => Err(ModelError::Validation(format!("invalid automation status: {other}"))),
        }
    }
}

impl Model {
    pub fn platform_list(&self) -> Vec<String> {
        platforms_from_json(&self.platforms)
    }

    pub fn title_keywords(&self) -> Vec<String> {
        split_terms(self.target_titles.as_deref())
    }

    pub fn location_terms(&self) -> Vec<String> {
        split_terms(self.locations.as_deref())
    }
}

pub fn validate_daily_limit(limit: i32) -> Result<(), ModelError> {
    if !(1..=MAX_DAILY_LIMIT).contains(&limit) {
        return Err(ModelError::Validation(format!("daily_limit must be between 1 and {MAX_DAILY_LIMIT}")));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

/// Split a comma-separated list into trimmed, lowercased, non-empty terms.
pub fn split_terms(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn platforms_to_json(platforms: &[String]) -> Json {
    Json::Array(platforms.iter().cloned().map(Json::String).collect())
}

/// Non-string entries are dropped.
pub fn platforms_from_json(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

pub struct NewAutomation {
    pub user_id: Uuid,
    pub name: String,
    pub target_titles: Option<String>,
    pub locations: Option<String>,
    pub daily_limit: Option<i32>,
    pub platforms: Vec<String>,
    pub cover_letter_template: Option<String>,
    pub status: AutomationStatus,
    pub total_applied: i32,
}

impl NewAutomation {
    pub fn into_active_model(self) -> Result<ActiveModel, ModelError> {
        validate_name(&self.name)?;
        let daily_limit = self.daily_limit.unwrap_or(DEFAULT_DAILY_LIMIT);
        validate_daily_limit(daily_limit)?;
        let now = Utc::now().into();
        Ok(ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(self.user_id),
            name: Set(self.name.trim().to_string()),
            target_titles: Set(self.target_titles),
            locations: Set(self.locations),
            daily_limit: Set(daily_limit),
            platforms: Set(platforms_to_json(&self.platforms)),
            cover_letter_template: Set(self.cover_letter_template),
            status: Set(self.status.as_str().to_string()),
            total_applied: Set(self.total_applied.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
        })
    }
}
