use std::fmt;
use std::str::FromStr;

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user_job;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_url: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub external_id: Option<String>,
    /// One of [`JobStatus`].
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserJobs,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserJobs => Entity::has_many(user_job::Entity).into(),
        }
    }
}

impl Related<user_job::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserJobs.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Moderation state of a posting. Only approved jobs are visible to users.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Approved,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Approved, JobStatus::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::Validation(format!("invalid job status: {s}")))
    }
}

/// Fields accepted when creating a posting.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_url: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub external_id: Option<String>,
    pub status: Option<JobStatus>,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("title required".into()));
        }
        if self.company.trim().is_empty() {
            return Err(ModelError::Validation("company required".into()));
        }
        if let Some(url) = self.job_url.as_deref().filter(|u| !u.is_empty()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ModelError::Validation("job_url must start with http(s)".into()));
            }
        }
        Ok(())
    }

    pub fn into_active_model(self) -> ActiveModel {
        let now = Utc::now().into();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(self.title.trim().to_string()),
            company: Set(self.company.trim().to_string()),
            location: Set(self.location),
            description: Set(self.description),
            job_url: Set(self.job_url),
            salary_range: Set(self.salary_range),
            job_type: Set(self.job_type),
            source: Set(self.source),
            external_id: Set(self.external_id),
            status: Set(self.status.unwrap_or(JobStatus::Pending).as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewJob) -> Result<Model, ModelError> {
    new.validate()?;
    Ok(new.into_active_model().insert(db).await?)
}
