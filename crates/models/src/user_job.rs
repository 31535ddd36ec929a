//! `user_jobs`: a user's association with a job, i.e. a saved job or an application.
use std::fmt;
use std::str::FromStr;

use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{automation, job, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub automation_id: Option<Uuid>,
    /// One of [`ApplicationStatus`].
    pub status: String,
    pub applied_at: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Job,
    Automation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Job => Entity::belongs_to(job::Entity)
                .from(Column::JobId)
                .to(job::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Automation => Entity::belongs_to(automation::Entity)
                .from(Column::AutomationId)
                .to(automation::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<job::Entity> for Entity {
    fn to() -> RelationDef { Relation::Job.def() }
}

impl Related<automation::Entity> for Entity {
    fn to() -> RelationDef { Relation::Automation.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Saved,
    Draft,
    Submitted,
    Reviewing,
    Interview,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::Reviewing,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Whether the application has actually been sent out.
    pub fn is_applied(&self) -> bool {
        !matches!(self, ApplicationStatus::Saved | ApplicationStatus::Draft)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::Validation(format!("invalid application status: {s}")))
    }
}

pub async fn find_for_user_job<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    job_id: Uuid,
) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::JobId.eq(job_id))
        .one(db)
        .await?)
}

/// Insert unless the (user, job) pair already exists. Returns the stored row
/// and whether this call created it; concurrent callers all get the same row.
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C, am: ActiveModel) -> Result<(Model, bool), ModelError> {
    let (Some(user_id), Some(job_id)) = (am.user_id.clone().take(), am.job_id.clone().take()) else {
        return Err(ModelError::Validation("user_id and job_id are required".into()));
    };
    let inserted = Entity::insert(am)
        .on_conflict(OnConflict::columns([Column::UserId, Column::JobId]).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    let row = find_for_user_job(db, user_id, job_id)
        .await?
        .ok_or_else(|| ModelError::Db(format!("user job {user_id}/{job_id} missing after insert")))?;
    Ok((row, inserted > 0))
}

/// New association; `applied_at` is stamped for statuses past draft.
pub fn new_active(
    user_id: Uuid,
    job_id: Uuid,
    status: ApplicationStatus,
    automation_id: Option<Uuid>,
) -> ActiveModel {
    let now: DateTimeWithTimeZone = Utc::now().into();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        job_id: Set(job_id),
        automation_id: Set(automation_id),
        status: Set(status.as_str().to_string()),
        applied_at: Set(status.is_applied().then_some(now)),
        notes: Set(None),
        resume_path: Set(None),
        cover_letter_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_statuses() {
        for st in ApplicationStatus::ALL {
            assert_eq!(st.as_str().parse::<ApplicationStatus>().unwrap(), st);
        }
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn applied_at_only_after_draft() {
        let u = Uuid::new_v4();
        let j = Uuid::new_v4();
        let saved = new_active(u, j, ApplicationStatus::Saved, None);
        assert_eq!(saved.applied_at.unwrap(), None);
        let sent = new_active(u, j, ApplicationStatus::Submitted, None);
        assert!(sent.applied_at.unwrap().is_some());
    }
}
