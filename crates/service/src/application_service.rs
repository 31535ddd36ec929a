//! Applications: the current user's `user_jobs` rows with their job attached.
use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::job;
use models::user_job::{self, ApplicationStatus};
use crate::errors::ServiceError;
use crate::pagination::{Pagination, DEFAULT_LIMIT, MAX_LIMIT};

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationUpdate {
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
    pub resume_path: Option<String>,
    pub cover_letter_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: user_job::Model,
    pub job: Option<job::Model>,
}

impl From<(user_job::Model, Option<job::Model>)> for ApplicationWithJob {
    fn from((application, job): (user_job::Model, Option<job::Model>)) -> Self {
        Self { application, job }
    }
}

/// An unknown status filter is ignored rather than rejected.
#[instrument(skip(db))]
pub async fn list(
    db: &DatabaseConnection,
    user_id: Uuid,
    status: Option<&str>,
    page: Pagination,
) -> Result<Vec<ApplicationWithJob>, ServiceError> {
    let (skip, limit) = page.normalize(DEFAULT_LIMIT, MAX_LIMIT);
    let mut q = user_job::Entity::find()
        .find_also_related(job::Entity)
        .filter(user_job::Column::UserId.eq(user_id));
    if let Some(st) = status.and_then(|s| s.parse::<ApplicationStatus>().ok()) {
        q = q.filter(user_job::Column::Status.eq(st.as_str()));
    }
    let rows = q
        .order_by_desc(user_job::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ApplicationWithJob::from).collect())
}

/// Scoped lookup; other users' rows read as missing.
pub async fn get(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<ApplicationWithJob, ServiceError> {
    user_job::Entity::find_by_id(id)
        .find_also_related(job::Entity)
        .filter(user_job::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(ApplicationWithJob::from)
        .ok_or_else(|| ServiceError::not_found("application"))
}

async fn owned(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<user_job::Model, ServiceError> {
    user_job::Entity::find_by_id(id)
        .filter(user_job::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("application"))
}

/// Start tracking a job. Idempotent per (user, job): the existing row is returned.
#[instrument(skip(db, input), fields(job_id = %input.job_id))]
pub async fn create(db: &DatabaseConnection, user_id: Uuid, input: NewApplication) -> Result<ApplicationWithJob, ServiceError> {
    let job = crate::job_service::get_job(db, input.job_id).await?;
    let status = input.status.unwrap_or(ApplicationStatus::Saved);
    let mut am = user_job::new_active(user_id, input.job_id, status, None);
    am.notes = Set(input.notes);
    am.resume_path = Set(input.resume_path);
    am.cover_letter_path = Set(input.cover_letter_path);
    let (application, created) = user_job::insert_if_absent(db, am).await?;
    if created {
        info!(application_id = %application.id, status = %status, "application_created");
    }
    Ok(ApplicationWithJob { application, job: Some(job) })
}

#[instrument(skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    user_id: Uuid,
    id: Uuid,
    input: ApplicationUpdate,
) -> Result<ApplicationWithJob, ServiceError> {
    let existing = owned(db, user_id, id).await?;
    let had_applied_at = existing.applied_at.is_some();
    let mut am: user_job::ActiveModel = existing.into();
    if let Some(st) = input.status {
        am.status = Set(st.as_str().to_string());
        if st.is_applied() && !had_applied_at {
            am.applied_at = Set(Some(Utc::now().into()));
        }
    }
    if let Some(v) = input.notes {
        am.notes = Set(Some(v));
    }
    if let Some(v) = input.resume_path {
        am.resume_path = Set(Some(v));
    }
    if let Some(v) = input.cover_letter_path {
        am.cover_letter_path = Set(Some(v));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    get(db, user_id, id).await
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    owned(db, user_id, id).await?.delete(db).await?;
    Ok(())
}

/// Mark as submitted now.
#[instrument(skip(db))]
pub async fn submit(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<ApplicationWithJob, ServiceError> {
    let mut am: user_job::ActiveModel = owned(db, user_id, id).await?.into();
    let now = Utc::now();
    am.status = Set(ApplicationStatus::Submitted.as_str().to_string());
    am.applied_at = Set(Some(now.into()));
    am.updated_at = Set(now.into());
    am.update(db).await?;
    info!(application_id = %id, "application_submitted");
    get(db, user_id, id).await
}

/// Insert `submitted` rows for each job on behalf of an automation.
pub async fn apply_to_jobs<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    job_ids: &[Uuid],
    automation_id: Uuid,
) -> Result<Vec<user_job::Model>, ServiceError> {
    let mut applied = Vec::with_capacity(job_ids.len());
    for job_id in job_ids {
        let am = user_job::new_active(user_id, *job_id, ApplicationStatus::Submitted, Some(automation_id));
        let (row, created) = user_job::insert_if_absent(db, am).await?;
        if created {
            applied.push(row);
        }
    }
    Ok(applied)
}
