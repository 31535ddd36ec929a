use uuid::Uuid;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Deserialize;
use tracing::{info, instrument};

use models::job::{self, JobStatus, NewJob};
use models::user_job::{self, ApplicationStatus};
use crate::auth::domain::AuthUser;
use crate::errors::ServiceError;
use crate::pagination::{Pagination, DEFAULT_LIMIT, MAX_LIMIT};
use crate::query::{icontains, non_blank};

/// Filters for the public job listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearch {
    /// Matches title or description.
    pub query: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
}

fn title_or_description(needle: &str) -> Condition {
    Condition::any()
        .add(icontains((job::Entity, job::Column::Title), needle))
        .add(
            Condition::all()
                .add(job::Column::Description.is_not_null())
                .add(icontains((job::Entity, job::Column::Description), needle)),
        )
}

/// Approved jobs, newest first.
#[instrument(skip(db))]
pub async fn list_jobs(db: &DatabaseConnection, search: &JobSearch, page: Pagination) -> Result<Vec<job::Model>, ServiceError> {
    let (skip, limit) = page.normalize(DEFAULT_LIMIT, MAX_LIMIT);
    let mut q = job::Entity::find().filter(job::Column::Status.eq(JobStatus::Approved.as_str()));
    if let Some(needle) = non_blank(search.query.as_deref()) {
        q = q.filter(title_or_description(needle));
    }
    if let Some(loc) = non_blank(search.location.as_deref()) {
        q = q.filter(icontains((job::Entity, job::Column::Location), loc));
    }
    if let Some(jt) = non_blank(search.job_type.as_deref()) {
        q = q.filter(job::Column::JobType.eq(jt));
    }
    if let Some(src) = non_blank(search.source.as_deref()) {
        q = q.filter(job::Column::Source.eq(src));
    }
    Ok(q.order_by_desc(job::Column::CreatedAt).offset(skip).limit(limit).all(db).await?)
}

pub async fn get_job<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<job::Model, ServiceError> {
    job::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("job"))
}

#[instrument(skip(db, new), fields(title = %new.title))]
pub async fn create_job(db: &DatabaseConnection, new: NewJob) -> Result<job::Model, ServiceError> {
    let created = job::create(db, new).await?;
    info!(job_id = %created.id, status = %created.status, "job_created");
    Ok(created)
}

/// Superusers only.
#[instrument(skip(db, actor), fields(actor_id = %actor.id))]
pub async fn delete_job(db: &DatabaseConnection, actor: &AuthUser, id: Uuid) -> Result<(), ServiceError> {
    if !actor.is_superuser {
        return Err(ServiceError::Forbidden("Not enough permissions".into()));
    }
    let found = get_job(db, id).await?;
    found.delete(db).await?;
    info!(job_id = %id, "job_deleted");
    Ok(())
}

/// Save a job for the user. An existing association is returned unchanged.
#[instrument(skip(db))]
pub async fn save_job(db: &DatabaseConnection, user_id: Uuid, job_id: Uuid) -> Result<user_job::Model, ServiceError> {
    get_job(db, job_id).await?;
    let (saved, created) =
        user_job::insert_if_absent(db, user_job::new_active(user_id, job_id, ApplicationStatus::Saved, None)).await?;
    if created {
        info!(%user_id, %job_id, "job_saved");
    }
    Ok(saved)
}

/// Remove a saved (not yet applied) association.
#[instrument(skip(db))]
pub async fn unsave_job(db: &DatabaseConnection, user_id: Uuid, job_id: Uuid) -> Result<(), ServiceError> {
    let res = user_job::Entity::delete_many()
        .filter(user_job::Column::UserId.eq(user_id))
        .filter(user_job::Column::JobId.eq(job_id))
        .filter(user_job::Column::Status.eq(ApplicationStatus::Saved.as_str()))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("saved job"));
    }
    Ok(())
}

/// The user's saved jobs, most recently saved first.
pub async fn list_saved(db: &DatabaseConnection, user_id: Uuid, page: Pagination) -> Result<Vec<job::Model>, ServiceError> {
    let (skip, limit) = page.normalize(DEFAULT_LIMIT, MAX_LIMIT);
    let rows = user_job::Entity::find()
        .find_also_related(job::Entity)
        .filter(user_job::Column::UserId.eq(user_id))
        .filter(user_job::Column::Status.eq(ApplicationStatus::Saved.as_str()))
        .order_by_desc(user_job::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().filter_map(|(_, j)| j).collect())
}

/// Approved jobs the user has no association with, whose title/description
/// contains any keyword and whose location contains any location term.
/// Empty keyword or location lists do not filter.
pub async fn find_matching_jobs<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    keywords: &[String],
    locations: &[String],
    limit: u64,
) -> Result<Vec<job::Model>, ServiceError> {
    let taken: Vec<Uuid> = user_job::Entity::find()
        .select_only()
        .column(user_job::Column::JobId)
        .filter(user_job::Column::UserId.eq(user_id))
        .into_tuple()
        .all(db)
        .await?;

    let mut q = job::Entity::find().filter(job::Column::Status.eq(JobStatus::Approved.as_str()));
    if !taken.is_empty() {
        q = q.filter(job::Column::Id.is_not_in(taken));
    }
    if !keywords.is_empty() {
        let cond = keywords
            .iter()
            .fold(Condition::any(), |acc, kw| acc.add(title_or_description(kw)));
        q = q.filter(cond);
    }
    if !locations.is_empty() {
        let cond = locations
            .iter()
            .fold(Condition::any(), |acc, loc| acc.add(icontains((job::Entity, job::Column::Location), loc)));
        q = q.filter(cond);
    }
    Ok(q.order_by_desc(job::Column::CreatedAt).limit(limit).all(db).await?)
}
