use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use models::{job, job::NewJob, user_job};
use service::job_service::{self, JobSearch};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use super::auth::{CurrentUser, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub query: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(get, path = "/api/v1/jobs", tag = "jobs", responses((status = 200, description = "Approved jobs, newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(q), _): ApiQuery<JobsQuery>,
) -> Result<Json<Vec<job::Model>>, JsonApiError> {
    let page = Pagination::new(q.skip, q.limit);
    let search = JobSearch { query: q.query, location: q.location, job_type: q.job_type, source: q.source };
    Ok(Json(job_service::list_jobs(&state.db, &search, page).await?))
}

#[utoipa::path(get, path = "/api/v1/jobs/{id}", tag = "jobs", responses((status = 200, description = "Job"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<job::Model>, JsonApiError> {
    Ok(Json(job_service::get_job(&state.db, id).await?))
}

#[utoipa::path(post, path = "/api/v1/jobs", tag = "jobs", responses((status = 201, description = "Created; pending unless a superuser sets a status")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(mut input), _): ApiJson<NewJob>,
) -> Result<(StatusCode, Json<job::Model>), JsonApiError> {
    if !user.is_superuser {
        input.status = None;
    }
    let created = job_service::create_job(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(delete, path = "/api/v1/jobs/{id}", tag = "jobs", responses((status = 204, description = "Deleted"), (status = 403, description = "Superuser only"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    job_service::delete_job(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/jobs/{id}/save", tag = "jobs", responses((status = 201, description = "Saved"), (status = 404, description = "Not found")))]
pub async fn save(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<user_job::Model>), JsonApiError> {
    let saved = job_service::save_job(&state.db, user.id, id).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(delete, path = "/api/v1/jobs/{id}/save", tag = "jobs", responses((status = 204, description = "Removed"), (status = 404, description = "Not saved")))]
pub async fn unsave(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    job_service::unsave_job(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/v1/jobs/saved", tag = "jobs", responses((status = 200, description = "Saved jobs")))]
pub async fn saved(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Query(page), _): ApiQuery<Pagination>,
) -> Result<Json<Vec<job::Model>>, JsonApiError> {
    Ok(Json(job_service::list_saved(&state.db, user.id, page).await?))
}
