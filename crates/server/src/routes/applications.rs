use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use service::application_service::{self, ApplicationUpdate, ApplicationWithJob, NewApplication};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use super::auth::{CurrentUser, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationsQuery {
    pub status: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(get, path = "/api/v1/applications", tag = "applications", responses((status = 200, description = "Applications with their job")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Query(q), _): ApiQuery<ApplicationsQuery>,
) -> Result<Json<Vec<ApplicationWithJob>>, JsonApiError> {
    let page = Pagination::new(q.skip, q.limit);
    Ok(Json(application_service::list(&state.db, user.id, q.status.as_deref(), page).await?))
}

#[utoipa::path(post, path = "/api/v1/applications", tag = "applications", responses((status = 201, description = "Created"), (status = 404, description = "Job not found")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationWithJob>), JsonApiError> {
    let created = application_service::create(&state.db, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/applications/{id}", tag = "applications", responses((status = 200, description = "Application"), (status = 404, description = "Not found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<ApplicationWithJob>, JsonApiError> {
    Ok(Json(application_service::get(&state.db, user.id, id).await?))
}

#[utoipa::path(put, path = "/api/v1/applications/{id}", tag = "applications", responses((status = 200, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(input), _): ApiJson<ApplicationUpdate>,
) -> Result<Json<ApplicationWithJob>, JsonApiError> {
    Ok(Json(application_service::update(&state.db, user.id, id, input).await?))
}

#[utoipa::path(delete, path = "/api/v1/applications/{id}", tag = "applications", responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    application_service::delete(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/applications/{id}/submit", tag = "applications", responses((status = 200, description = "Submitted"), (status = 404, description = "Not found")))]
pub async fn submit(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<Json<ApplicationWithJob>, JsonApiError> {
    Ok(Json(application_service::submit(&state.db, user.id, id).await?))
}
