use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use uuid::Uuid;

use models::{job, job::JobStatus, site_settings};
use service::admin_service::{self, AdminUserView, JobUpdate};
use service::site_settings_service::{self, SiteSettingsUpdate};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use super::auth::{CurrentUser, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct AdminFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

#[utoipa::path(get, path = "/api/v1/admin/users", tag = "admin", responses((status = 200, description = "Users"), (status = 403, description = "Superuser only")))]
pub async fn list_users(State(state): State<ServerState>, WithRejection(Query(f), _): ApiQuery<AdminFilter>) -> Result<Json<Vec<AdminUserView>>, JsonApiError> {
    Ok(Json(admin_service::list_users(&state.db, f.search.as_deref(), f.status.as_deref()).await?))
}

#[utoipa::path(post, path = "/api/v1/admin/users/{id}/suspend", tag = "admin", responses((status = 204, description = "Suspended"), (status = 400, description = "Own account"), (status = 404, description = "Not found")))]
pub async fn suspend_user(
    State(state): State<ServerState>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    admin_service::suspend_user(&state.db, admin.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/admin/users/{id}/activate", tag = "admin", responses((status = 204, description = "Activated"), (status = 404, description = "Not found")))]
pub async fn activate_user(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    admin_service::activate_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/v1/admin/jobs", tag = "admin", responses((status = 200, description = "All jobs")))]
pub async fn list_jobs(State(state): State<ServerState>, WithRejection(Query(f), _): ApiQuery<AdminFilter>) -> Result<Json<Vec<job::Model>>, JsonApiError> {
    Ok(Json(admin_service::list_jobs(&state.db, f.search.as_deref(), f.status.as_deref()).await?))
}

#[utoipa::path(put, path = "/api/v1/admin/jobs/{id}", tag = "admin", responses((status = 200, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update_job(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(input), _): ApiJson<JobUpdate>,
) -> Result<Json<job::Model>, JsonApiError> {
    Ok(Json(admin_service::update_job(&state.db, id, input).await?))
}

#[utoipa::path(post, path = "/api/v1/admin/jobs/{id}/approve", tag = "admin", responses((status = 204, description = "Approved")))]
pub async fn approve_job(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    admin_service::set_job_status(&state.db, id, JobStatus::Approved).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/admin/jobs/{id}/reject", tag = "admin", responses((status = 204, description = "Rejected")))]
pub async fn reject_job(State(state): State<ServerState>, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    admin_service::set_job_status(&state.db, id, JobStatus::Rejected).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/v1/admin/site-settings", tag = "admin", responses((status = 200, description = "Site settings")))]
pub async fn get_site_settings(State(state): State<ServerState>) -> Result<Json<site_settings::Model>, JsonApiError> {
    Ok(Json(site_settings_service::get_or_create(&state.db).await?))
}

#[utoipa::path(put, path = "/api/v1/admin/site-settings", tag = "admin", responses((status = 200, description = "Updated")))]
pub async fn update_site_settings(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): ApiJson<SiteSettingsUpdate>,
) -> Result<Json<site_settings::Model>, JsonApiError> {
    Ok(Json(site_settings_service::update(&state.db, input).await?))
}
