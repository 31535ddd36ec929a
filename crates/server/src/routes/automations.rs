use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use service::application_service::ApplicationWithJob;
use service::automation_service::{self, AutomationInput, AutomationUpdate, AutomationView, RunResult};
use service::pagination::Pagination;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use super::auth::{CurrentUser, ServerState};

type Caller = Extension<CurrentUser>;

#[utoipa::path(get, path = "/api/v1/automations", tag = "automations", responses((status = 200, description = "Automations with today's application count")))]
pub async fn list(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller) -> Result<Json<Vec<AutomationView>>, JsonApiError> {
    Ok(Json(automation_service::list(&state.db, user.id).await?))
}

#[utoipa::path(post, path = "/api/v1/automations", tag = "automations", responses((status = 201, description = "Created paused"), (status = 400, description = "Per-user limit reached")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Caller,
    WithRejection(Json(input), _): ApiJson<AutomationInput>,
) -> Result<(StatusCode, Json<AutomationView>), JsonApiError> {
    let created = automation_service::create(&state.db, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/automations/{id}", tag = "automations", responses((status = 200, description = "Automation"), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<AutomationView>, JsonApiError> {
    Ok(Json(automation_service::get(&state.db, user.id, id).await?))
}

#[utoipa::path(put, path = "/api/v1/automations/{id}", tag = "automations", responses((status = 200, description = "Updated"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Caller,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Json(input), _): ApiJson<AutomationUpdate>,
) -> Result<Json<AutomationView>, JsonApiError> {
    Ok(Json(automation_service::update(&state.db, user.id, id, input).await?))
}

#[utoipa::path(delete, path = "/api/v1/automations/{id}", tag = "automations", responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    automation_service::delete(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/v1/automations/{id}/pause", tag = "automations", responses((status = 200, description = "Paused")))]
pub async fn pause(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<AutomationView>, JsonApiError> {
    Ok(Json(automation_service::pause(&state.db, user.id, id).await?))
}

#[utoipa::path(post, path = "/api/v1/automations/{id}/resume", tag = "automations", responses((status = 200, description = "Running")))]
pub async fn resume(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<AutomationView>, JsonApiError> {
    Ok(Json(automation_service::resume(&state.db, user.id, id).await?))
}

#[utoipa::path(post, path = "/api/v1/automations/{id}/run", tag = "automations", responses((status = 200, description = "Run summary")))]
pub async fn run(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<RunResult>, JsonApiError> {
    Ok(Json(automation_service::run(&state.db, user.id, id).await?))
}

#[utoipa::path(get, path = "/api/v1/automations/{id}/jobs", tag = "automations", responses((status = 200, description = "Applications created by the automation")))]
pub async fn jobs(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Caller,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    WithRejection(Query(page), _): ApiQuery<Pagination>,
) -> Result<Json<Vec<ApplicationWithJob>>, JsonApiError> {
    Ok(Json(automation_service::list_jobs(&state.db, user.id, id, page).await?))
}
