use axum::{
    extract::{Path, State},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use uuid::Uuid;

use models::automation::AutomationStatus;
use service::automation_service;
use service::dashboard_service::{self, ActivityItem, DashboardCampaign, DashboardStat};

use crate::errors::JsonApiError;
use crate::extract::ApiPath;
use super::auth::{CurrentUser, ServerState};

type Caller = Extension<CurrentUser>;

#[derive(Debug, Serialize)]
pub struct CampaignState {
    pub status: AutomationStatus,
    pub id: Uuid,
}

#[utoipa::path(get, path = "/api/v1/dashboard/stats", tag = "dashboard", responses((status = 200, description = "Stat cards")))]
pub async fn stats(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller) -> Result<Json<Vec<DashboardStat>>, JsonApiError> {
    Ok(Json(dashboard_service::stats(&state.db, user.id).await?))
}

#[utoipa::path(get, path = "/api/v1/dashboard/campaigns", tag = "dashboard", responses((status = 200, description = "Automations as campaigns")))]
pub async fn campaigns(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller) -> Result<Json<Vec<DashboardCampaign>>, JsonApiError> {
    Ok(Json(dashboard_service::campaigns(&state.db, user.id).await?))
}

#[utoipa::path(get, path = "/api/v1/dashboard/activity", tag = "dashboard", responses((status = 200, description = "Recent activity")))]
pub async fn activity(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller) -> Result<Json<Vec<ActivityItem>>, JsonApiError> {
    Ok(Json(dashboard_service::activity(&state.db, user.id).await?))
}

async fn set_campaign_status(state: &ServerState, user_id: Uuid, id: Uuid, status: AutomationStatus) -> Result<Json<CampaignState>, JsonApiError> {
    let saved = automation_service::set_status(&state.db, user_id, id, status).await?;
    Ok(Json(CampaignState { status, id: saved.automation.id }))
}

#[utoipa::path(post, path = "/api/v1/dashboard/campaigns/{id}/pause", tag = "dashboard", responses((status = 200, description = "Paused"), (status = 404, description = "Not found")))]
pub async fn pause(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<CampaignState>, JsonApiError> {
    set_campaign_status(&state, user.id, id, AutomationStatus::Paused).await
}

#[utoipa::path(post, path = "/api/v1/dashboard/campaigns/{id}/resume", tag = "dashboard", responses((status = 200, description = "Running"), (status = 404, description = "Not found")))]
pub async fn resume(State(state): State<ServerState>, Extension(CurrentUser(user)): Caller, WithRejection(Path(id), _): ApiPath<Uuid>) -> Result<Json<CampaignState>, JsonApiError> {
    set_campaign_status(&state, user.id, id, AutomationStatus::Running).await
}
