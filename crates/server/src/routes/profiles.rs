use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;

use service::profile_service::{self, ProfileInput, ProfileView};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use super::auth::{CurrentUser, ServerState};

#[utoipa::path(get, path = "/api/v1/profiles/me", tag = "profiles", responses((status = 200, description = "Current user's profile")))]
pub async fn me(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ProfileView>, JsonApiError> {
    let view = profile_service::get_or_create(&state.db, user.id, user.full_name.as_deref()).await?;
    Ok(Json(view))
}

#[utoipa::path(post, path = "/api/v1/profiles", tag = "profiles", responses((status = 201, description = "Created"), (status = 409, description = "Profile exists")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<ProfileInput>,
) -> Result<(StatusCode, Json<ProfileView>), JsonApiError> {
    let view = profile_service::create(&state.db, user.id, user.full_name.as_deref(), input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(put, path = "/api/v1/profiles/me", tag = "profiles", responses((status = 200, description = "Updated"), (status = 404, description = "No profile")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<ProfileInput>,
) -> Result<Json<ProfileView>, JsonApiError> {
    let view = profile_service::update(&state.db, user.id, user.full_name.as_deref(), input).await?;
    Ok(Json(view))
}
