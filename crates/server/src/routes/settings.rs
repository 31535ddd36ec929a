use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use common::types::Message;
use service::settings_service::{self, AccountUpdate, SettingsView};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use super::auth::{CurrentUser, ServerState};

#[derive(Debug, Deserialize)]
pub struct EmailChange {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteConfirmation {
    pub confirmation: String,
}

#[utoipa::path(get, path = "/api/v1/settings", tag = "settings", responses((status = 200, description = "Account settings")))]
pub async fn get(State(state): State<ServerState>, Extension(CurrentUser(user)): Extension<CurrentUser>) -> Result<Json<SettingsView>, JsonApiError> {
    Ok(Json(settings_service::get(&state.db, user.id).await?))
}

#[utoipa::path(patch, path = "/api/v1/settings/account", tag = "settings", responses((status = 200, description = "Updated"), (status = 409, description = "Username taken")))]
pub async fn update_account(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<AccountUpdate>,
) -> Result<Json<SettingsView>, JsonApiError> {
    Ok(Json(settings_service::update_account(&state.db, user.id, input).await?))
}

#[utoipa::path(post, path = "/api/v1/settings/email", tag = "settings", responses((status = 200, description = "Updated"), (status = 409, description = "Email in use")))]
pub async fn update_email(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<EmailChange>,
) -> Result<Json<SettingsView>, JsonApiError> {
    Ok(Json(settings_service::update_email(&state.db, user.id, &input.email).await?))
}

#[utoipa::path(post, path = "/api/v1/settings/password", tag = "settings", responses((status = 200, description = "Changed"), (status = 400, description = "Current password is incorrect")))]
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<PasswordChange>,
) -> Result<Json<Message>, JsonApiError> {
    settings_service::change_password(&state.db, user.id, &input.current_password, &input.new_password).await?;
    Ok(Json(Message::new("Password updated.")))
}

#[utoipa::path(post, path = "/api/v1/settings/2fa", tag = "settings", responses((status = 200, description = "Enabled")))]
pub async fn enable_2fa(State(state): State<ServerState>, Extension(CurrentUser(user)): Extension<CurrentUser>) -> Result<Json<SettingsView>, JsonApiError> {
    Ok(Json(settings_service::enable_2fa(&state.db, user.id).await?))
}

#[utoipa::path(delete, path = "/api/v1/settings/account", tag = "settings", responses((status = 204, description = "Account deactivated"), (status = 400, description = "Wrong confirmation")))]
pub async fn delete_account(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<DeleteConfirmation>,
) -> Result<StatusCode, JsonApiError> {
    settings_service::delete_account(&state.db, user.id, &input.confirmation).await?;
    Ok(StatusCode::NO_CONTENT)
}
