use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::Response,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use service::setup_service::{self, PersonalDetails, ResumeInfo, SetupData, SetupStatus};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiMultipart};
use super::auth::{CurrentUser, ServerState};

const RESUME_URL: &str = "/api/v1/setup/resume";

#[utoipa::path(get, path = "/api/v1/setup/status", tag = "setup", responses((status = 200, description = "Onboarding state")))]
pub async fn status(State(state): State<ServerState>, Extension(CurrentUser(user)): Extension<CurrentUser>) -> Result<Json<SetupStatus>, JsonApiError> {
    Ok(Json(setup_service::status(&state.db, user.id).await?))
}

#[utoipa::path(put, path = "/api/v1/setup/personal", tag = "setup", responses((status = 200, description = "Saved personal details")))]
pub async fn personal(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(Json(input), _): ApiJson<PersonalDetails>,
) -> Result<Json<SetupData>, JsonApiError> {
    Ok(Json(setup_service::update_personal(&state.db, user.id, input).await?))
}

#[utoipa::path(post, path = "/api/v1/setup/resume", tag = "setup", responses((status = 200, description = "Stored"), (status = 400, description = "Wrong type or too large")))]
pub async fn upload_resume(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    WithRejection(mut multipart, _): ApiMultipart,
) -> Result<Json<Value>, JsonApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| JsonApiError::bad_request(e.body_text()))? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
        let info: ResumeInfo = setup_service::save_resume(
            &state.db,
            &state.uploads,
            user.id,
            &bytes,
            file_name.as_deref(),
            content_type.as_deref(),
        )
        .await?;
        return Ok(Json(json!({"file_name": info.file_name, "uploaded_at": info.uploaded_at, "url": RESUME_URL})));
    }
    Err(JsonApiError::bad_request("Missing multipart field 'file'."))
}

#[utoipa::path(get, path = "/api/v1/setup/resume", tag = "setup", responses((status = 200, description = "Resume file"), (status = 404, description = "No resume uploaded")))]
pub async fn download_resume(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, JsonApiError> {
    let (name, path) = setup_service::resume_path(&state.db, user.id).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| JsonApiError::not_found("No resume uploaded."))?;
    let media = if name.to_ascii_lowercase().ends_with(".pdf") { "application/pdf" } else { "application/octet-stream" };
    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(media));
    if let Ok(v) = HeaderValue::from_str(&disposition) {
        resp.headers_mut().insert(header::CONTENT_DISPOSITION, v);
    }
    Ok(resp)
}

#[utoipa::path(post, path = "/api/v1/setup/complete", tag = "setup", responses((status = 200, description = "Completed"), (status = 400, description = "Requirements missing")))]
pub async fn complete(State(state): State<ServerState>, Extension(CurrentUser(user)): Extension<CurrentUser>) -> Result<Json<Value>, JsonApiError> {
    setup_service::complete(&state.db, user.id).await?;
    Ok(Json(json!({"complete": true})))
}
