use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use service::auth::domain::{AuthUser, LoginInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};

use crate::errors::JsonApiError;
use crate::extract::ApiJson;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub uploads: configs::UploadConfig,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &configs::AppConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        let auth = Arc::new(AuthService::new(repo, AuthConfig::from(&cfg.auth)));
        Self { db, auth, uploads: cfg.uploads.clone() }
    }
}

/// The authenticated caller, inserted by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[derive(Serialize)]
pub struct RegisterOutput {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub is_superuser: bool,
}

#[derive(Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: LoginUser,
}

#[utoipa::path(post, path = "/api/v1/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Email already registered")))]
pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let u = state.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterOutput { id: u.id, email: u.email, full_name: u.full_name, is_active: u.is_active }),
    ))
}

#[utoipa::path(post, path = "/api/v1/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in; also sets the auth_token cookie"), (status = 401, description = "Unauthorized"), (status = 403, description = "Inactive user")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    WithRejection(Json(input), _): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let user = session.user;
    let out = LoginOutput {
        access_token: session.token,
        token_type: "bearer",
        user: LoginUser { id: user.id, email: user.email, full_name: user.full_name, is_superuser: user.is_superuser },
    };
    Ok((jar.add(cookie), Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<String, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        let value = h.to_str().unwrap_or_default();
        return match value.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => Err(JsonApiError::unauthorized("Could not validate credentials")),
        };
    }
    CookieJar::from_headers(req.headers())
        .get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("Not authenticated"))
}

/// Resolve the caller and stash it in request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let token = extract_token(&req)?;
    let user = state.auth.authenticate(&token).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Runs after [`require_auth`]; superusers only.
pub async fn require_admin(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if !user.is_superuser {
        tracing::warn!(user_id = %user.id, path = %req.uri().path(), "admin route refused");
        return Err(JsonApiError::forbidden("Not enough permissions"));
    }
    Ok(next.run(req).await)
}
