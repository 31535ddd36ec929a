pub mod admin;
pub mod applications;
pub mod auth;
pub mod automations;
pub mod dashboard;
pub mod jobs;
pub mod profiles;
pub mod settings;
pub mod setup;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

/// Room for multipart framing around the resume itself.
const MULTIPART_SLACK: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, authenticated and admin routes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout));

    let upload_limit = state.uploads.max_resume_bytes() + MULTIPART_SLACK;

    let protected = Router::new()
        .route("/api/v1/profiles", post(profiles::create))
        .route("/api/v1/profiles/me", get(profiles::me).put(profiles::update))
        .route("/api/v1/jobs", get(jobs::list).post(jobs::create))
        .route("/api/v1/jobs/saved", get(jobs::saved))
        .route("/api/v1/jobs/:id", get(jobs::get).delete(jobs::delete))
        .route("/api/v1/jobs/:id/save", post(jobs::save).delete(jobs::unsave))
        .route("/api/v1/applications", get(applications::list).post(applications::create))
        .route(
            "/api/v1/applications/:id",
            get(applications::get).put(applications::update).delete(applications::delete),
        )
        .route("/api/v1/applications/:id/submit", post(applications::submit))
        .route("/api/v1/automations", get(automations::list).post(automations::create))
        .route(
            "/api/v1/automations/:id",
            get(automations::get).put(automations::update).delete(automations::delete),
        )
        .route("/api/v1/automations/:id/pause", post(automations::pause))
        .route("/api/v1/automations/:id/resume", post(automations::resume))
        .route("/api/v1/automations/:id/run", post(automations::run))
        .route("/api/v1/automations/:id/jobs", get(automations::jobs))
        .route("/api/v1/dashboard/stats", get(dashboard::stats))
        .route("/api/v1/dashboard/campaigns", get(dashboard::campaigns))
        .route("/api/v1/dashboard/activity", get(dashboard::activity))
        .route("/api/v1/dashboard/campaigns/:id/pause", post(dashboard::pause))
        .route("/api/v1/dashboard/campaigns/:id/resume", post(dashboard::resume))
        .route("/api/v1/setup/status", get(setup::status))
        .route("/api/v1/setup/personal", put(setup::personal))
        .route(
            "/api/v1/setup/resume",
            get(setup::download_resume)
                .post(setup::upload_resume)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/setup/complete", post(setup::complete))
        .route("/api/v1/settings", get(settings::get))
        .route(
            "/api/v1/settings/account",
            axum::routing::patch(settings::update_account).delete(settings::delete_account),
        )
        .route("/api/v1/settings/email", post(settings::update_email))
        .route("/api/v1/settings/password", post(settings::change_password))
        .route("/api/v1/settings/2fa", post(settings::enable_2fa))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // Layers run bottom-up: authenticate first, then check the role.
    let admin_routes = Router::new()
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users/:id/suspend", post(admin::suspend_user))
        .route("/api/v1/admin/users/:id/activate", post(admin::activate_user))
        .route("/api/v1/admin/jobs", get(admin::list_jobs))
        .route("/api/v1/admin/jobs/:id", put(admin::update_job))
        .route("/api/v1/admin/jobs/:id/approve", post(admin::approve_job))
        .route("/api/v1/admin/jobs/:id/reject", post(admin::reject_job))
        .route(
            "/api/v1/admin/site-settings",
            get(admin::get_site_settings).put(admin::update_site_settings),
        )
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(protected)
        .merge(admin_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
