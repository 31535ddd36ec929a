use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub password: String, pub full_name: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub access_token: String, pub token_type: String, pub user_id: Uuid }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub error: String, pub detail: String }

#[derive(ToSchema)]
pub struct AutomationInputDoc {
    pub name: Option<String>,
    /// Comma-separated.
    pub target_titles: Option<String>,
    /// Comma-separated.
    pub locations: Option<String>,
    pub daily_limit: Option<i32>,
    pub platforms: Vec<String>,
    pub cover_letter_template: Option<String>,
}

#[derive(ToSchema)]
pub struct NewApplicationDoc {
    pub job_id: Uuid,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::profiles::me,
        crate::routes::profiles::create,
        crate::routes::profiles::update,
        crate::routes::jobs::list,
        crate::routes::jobs::get,
        crate::routes::jobs::create,
        crate::routes::jobs::delete,
        crate::routes::jobs::save,
        crate::routes::jobs::unsave,
        crate::routes::jobs::saved,
        crate::routes::applications::list,
        crate::routes::applications::create,
        crate::routes::applications::get,
        crate::routes::applications::update,
        crate::routes::applications::delete,
        crate::routes::applications::submit,
        crate::routes::automations::list,
        crate::routes::automations::create,
        crate::routes::automations::get,
        crate::routes::automations::update,
        crate::routes::automations::delete,
        crate::routes::automations::pause,
        crate::routes::automations::resume,
        crate::routes::automations::run,
        crate::routes::automations::jobs,
        crate::routes::dashboard::stats,
        crate::routes::dashboard::campaigns,
        crate::routes::dashboard::activity,
        crate::routes::dashboard::pause,
        crate::routes::dashboard::resume,
        crate::routes::setup::status,
        crate::routes::setup::personal,
        crate::routes::setup::upload_resume,
        crate::routes::setup::download_resume,
        crate::routes::setup::complete,
        crate::routes::settings::get,
        crate::routes::settings::update_account,
        crate::routes::settings::update_email,
        crate::routes::settings::change_password,
        crate::routes::settings::enable_2fa,
        crate::routes::settings::delete_account,
        crate::routes::admin::list_users,
        crate::routes::admin::suspend_user,
        crate::routes::admin::activate_user,
        crate::routes::admin::list_jobs,
        crate::routes::admin::update_job,
        crate::routes::admin::approve_job,
        crate::routes::admin::reject_job,
        crate::routes::admin::get_site_settings,
        crate::routes::admin::update_site_settings,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            LoginResponseDoc,
            ErrorBodyDoc,
            AutomationInputDoc,
            NewApplicationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "profiles"),
        (name = "jobs"),
        (name = "applications"),
        (name = "automations"),
        (name = "dashboard"),
        (name = "setup"),
        (name = "settings"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
