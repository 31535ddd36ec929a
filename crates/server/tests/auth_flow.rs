use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

fn test_config() -> configs::AppConfig {
    let mut cfg = configs::AppConfig::default();
    cfg.auth.secret_key = "test-secret".into();
    cfg.uploads.dir = std::env::temp_dir().join("jt-server-tests").to_string_lossy().to_string();
    cfg
}

fn offline_app() -> Router {
    server::build_app(&test_config(), DatabaseConnection::Disconnected)
}

async fn db_app() -> Option<(Router, DatabaseConnection)> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {e}");
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {e}");
        return None;
    }
    Some((server::build_app(&test_config(), db.clone()), db))
}

async fn call(app: &mut Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::from(body.to_string())).unwrap()
}

fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    b.body(Body::empty()).unwrap()
}

async fn register_and_login(app: &mut Router) -> anyhow::Result<(String, String)> {
    let email = format!("user_{}@example.com", Uuid::new_v4());
    let (status, body) = call(
        app,
        json_req("POST", "/api/v1/auth/register", None, json!({"email": email, "password": "S3curePass!", "full_name": "Tester"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["email"], email.as_str());

    let (status, body) =
        call(app, json_req("POST", "/api/v1/auth/login", None, json!({"email": email, "password": "S3curePass!"}))).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    Ok((token, user_id))
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let mut app = offline_app();
    let (status, body) = call(&mut app, get_req("/health", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn protected_route_without_token_is_401() -> anyhow::Result<()> {
    let mut app = offline_app();
    let resp = app.call(get_req("/api/v1/jobs", None)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_is_401() -> anyhow::Result<()> {
    let mut app = offline_app();
    let (status, body) = call(&mut app, get_req("/api/v1/profiles/me", Some("not-a-jwt"))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");
    Ok(())
}

#[tokio::test]
async fn admin_routes_require_auth_first() -> anyhow::Result<()> {
    let mut app = offline_app();
    let (status, _) = call(&mut app, get_req("/api/v1/admin/users", None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let mut app = offline_app();
    let (status, body) = call(&mut app, get_req("/api-docs/openapi.json", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/auth/login"].is_object());
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_use_the_error_shape() -> anyhow::Result<()> {
    let mut app = offline_app();
    let broken = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))?;
    let (status, body) = call(&mut app, broken).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()), "{body}");

    let (status, body) =
        call(&mut app, json_req("POST", "/api/v1/auth/register", None, json!({"email": "x@example.com"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unprocessable Entity");
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("password")), "{body}");

    let untyped = Request::builder().method("POST").uri("/api/v1/auth/login").body(Body::from("{}"))?;
    let (status, body) = call(&mut app, untyped).await?;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
    Ok(())
}

#[tokio::test]
async fn bad_path_and_query_use_the_error_shape() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;

    let (status, body) = call(&mut app, get_req("/api/v1/jobs/not-a-uuid", Some(&token))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["detail"].is_string());

    let (status, body) = call(&mut app, get_req("/api/v1/jobs?limit=lots", Some(&token))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some_and(|d| d.contains("limit")), "{body}");
    Ok(())
}

#[tokio::test]
async fn register_login_and_profile_flow() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;

    let (status, body) = call(
        &mut app,
        json_req("POST", "/api/v1/profiles", Some(&token), json!({"headline": "Backend Engineer", "top_skills": "rust, sql"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["full_name"], "Tester");

    let (status, body) = call(&mut app, get_req("/api/v1/profiles/me", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["headline"], "Backend Engineer");

    let (status, _) =
        call(&mut app, json_req("POST", "/api/v1/profiles", Some(&token), json!({"headline": "Again"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) =
        call(&mut app, json_req("PUT", "/api/v1/profiles/me", Some(&token), json!({"primary_location": "Berlin"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["primary_location"], "Berlin");
    assert_eq!(body["headline"], "Backend Engineer");
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let body = json!({"email": email, "password": "S3curePass!"});
    let (status, _) = call(&mut app, json_req("POST", "/api/v1/auth/register", None, body.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&mut app, json_req("POST", "/api/v1/auth/register", None, body)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_401() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let email = format!("wp_{}@example.com", Uuid::new_v4());
    call(&mut app, json_req("POST", "/api/v1/auth/register", None, json!({"email": email, "password": "S3curePass!"}))).await?;
    let (status, _) =
        call(&mut app, json_req("POST", "/api/v1/auth/login", None, json!({"email": email, "password": "nope-nope"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn save_job_then_apply_and_submit() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;

    let title = format!("Rust Engineer {}", Uuid::new_v4());
    let (status, job) = call(
        &mut app,
        json_req("POST", "/api/v1/jobs", Some(&token), json!({"title": title, "company": "Ferris Inc", "location": "Remote"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{job}");
    let job_id = job["id"].as_str().unwrap().to_string();

    let (status, _) = call(&mut app, json_req("POST", &format!("/api/v1/jobs/{job_id}/save"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, saved) = call(&mut app, get_req("/api/v1/jobs/saved", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(saved.as_array().unwrap().iter().any(|j| j["id"] == job_id.as_str()));

    let (status, app_row) =
        call(&mut app, json_req("POST", "/api/v1/applications", Some(&token), json!({"job_id": job_id, "notes": "referral"}))).await?;
    assert_eq!(status, StatusCode::CREATED, "{app_row}");
    let app_id = app_row["id"].as_str().unwrap().to_string();

    let (status, submitted) =
        call(&mut app, json_req("POST", &format!("/api/v1/applications/{app_id}/submit"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submitted["status"], "submitted");
    assert!(submitted["applied_at"].is_string());

    let (status, listed) = call(&mut app, get_req("/api/v1/applications?status=submitted", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().iter().any(|a| a["id"] == app_id.as_str()));
    Ok(())
}

#[tokio::test]
async fn application_for_missing_job_is_404() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;
    let (status, _) = call(
        &mut app,
        json_req("POST", "/api/v1/applications", Some(&token), json!({"job_id": Uuid::new_v4()})),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_routes_need_superuser() -> anyhow::Result<()> {
    let Some((mut app, db)) = db_app().await else { return Ok(()) };
    let (token, user_id) = register_and_login(&mut app).await?;

    let (status, body) = call(&mut app, get_req("/api/v1/admin/users", Some(&token))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not enough permissions");

    let uid = Uuid::parse_str(&user_id)?;
    let row = models::user::Entity::find_by_id(uid).one(&db).await?.unwrap();
    let mut am: models::user::ActiveModel = row.into();
    am.is_superuser = Set(true);
    am.update(&db).await?;

    let (status, settings) = call(&mut app, get_req("/api/v1/admin/site-settings", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(settings["max_automations_per_user"].as_i64().unwrap() >= 1);

    let (status, body) =
        call(&mut app, json_req("POST", &format!("/api/v1/admin/users/{user_id}/suspend"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "You cannot suspend your own admin account.");
    Ok(())
}

#[tokio::test]
async fn automation_lifecycle() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;

    let (status, created) = call(
        &mut app,
        json_req(
            "POST",
            "/api/v1/automations",
            Some(&token),
            json!({"name": "Rust roles", "target_titles": "Rust Engineer", "locations": "Remote", "daily_limit": 5}),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["status"], "paused");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, resumed) =
        call(&mut app, json_req("POST", &format!("/api/v1/automations/{id}/resume"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumed["status"], "running");

    let (status, run) = call(&mut app, json_req("POST", &format!("/api/v1/automations/{id}/run"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::OK, "{run}");
    assert!(run["message"].is_string());

    let (status, _) = call(
        &mut app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/automations/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())?,
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn dashboard_lists_campaigns_and_toggles_them() -> anyhow::Result<()> {
    let Some((mut app, _db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;

    let (status, stats) = call(&mut app, get_req("/api/v1/dashboard/stats", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK, "{stats}");
    let keys: Vec<&str> = stats.as_array().unwrap().iter().filter_map(|s| s["key"].as_str()).collect();
    assert_eq!(keys, ["applications_today", "this_week", "interviews", "active_automations"]);

    let (_, created) = call(
        &mut app,
        json_req("POST", "/api/v1/automations", Some(&token), json!({"name": "Board", "locations": "Berlin, Remote"})),
    )
    .await?;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, campaigns) = call(&mut app, get_req("/api/v1/dashboard/campaigns", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(campaigns[0]["id"], id.as_str());
    assert_eq!(campaigns[0]["status"], "Paused");
    assert_eq!(campaigns[0]["locations"], json!(["Berlin", "Remote"]));
    assert_eq!(campaigns[0]["dailyLimit"], "25 / day");

    let (status, body) =
        call(&mut app, json_req("POST", &format!("/api/v1/dashboard/campaigns/{id}/resume"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "running", "id": id}));
    let (status, body) =
        call(&mut app, json_req("POST", &format!("/api/v1/dashboard/campaigns/{id}/pause"), Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");

    let (other, _) = register_and_login(&mut app).await?;
    let (status, _) =
        call(&mut app, json_req("POST", &format!("/api/v1/dashboard/campaigns/{id}/pause"), Some(&other), json!({}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, feed) = call(&mut app, get_req("/api/v1/dashboard/activity", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed, json!([]));
    Ok(())
}

#[tokio::test]
async fn automation_cap_is_a_bad_request() -> anyhow::Result<()> {
    let Some((mut app, db)) = db_app().await else { return Ok(()) };
    let (token, _) = register_and_login(&mut app).await?;
    let cap = service::site_settings_service::get_or_create(&db).await?.max_automations_per_user;
    for i in 0..cap {
        let (status, body) =
            call(&mut app, json_req("POST", "/api/v1/automations", Some(&token), json!({"name": format!("Rule {i}")}))).await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }
    let (status, body) = call(&mut app, json_req("POST", "/api/v1/automations", Some(&token), json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["detail"],
        format!("Maximum automations ({cap}) reached. Delete an existing automation to create a new one.")
    );
    Ok(())
}
