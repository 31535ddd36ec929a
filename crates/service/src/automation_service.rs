//! Auto-apply rules: CRUD, pause/resume and "run now".
use uuid::Uuid;
use chrono::{Utc, Timelike, DateTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::automation::{self, AutomationStatus, NewAutomation, DEFAULT_DAILY_LIMIT};
use models::job;
use models::user_job::{self, ApplicationStatus};
use crate::application_service::ApplicationWithJob;
use crate::errors::ServiceError;
use crate::pagination::{Pagination, AUTOMATION_JOBS_DEFAULT_LIMIT, AUTOMATION_JOBS_MAX_LIMIT};

const UNTITLED: &str = "Untitled automation";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationInput {
    pub name: Option<String>,
    pub target_titles: Option<String>,
    pub locations: Option<String>,
    pub daily_limit: Option<i32>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub cover_letter_template: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutomationUpdate {
    pub name: Option<String>,
    pub target_titles: Option<String>,
    pub locations: Option<String>,
    pub daily_limit: Option<i32>,
    pub platforms: Option<Vec<String>>,
    pub cover_letter_template: Option<String>,
    pub status: Option<AutomationStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutomationView {
    #[serde(flatten)]
    pub automation: automation::Model,
    pub applications_today: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub applied_count: u64,
    pub limit_reached: bool,
    pub message: String,
    pub applications_today: u64,
}

/// 00:00 UTC of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Submitted applications driven by the automation since 00:00 UTC.
pub async fn applications_today<C: ConnectionTrait>(db: &C, automation_id: Uuid) -> Result<u64, ServiceError> {
    let since = start_of_day(Utc::now());
    Ok(user_job::Entity::find()
        .filter(user_job::Column::AutomationId.eq(automation_id))
        .filter(user_job::Column::Status.eq(ApplicationStatus::Submitted.as_str()))
        .filter(user_job::Column::AppliedAt.gte(since))
        .count(db)
        .await?)
}

async fn view<C: ConnectionTrait>(db: &C, automation: automation::Model) -> Result<AutomationView, ServiceError> {
    let applications_today = applications_today(db, automation.id).await?;
    Ok(AutomationView { automation, applications_today })
}

async fn owned<C: ConnectionTrait>(db: &C, user_id: Uuid, id: Uuid) -> Result<automation::Model, ServiceError> {
    automation::Entity::find_by_id(id)
        .filter(automation::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("automation"))
}

pub async fn list(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<AutomationView>, ServiceError> {
    let rows = automation::Entity::find()
        .filter(automation::Column::UserId.eq(user_id))
        .order_by_desc(automation::Column::CreatedAt)
        .all(db)
        .await?;
    let mut out = Vec::with_capacity(rows.len());
    for a in rows {
        out.push(view(db, a).await?);
    }
    Ok(out)
}

pub async fn get(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<AutomationView, ServiceError> {
    let a = owned(db, user_id, id).await?;
    view(db, a).await
}

/// New automations start paused; the per-user cap comes from site settings.
#[instrument(skip(db, input))]
pub async fn create(db: &DatabaseConnection, user_id: Uuid, input: AutomationInput) -> Result<AutomationView, ServiceError> {
    let cap = crate::site_settings_service::get_or_create(db).await?.max_automations_per_user;
    let owned_count = automation::Entity::find()
        .filter(automation::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    if owned_count >= cap.max(0) as u64 {
        return Err(ServiceError::Validation(format!(
            "Maximum automations ({cap}) reached. Delete an existing automation to create a new one."
        )));
    }
    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    let am = NewAutomation {
        user_id,
        name,
        target_titles: input.target_titles,
        locations: input.locations,
        daily_limit: input.daily_limit,
        platforms: input.platforms,
        cover_letter_template: input.cover_letter_template,
        status: AutomationStatus::Paused,
        total_applied: 0,
    }
    .into_active_model()?;
    let created = am.insert(db).await?;
    info!(automation_id = %created.id, "automation_created");
    view(db, created).await
}

#[instrument(skip(db, input))]
pub async fn update(db: &DatabaseConnection, user_id: Uuid, id: Uuid, input: AutomationUpdate) -> Result<AutomationView, ServiceError> {
    let existing = owned(db, user_id, id).await?;
    let mut am: automation::ActiveModel = existing.into();
    if let Some(name) = input.name {
        automation::validate_name(&name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(v) = input.target_titles {
        am.target_titles = Set(Some(v));
    }
    if let Some(v) = input.locations {
        am.locations = Set(Some(v));
    }
    if let Some(limit) = input.daily_limit {
        automation::validate_daily_limit(limit)?;
        am.daily_limit = Set(limit);
    }
    if let Some(p) = input.platforms {
        am.platforms = Set(automation::platforms_to_json(&p));
    }
    if let Some(v) = input.cover_letter_template {
        am.cover_letter_template = Set(Some(v));
    }
    if let Some(st) = input.status {
        am.status = Set(st.as_str().to_string());
    }
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    view(db, saved).await
}

#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
    owned(db, user_id, id).await?.delete(db).await?;
    info!(automation_id = %id, "automation_deleted");
    Ok(())
}

#[instrument(skip(db))]
pub async fn set_status(db: &DatabaseConnection, user_id: Uuid, id: Uuid, status: AutomationStatus) -> Result<AutomationView, ServiceError> {
    let mut am: automation::ActiveModel = owned(db, user_id, id).await?.into();
    am.status = Set(status.as_str().to_string());
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    info!(automation_id = %id, status = %status, "automation_status_changed");
    view(db, saved).await
}

pub async fn pause(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<AutomationView, ServiceError> {
    set_status(db, user_id, id, AutomationStatus::Paused).await
}

pub async fn resume(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<AutomationView, ServiceError> {
    set_status(db, user_id, id, AutomationStatus::Running).await
}

/// Free slots left today under `daily_limit`.
pub fn slots_left(applications_today: u64, daily_limit: i32) -> u64 {
    (daily_limit.max(0) as u64).saturating_sub(applications_today)
}

/// Summary shown to the user after a run that applied to `applied` jobs.
pub fn run_message(applied: u64, slots_left: u64, limit_reached: bool) -> String {
    if applied == 0 {
        return "No similar jobs available to apply to.".to_string();
    }
    if applied < slots_left {
        return format!("Applied to {applied} job(s) (only {applied} similar job(s) available).");
    }
    let mut msg = format!("Applied to {applied} job(s).");
    if limit_reached {
        msg.push_str(" Daily limit exceeded.");
    }
    msg
}

/// Apply to matching jobs up to the remaining daily slots, in one transaction.
#[instrument(skip(db))]
pub async fn run(db: &DatabaseConnection, user_id: Uuid, id: Uuid) -> Result<RunResult, ServiceError> {
    let txn = db.begin().await?;
    let auto = owned(&txn, user_id, id).await?;
    let today = applications_today(&txn, auto.id).await?;
    let daily_limit = if auto.daily_limit > 0 { auto.daily_limit } else { DEFAULT_DAILY_LIMIT };
    let slots = slots_left(today, daily_limit);

    if slots == 0 {
        txn.commit().await?;
        return Ok(RunResult {
            applied_count: 0,
            limit_reached: true,
            message: format!("Daily limit exceeded ({today}/{daily_limit})."),
            applications_today: today,
        });
    }

    let matches = crate::job_service::find_matching_jobs(
        &txn,
        user_id,
        &auto.title_keywords(),
        &auto.location_terms(),
        slots,
    )
    .await?;
    let job_ids: Vec<Uuid> = matches.iter().map(|j| j.id).collect();
    let applied = if job_ids.is_empty() {
        0
    } else {
        crate::application_service::apply_to_jobs(&txn, user_id, &job_ids, auto.id).await?.len() as u64
    };

    if applied > 0 {
        let total = auto.total_applied;
        let mut am: automation::ActiveModel = auto.into();
        am.total_applied = Set(total + applied as i32);
        am.updated_at = Set(Utc::now().into());
        am.update(&txn).await?;
    }
    txn.commit().await?;

    let applications_today = today + applied;
    let limit_reached = applied > 0 && applications_today >= daily_limit as u64;
    info!(automation_id = %id, applied, applications_today, limit_reached, "automation_run");
    Ok(RunResult {
        applied_count: applied,
        limit_reached,
        message: run_message(applied, slots, limit_reached),
        applications_today,
    })
}

/// Applications created by this automation, newest first.
pub async fn list_jobs(db: &DatabaseConnection, user_id: Uuid, id: Uuid, page: Pagination) -> Result<Vec<ApplicationWithJob>, ServiceError> {
    owned(db, user_id, id).await?;
    let (skip, limit) = page.normalize(AUTOMATION_JOBS_DEFAULT_LIMIT, AUTOMATION_JOBS_MAX_LIMIT);
    let rows = user_job::Entity::find()
        .find_also_related(job::Entity)
        .filter(user_job::Column::UserId.eq(user_id))
        .filter(user_job::Column::AutomationId.eq(id))
        .order_by_desc(user_job::Column::AppliedAt)
        .order_by_desc(user_job::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ApplicationWithJob::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_job, make_user};

    #[test]
    fn messages_cover_each_outcome() {
        assert_eq!(run_message(0, 5, false), "No similar jobs available to apply to.");
        assert_eq!(run_message(2, 5, false), "Applied to 2 job(s) (only 2 similar job(s) available).");
        assert_eq!(run_message(5, 5, true), "Applied to 5 job(s). Daily limit exceeded.");
        assert_eq!(run_message(5, 5, false), "Applied to 5 job(s).");
    }

    #[test]
    fn slots_never_underflow() {
        assert_eq!(slots_left(3, 25), 22);
        assert_eq!(slots_left(30, 25), 0);
        assert_eq!(slots_left(0, 0), 0);
    }

    #[test]
    fn day_starts_at_midnight() {
        let t = start_of_day(Utc::now());
        assert_eq!((t.hour(), t.minute(), t.second(), t.nanosecond()), (0, 0, 0, 0));
    }

    #[tokio::test]
    async fn run_applies_until_limit() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, None).await?;
        let marker = Uuid::new_v4().simple().to_string();
        for _ in 0..3 {
            make_job(&db, &format!("Auto {marker} Dev"), "Lisbon").await?;
        }

        let input = AutomationInput {
            name: None,
            target_titles: Some(format!(" {marker} , nothing-else")),
            locations: Some("lisbon".into()),
            daily_limit: Some(2),
            ..Default::default()
        };
        let created = create(&db, u.id, input).await?;
        assert_eq!(created.automation.name, "Untitled automation");
        assert_eq!(created.automation.status, "paused");
        assert_eq!(created.applications_today, 0);

        let first = run(&db, u.id, created.automation.id).await?;
        assert_eq!(first.applied_count, 2);
        assert!(first.limit_reached);
        assert_eq!(first.message, "Applied to 2 job(s). Daily limit exceeded.");

        let second = run(&db, u.id, created.automation.id).await?;
        assert_eq!(second.applied_count, 0);
        assert_eq!(second.message, "Daily limit exceeded (2/2).");

        let bumped = update(&db, u.id, created.automation.id, AutomationUpdate { daily_limit: Some(10), ..Default::default() }).await?;
        assert_eq!(bumped.automation.total_applied, 2);
        let third = run(&db, u.id, created.automation.id).await?;
        assert_eq!(third.applied_count, 1);
        assert_eq!(third.message, "Applied to 1 job(s) (only 1 similar job(s) available).");

        let jobs = list_jobs(&db, u.id, created.automation.id, Pagination::default()).await?;
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|a| a.application.status == "submitted"));

        let resumed = resume(&db, u.id, created.automation.id).await?;
        assert_eq!(resumed.automation.status, "running");
        assert_eq!(resumed.applications_today, 3);

        let other = make_user(&db, None).await?;
        assert!(matches!(get(&db, other.id, created.automation.id).await, Err(ServiceError::NotFound(_))));
        delete(&db, u.id, created.automation.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_stops_at_site_cap() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = make_user(&db, None).await?;
        let cap = crate::site_settings_service::get_or_create(&db).await?.max_automations_per_user;
        for i in 0..cap {
            create(&db, u.id, AutomationInput { name: Some(format!("Rule {i}")), ..Default::default() }).await?;
        }
        match create(&db, u.id, AutomationInput::default()).await {
            Err(ServiceError::Validation(msg)) => assert_eq!(
                msg,
                format!("Maximum automations ({cap}) reached. Delete an existing automation to create a new one.")
            ),
            other => panic!("expected the cap to be enforced, got {other:?}"),
        }
        assert_eq!(list(&db, u.id).await?.len() as i32, cap);

        // deleting one frees a slot
        let first = list(&db, u.id).await?.remove(0);
        delete(&db, u.id, first.automation.id).await?;
        create(&db, u.id, AutomationInput::default()).await?;
        Ok(())
    }
}
