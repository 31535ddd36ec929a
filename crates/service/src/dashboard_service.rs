//! Dashboard aggregates for the signed-in user: stat cards, campaigns and recent activity.
use uuid::Uuid;
use chrono::{DateTime, Datelike, Duration, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::instrument;

use models::automation::{self, AutomationStatus};
use models::job;
use models::user_job::{self, ApplicationStatus};
use crate::automation_service::{applications_today, start_of_day};
use crate::errors::ServiceError;

pub const ACTIVITY_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStat {
    pub label: String,
    pub value: String,
    pub change: String,
    pub key: String,
}

impl DashboardStat {
    fn new(key: &str, label: &str, value: u64, change: &str) -> Self {
        Self { label: label.into(), value: value.to_string(), change: change.into(), key: key.into() }
    }
}

/// An automation as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCampaign {
    pub id: Uuid,
    pub name: String,
    pub target_title: String,
    pub locations: Vec<String>,
    pub daily_limit: String,
    pub platforms: Vec<String>,
    /// `Running` or `Paused`.
    pub status: String,
    pub applications_today: u64,
    pub daily_limit_number: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub id: Uuid,
    pub time: String,
    pub title: String,
    pub description: String,
}

/// Monday 00:00 UTC of the week containing `now`.
fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = start_of_day(now);
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

/// "Just now", "5 min ago", "3 hr ago", "2 days ago", then "Mar 04".
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now - at;
    if delta < Duration::minutes(1) {
        return "Just now".into();
    }
    if delta < Duration::hours(1) {
        return format!("{} min ago", delta.num_minutes());
    }
    if delta < Duration::days(1) {
        return format!("{} hr ago", delta.num_hours());
    }
    if delta < Duration::days(7) {
        let d = delta.num_days();
        return format!("{d} day{} ago", if d == 1 { "" } else { "s" });
    }
    at.format("%b %d").to_string()
}

/// Title and description of an activity entry for a row in `status`.
pub fn describe(status: &str, job: Option<&job::Model>) -> (String, String) {
    let job_title = job.map(|j| j.title.trim()).filter(|t| !t.is_empty()).unwrap_or("Job");
    let company = job.map(|j| j.company.trim()).unwrap_or_default();
    let target = if company.is_empty() { job_title.to_string() } else { format!("{job_title} @ {company}") };
    match status.parse::<ApplicationStatus>() {
        Ok(ApplicationStatus::Interview) => ("Interview scheduled".into(), target),
        Ok(ApplicationStatus::Submitted) => {
            let description = if company.is_empty() { "Application submitted".to_string() } else { company.to_string() };
            (format!("Applied to {job_title}"), description)
        }
        Ok(ApplicationStatus::Rejected) => ("Application update".into(), format!("{target} - not moving forward")),
        _ => ("Application update".into(), target),
    }
}

/// Applications today and this week, interviews in the last 14 days, running automations.
#[instrument(skip(db))]
pub async fn stats(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<DashboardStat>, ServiceError> {
    let today = start_of_day(Utc::now());
    let week = start_of_week(Utc::now());
    let fortnight = today - Duration::days(14);

    let mine = || user_job::Entity::find().filter(user_job::Column::UserId.eq(user_id));
    let submitted = ApplicationStatus::Submitted.as_str();
    let applied_today = mine()
        .filter(user_job::Column::Status.eq(submitted))
        .filter(user_job::Column::AppliedAt.gte(today))
        .count(db)
        .await?;
    let applied_this_week = mine()
        .filter(user_job::Column::Status.eq(submitted))
        .filter(user_job::Column::AppliedAt.gte(week))
        .count(db)
        .await?;
    let interviews = mine()
        .filter(user_job::Column::Status.eq(ApplicationStatus::Interview.as_str()))
        .filter(user_job::Column::UpdatedAt.gte(fortnight))
        .count(db)
        .await?;
    let running = automation::Entity::find()
        .filter(automation::Column::UserId.eq(user_id))
        .filter(automation::Column::Status.eq(AutomationStatus::Running.as_str()))
        .count(db)
        .await?;

    Ok(vec![
        DashboardStat::new("applications_today", "Applications today", applied_today, "+0 vs yesterday"),
        DashboardStat::new("this_week", "This week", applied_this_week, "Last 7 days"),
        DashboardStat::new("interviews", "Interviews booked", interviews, "Last 14 days"),
        DashboardStat::new("active_automations", "Active automations", running, "Across job boards"),
    ])
}

/// Every automation of the user, newest first.
#[instrument(skip(db))]
pub async fn campaigns(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<DashboardCampaign>, ServiceError> {
    let rows = automation::Entity::find()
        .filter(automation::Column::UserId.eq(user_id))
        .order_by_desc(automation::Column::CreatedAt)
        .all(db)
        .await?;
    let mut out = Vec::with_capacity(rows.len());
    for a in rows {
        let status = match a.status.parse::<AutomationStatus>() {
            Ok(AutomationStatus::Running) => "Running",
            _ => "Paused",
        };
        let target_title = a.target_titles.clone().filter(|t| !t.trim().is_empty()).unwrap_or_else(|| "-".into());
        let locations = a
            .locations
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        out.push(DashboardCampaign {
            id: a.id,
            target_title,
            locations,
            daily_limit: format!("{} / day", a.daily_limit),
            platforms: a.platform_list(),
            status: status.into(),
            applications_today: applications_today(db, a.id).await?,
            daily_limit_number: a.daily_limit,
            name: a.name,
        });
    }
    Ok(out)
}

/// Most recently touched applications, described for a feed.
#[instrument(skip(db))]
pub async fn activity(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<ActivityItem>, ServiceError> {
    let rows = user_job::Entity::find()
        .find_also_related(job::Entity)
        .filter(user_job::Column::UserId.eq(user_id))
        .order_by_desc(user_job::Column::UpdatedAt)
        .limit(ACTIVITY_LIMIT)
        .all(db)
        .await?;
    let now = Utc::now();
    Ok(rows
        .into_iter()
        .map(|(uj, job)| {
            let (title, description) = describe(&uj.status, job.as_ref());
            ActivityItem { id: uj.id, time: relative_time(uj.updated_at.into(), now), title, description }
        })
        .collect())
}
