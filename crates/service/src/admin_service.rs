//! Superuser moderation of users and job postings.
use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::job::{self, JobStatus};
use models::user;
use crate::errors::ServiceError;
use crate::query::{icontains, non_blank};

#[derive(Debug, Clone, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub status: &'static str,
    /// Sign-up date, `YYYY-MM-DD`.
    pub joined: String,
}

impl From<&user::Model> for AdminUserView {
    fn from(u: &user::Model) -> Self {
        let name = u
            .full_name
            .clone()
            .or_else(|| u.username.clone())
            .unwrap_or_else(|| u.email.split('@').next().unwrap_or_default().to_string());
        Self {
            id: u.id,
            name,
            email: u.email.clone(),
            role: if u.is_superuser { "admin" } else { "user" },
            status: if u.is_active { "active" } else { "suspended" },
            joined: u.created_at.date_naive().to_string(),
        }
    }
}

/// Fields an admin may change on a posting; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub job_url: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub source: Option<String>,
    pub status: Option<JobStatus>,
}

/// `status` is `active` or `suspended`; other values do not filter.
#[instrument(skip(db))]
pub async fn list_users(db: &DatabaseConnection, search: Option<&str>, status: Option<&str>) -> Result<Vec<AdminUserView>, ServiceError> {
    let mut q = user::Entity::find();
    if let Some(s) = non_blank(search) {
        q = q.filter(
            Condition::any()
                .add(icontains((user::Entity, user::Column::Email), s))
                .add(
                    Condition::all()
                        .add(user::Column::FullName.is_not_null())
                        .add(icontains((user::Entity, user::Column::FullName), s)),
                ),
        );
    }
    match status {
        Some("active") => q = q.filter(user::Column::IsActive.eq(true)),
        Some("suspended") => q = q.filter(user::Column::IsActive.eq(false)),
        _ => {}
    }
    let users = q.order_by_desc(user::Column::CreatedAt).all(db).await?;
    Ok(users.iter().map(AdminUserView::from).collect())
}

async fn set_active(db: &DatabaseConnection, user_id: Uuid, active: bool) -> Result<(), ServiceError> {
    let found = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found.".into()))?;
    let mut am: user::ActiveModel = found.into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await?;
    info!(user_id = %user_id, active, "user_activation_changed");
    Ok(())
}

#[instrument(skip(db))]
pub async fn suspend_user(db: &DatabaseConnection, admin_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
    if admin_id == user_id {
        return Err(ServiceError::Validation("You cannot suspend your own admin account.".into()));
    }
    set_active(db, user_id, false).await
}

#[instrument(skip(db))]
pub async fn activate_user(db: &DatabaseConnection, user_id: Uuid) -> Result<(), ServiceError> {
    set_active(db, user_id, true).await
}

/// Every posting regardless of status, newest first; `search` matches title or company.
#[instrument(skip(db))]
pub async fn list_jobs(db: &DatabaseConnection, search: Option<&str>, status: Option<&str>) -> Result<Vec<job::Model>, ServiceError> {
    let mut q = job::Entity::find();
    if let Some(s) = non_blank(search) {
        q = q.filter(
            Condition::any()
                .add(icontains((job::Entity, job::Column::Title), s))
                .add(icontains((job::Entity, job::Column::Company), s)),
        );
    }
    if let Some(st) = status.and_then(|s| s.parse::<JobStatus>().ok()) {
        q = q.filter(job::Column::Status.eq(st.as_str()));
    }
    Ok(q.order_by_desc(job::Column::CreatedAt).all(db).await?)
}

fn job_not_found() -> ServiceError {
    ServiceError::NotFound("Job not found.".into())
}

#[instrument(skip(db, input))]
pub async fn update_job(db: &DatabaseConnection, id: Uuid, input: JobUpdate) -> Result<job::Model, ServiceError> {
    let found = job::Entity::find_by_id(id).one(db).await?.ok_or_else(job_not_found)?;
    let mut am: job::ActiveModel = found.into();
    if let Some(v) = input.title {
        if v.trim().is_empty() {
            return Err(ServiceError::Validation("title required".into()));
        }
        am.title = Set(v.trim().to_string());
    }
    if let Some(v) = input.company {
        if v.trim().is_empty() {
            return Err(ServiceError::Validation("company required".into()));
        }
        am.company = Set(v.trim().to_string());
    }
    if let Some(v) = input.location {
        am.location = Set(Some(v));
    }
    if let Some(v) = input.description {
        am.description = Set(Some(v));
    }
    if let Some(v) = input.job_url {
        if !(v.is_empty() || v.starts_with("http://") || v.starts_with("https://")) {
            return Err(ServiceError::Validation("job_url must start with http(s)".into()));
        }
        am.job_url = Set(Some(v));
    }
    if let Some(v) = input.salary_range {
        am.salary_range = Set(Some(v));
    }
    if let Some(v) = input.job_type {
        am.job_type = Set(Some(v));
    }
    if let Some(v) = input.source {
        am.source = Set(Some(v));
    }
    if let Some(st) = input.status {
        am.status = Set(st.as_str().to_string());
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[instrument(skip(db))]
pub async fn set_job_status(db: &DatabaseConnection, id: Uuid, status: JobStatus) -> Result<(), ServiceError> {
    update_job(db, id, JobUpdate { status: Some(status), ..Default::default() }).await?;
    info!(job_id = %id, status = %status, "job_moderated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, make_user};

    #[test]
    fn admin_view_falls_back_to_email_local_part() {
        let now = Utc::now().into();
        let u = user::Model {
            id: Uuid::new_v4(),
            email: "jane.doe@example.com".into(),
            hashed_password: String::new(),
            full_name: None,
            username: None,
            email_verified: false,
            password_changed_at: None,
            two_factor_enabled: false,
            is_active: false,
            is_superuser: true,
            created_at: now,
            updated_at: now,
        };
        let v = AdminUserView::from(&u);
        assert_eq!(v.name, "jane.doe");
        assert_eq!(v.role, "admin");
        assert_eq!(v.status, "suspended");
        assert_eq!(v.joined.len(), 10);
    }

    #[tokio::test]
    async fn suspend_and_moderate() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let admin = make_user(&db, Some("Admin")).await?;
        let target = make_user(&db, Some("Target Person")).await?;

        let own = suspend_user(&db, admin.id, admin.id).await.unwrap_err();
        assert_eq!(own.to_string(), "validation error: You cannot suspend your own admin account.");
        assert!(matches!(suspend_user(&db, admin.id, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));

        suspend_user(&db, admin.id, target.id).await?;
        let suspended = list_users(&db, Some(&target.email), Some("suspended")).await?;
        assert_eq!(suspended.len(), 1);
        activate_user(&db, target.id).await?;
        assert!(list_users(&db, Some(&target.email), Some("suspended")).await?.is_empty());

        let marker = Uuid::new_v4().simple().to_string();
        let posted = job::create(&db, job::NewJob { title: format!("Mod {marker}"), company: "Acme".into(), ..Default::default() }).await?;
        set_job_status(&db, posted.id, JobStatus::Approved).await?;
        let approved = list_jobs(&db, Some(&marker), Some("approved")).await?;
        assert_eq!(approved.len(), 1);
        set_job_status(&db, posted.id, JobStatus::Rejected).await?;
        assert!(list_jobs(&db, Some(&marker), Some("approved")).await?.is_empty());
        assert!(matches!(set_job_status(&db, Uuid::new_v4(), JobStatus::Approved).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
