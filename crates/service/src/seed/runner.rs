use std::collections::{HashMap, HashSet};

use uuid::Uuid;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{info, instrument};

use models::{automation, job, profile, user, user_job, user_setup};
use models::automation::AutomationStatus;
use models::user_job::ApplicationStatus;
use crate::auth::password::hash_password;
use crate::errors::ServiceError;
use super::data::{self, AUTOMATION_TEMPLATES, USER_ROWS};

const CHUNK: usize = 500;
const MAX_USER_JOBS: usize = 800;
const USER_JOBS_PER_USER: usize = 50;

#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    pub reset: bool,
    pub job_count: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self { reset: false, job_count: 250 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub profiles: usize,
    pub jobs: usize,
    pub user_setups: usize,
    pub automations: usize,
    pub user_jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Users were already present and no reset was requested.
    Skipped,
    Seeded(SeedReport),
}

async fn insert_chunked<C, A>(db: &C, rows: Vec<A>) -> Result<usize, ServiceError>
where
    C: ConnectionTrait,
    A: sea_orm::ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: sea_orm::IntoActiveModel<A>,
{
    let total = rows.len();
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows.by_ref().take(CHUNK).collect();
        A::Entity::insert_many(chunk).exec_without_returning(db).await?;
    }
    Ok(total)
}

async fn clear<C: ConnectionTrait>(db: &C) -> Result<(), ServiceError> {
    user_job::Entity::delete_many().exec(db).await?;
    automation::Entity::delete_many().exec(db).await?;
    user_setup::Entity::delete_many().exec(db).await?;
    profile::Entity::delete_many().exec(db).await?;
    job::Entity::delete_many().exec(db).await?;
    user::Entity::delete_many().exec(db).await?;
    info!("seed_tables_cleared");
    Ok(())
}

#[derive(Debug, Clone)]
struct SeededUser {
    id: Uuid,
    row: data::UserRow,
}

fn user_models(hash: &str, now: DateTimeWithTimeZone) -> (Vec<SeededUser>, Vec<user::ActiveModel>) {
    USER_ROWS
        .iter()
        .map(|row| {
            let id = Uuid::new_v4();
            let am = user::ActiveModel {
                id: Set(id),
                email: Set(row.email.to_string()),
                hashed_password: Set(hash.to_string()),
                full_name: Set(Some(row.full_name.to_string())),
                username: Set(Some(row.username.to_string())),
                email_verified: Set(false),
                password_changed_at: Set(Some(now)),
                two_factor_enabled: Set(false),
                is_active: Set(true),
                is_superuser: Set(row.is_superuser),
                created_at: Set(now),
                updated_at: Set(now),
            };
            (SeededUser { id, row: *row }, am)
        })
        .unzip()
}

fn profile_model(u: &SeededUser) -> profile::ActiveModel {
    let mut am = profile::new_for_user(u.id, Some(u.row.full_name));
    am.headline = Set(Some(data::headline_for(u.row.email)));
    am.primary_location = Set(Some("Remote".to_string()));
    am.years_experience = Set(Some("5+".to_string()));
    am.top_skills = Set(Some("Python, JavaScript, React, SQL".to_string()));
    am
}

/// Every third user (starting with the first) is left incomplete.
fn setup_model(index: usize, u: &SeededUser) -> user_setup::ActiveModel {
    let complete = index % 3 != 0;
    let when = |v: String| complete.then_some(v);
    let mut am = user_setup::new_for_user(u.id);
    am.full_name = Set(Some(u.row.full_name.to_string()));
    am.email = Set(Some(u.row.email.to_string()));
    am.phone = Set(when("+1 555 000 0000".to_string()));
    am.location = Set(when("Remote".to_string()));
    am.linkedin_url = Set(when(format!("https://linkedin.com/in/{}", u.row.username)));
    am.years_experience = Set(when("5".to_string()));
    am.top_skills = Set(when("Python, React, SQL".to_string()));
    am.setup_complete = Set(complete);
    am
}

fn job_model(row: data::JobRow, now: DateTimeWithTimeZone) -> job::ActiveModel {
    job::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(row.title),
        company: Set(row.company),
        location: Set(Some(row.location)),
        description: Set(Some(row.description)),
        job_url: Set(Some(row.job_url)),
        salary_range: Set(row.salary_range),
        job_type: Set(Some(row.job_type)),
        source: Set(Some(row.source)),
        external_id: Set(Some(row.external_id)),
        status: Set(row.status),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// `(user index, template index)` pairs that receive an automation.
pub fn automation_plan(regular_users: usize, total_users: usize) -> Vec<(usize, usize)> {
    let take = regular_users.min(total_users.saturating_sub(2).max(1));
    (0..take)
        .flat_map(|i| (0..AUTOMATION_TEMPLATES.len()).map(move |j| (i, j)))
        .filter(|(i, j)| (i + j) % 4 == 0)
        .collect()
}

pub fn user_job_target(regular_users: usize) -> usize {
    MAX_USER_JOBS.min(regular_users * USER_JOBS_PER_USER)
}

/// Random unique `(user, job)` pairs; half of them point at one of the user's automations.
fn user_job_models(
    rng: &mut StdRng,
    users: &[Uuid],
    jobs: &[Uuid],
    autos_by_user: &HashMap<Uuid, Vec<Uuid>>,
) -> Vec<user_job::ActiveModel> {
    let target = user_job_target(users.len());
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(target);
    let mut attempts = 0;
    while seen.len() < target && attempts < target * 3 {
        attempts += 1;
        let (Some(&u), Some(&j)) = (users.choose(rng), jobs.choose(rng)) else { break };
        if !seen.insert((u, j)) {
            continue;
        }
        let automation_id = match autos_by_user.get(&u) {
            Some(autos) if rng.gen_bool(0.5) => autos.choose(rng).copied(),
            _ => None,
        };
        let status = ApplicationStatus::ALL.choose(rng).copied().unwrap_or(ApplicationStatus::Saved);
        out.push(user_job::new_active(u, j, status, automation_id));
    }
    out
}

/// Seed every table inside a single transaction.
#[instrument(skip(db))]
pub async fn run<C>(db: &C, opts: SeedOptions) -> Result<SeedOutcome, ServiceError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    if opts.reset {
        clear(&txn).await?;
    }
    if user::Entity::find().count(&txn).await? > 0 {
        info!("database already has users; pass --reset to clear and re-seed");
        txn.rollback().await?;
        return Ok(SeedOutcome::Skipped);
    }

    let mut report = SeedReport::default();
    let mut rng = StdRng::seed_from_u64(data::RNG_SEED);
    let now: DateTimeWithTimeZone = Utc::now().into();
    let hash = hash_password(data::SEED_PASSWORD).map_err(|e| ServiceError::Internal(e.to_string()))?;

    let (users, user_rows) = user_models(&hash, now);
    report.users = insert_chunked(&txn, user_rows).await?;
    info!(count = report.users, "seeded_users");

    report.profiles = insert_chunked(&txn, users.iter().map(profile_model).collect()).await?;
    info!(count = report.profiles, "seeded_profiles");

    let mut job_ids: Vec<Uuid> = job::Entity::find()
        .select_only()
        .column(job::Column::Id)
        .into_tuple()
        .all(&txn)
        .await?;
    if job_ids.is_empty() {
        let rows: Vec<job::ActiveModel> = data::build_job_rows(&mut rng, opts.job_count)
            .into_iter()
            .map(|r| job_model(r, now))
            .collect();
        job_ids = rows.iter().filter_map(|am| am.id.clone().take()).collect();
        report.jobs = insert_chunked(&txn, rows).await?;
        info!(count = report.jobs, "seeded_jobs");
    }

    let setups = users.iter().enumerate().map(|(i, u)| setup_model(i, u)).collect();
    report.user_setups = insert_chunked(&txn, setups).await?;
    info!(count = report.user_setups, "seeded_user_setups");

    let regular: Vec<&SeededUser> = users.iter().filter(|u| !u.row.is_superuser).collect();
    let mut autos_by_user: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut automations = Vec::new();
    for (i, j) in automation_plan(regular.len(), users.len()) {
        let tmpl = &AUTOMATION_TEMPLATES[j];
        let am = automation::NewAutomation {
            user_id: regular[i].id,
            name: tmpl.name.to_string(),
            target_titles: Some(tmpl.target_titles.to_string()),
            locations: Some(tmpl.locations.to_string()),
            daily_limit: Some(tmpl.daily_limit),
            platforms: tmpl.platforms.iter().map(|p| p.to_string()).collect(),
            cover_letter_template: None,
            status: if j % 2 == 0 { AutomationStatus::Running } else { AutomationStatus::Paused },
            total_applied: ((i + j) * 3) as i32,
        }
        .into_active_model()?;
        if let Some(id) = am.id.clone().take() {
            autos_by_user.entry(regular[i].id).or_default().push(id);
        }
        automations.push(am);
    }
    report.automations = insert_chunked(&txn, automations).await?;
    info!(count = report.automations, "seeded_automations");

    let regular_ids: Vec<Uuid> = regular.iter().map(|u| u.id).collect();
    let user_jobs = user_job_models(&mut rng, &regular_ids, &job_ids, &autos_by_user);
    report.user_jobs = insert_chunked(&txn, user_jobs).await?;
    info!(count = report.user_jobs, "seeded_user_jobs");

    txn.commit().await?;
    info!(?report, "seed_complete");
    Ok(SeedOutcome::Seeded(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ColumnTrait, QueryFilter};

    #[test]
    fn automation_plan_matches_modulo_rule() {
        let plan = automation_plan(48, 50);
        assert!(plan.iter().all(|(i, j)| (i + j) % 4 == 0));
        // 48 users x 8 templates, every fourth pair
        assert_eq!(plan.len(), 48 * 8 / 4);
        assert_eq!(plan[0], (0, 0));
        assert_eq!(automation_plan(3, 3), vec![(0, 0), (0, 4)]);
    }

    #[test]
    fn user_job_target_is_capped() {
        assert_eq!(user_job_target(48), 800);
        assert_eq!(user_job_target(3), 150);
        assert_eq!(user_job_target(0), 0);
    }

    #[test]
    fn generated_user_jobs_are_unique_pairs() {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let jobs: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        let autos = HashMap::from([(users[0], vec![Uuid::new_v4()])]);
        let mut rng = StdRng::seed_from_u64(data::RNG_SEED);
        let rows = user_job_models(&mut rng, &users, &jobs, &autos);
        // only 40 distinct pairs exist; the attempt cap bounds the loop
        assert!(rows.len() <= 40 && !rows.is_empty());
        let pairs: HashSet<_> = rows
            .iter()
            .map(|r| (r.user_id.clone().unwrap(), r.job_id.clone().unwrap()))
            .collect();
        assert_eq!(pairs.len(), rows.len());
        for r in &rows {
            if let Some(a) = r.automation_id.clone().unwrap() {
                assert_eq!(r.user_id.clone().unwrap(), users[0]);
                assert_eq!(autos[&users[0]], vec![a]);
            }
        }
    }

    #[test]
    fn incomplete_every_third_setup() {
        let u = SeededUser { id: Uuid::new_v4(), row: USER_ROWS[2] };
        let first = setup_model(0, &u);
        assert_eq!(first.setup_complete.clone().unwrap(), false);
        assert_eq!(first.phone.clone().unwrap(), None);
        let second = setup_model(1, &u);
        assert_eq!(second.setup_complete.clone().unwrap(), true);
        assert_eq!(second.linkedin_url.clone().unwrap().as_deref(), Some("https://linkedin.com/in/alice_s"));
    }

    #[tokio::test]
    async fn seeding_skips_when_users_exist() -> Result<(), anyhow::Error> {
        let Some(db) = crate::test_support::get_db().await else { return Ok(()) };
        crate::test_support::make_user(&db, None).await?;
        assert_eq!(run(&db, SeedOptions::default()).await?, SeedOutcome::Skipped);
        Ok(())
    }

    #[tokio::test]
    async fn reset_seeds_every_table() -> Result<(), anyhow::Error> {
        let Some(db) = crate::test_support::get_db().await else { return Ok(()) };
        // outer transaction keeps the reset invisible to other tests
        let outer = db.begin().await?;
        let outcome = run(&outer, SeedOptions { reset: true, job_count: 250 }).await?;
        let report = match outcome {
            SeedOutcome::Seeded(r) => r,
            other => panic!("expected a seeded report, got {other:?}"),
        };
        assert_eq!(report.users, USER_ROWS.len());
        assert_eq!(report.profiles, USER_ROWS.len());
        assert_eq!(report.user_setups, USER_ROWS.len());
        assert!(report.jobs > 0 && report.jobs <= 250, "{report:?}");
        assert_eq!(report.automations, 96);
        assert_eq!(report.user_jobs, 800);

        assert_eq!(user::Entity::find().count(&outer).await?, report.users as u64);
        assert_eq!(job::Entity::find().count(&outer).await?, report.jobs as u64);
        assert_eq!(user_job::Entity::find().count(&outer).await?, report.user_jobs as u64);

        // automation-driven applications belong to the automation's owner
        let linked = user_job::Entity::find()
            .find_also_related(automation::Entity)
            .all(&outer)
            .await?;
        for (uj, auto) in linked {
            if let Some(a) = auto {
                assert_eq!(a.user_id, uj.user_id);
            }
        }

        let superusers = user::Entity::find()
            .filter(user::Column::IsSuperuser.eq(true))
            .count(&outer)
            .await?;
        assert_eq!(superusers, 2);

        assert_eq!(run(&outer, SeedOptions::default()).await?, SeedOutcome::Skipped);
        outer.rollback().await?;
        Ok(())
    }
}
