use clap::Parser;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::seed::{self, SeedOptions, SeedOutcome};
use tracing::{error, info};

/// Populate the database with demo users, jobs, automations and applications.
#[derive(Debug, Parser)]
#[command(name = "seed", version, about)]
struct Cli {
    /// Delete existing seeded tables before inserting.
    #[arg(long)]
    reset: bool,

    /// Number of jobs to generate when the jobs table is empty.
    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(1..))]
    job_count: u64,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_and_validate()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let opts = SeedOptions { reset: cli.reset, job_count: cli.job_count as usize };
    match seed::run(&db, opts).await? {
        SeedOutcome::Skipped => {
            info!(service = "seed", event = "skipped", "users already present; nothing changed");
        }
        SeedOutcome::Seeded(report) => {
            info!(
                service = "seed",
                event = "done",
                users = report.users,
                profiles = report.profiles,
                jobs = report.jobs,
                user_setups = report.user_setups,
                automations = report.automations,
                user_jobs = report.user_jobs,
                "seed complete"
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_default();
    let cli = Cli::parse();
    info!(service = "seed", event = "start", reset = cli.reset, job_count = cli.job_count, "seeding database");

    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "seed", event = "failed", error = %e, "seed failed");
            std::process::ExitCode::FAILURE
        }
    }
}
