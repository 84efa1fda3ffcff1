//! review-cycles-refresh
//!
//! Runs the date-driven status refresh for every configured project. Meant
//! to be scheduled nightly; safe to re-run.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use review_cycles::adapters::{PostgresReviewRepository, SystemClock};
use review_cycles::application::{
    UpdateStatusesByDateCommand, UpdateStatusesByDateError, UpdateStatusesByDateHandler,
};
use review_cycles::config::{AppConfig, JobConfig, ValidationError};
use review_cycles::domain::foundation::ProjectId;

#[derive(Debug, Error)]
enum JobError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("{failed} of {total} projects failed to refresh")]
    Refresh { failed: usize, total: usize },
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("review-cycles-refresh: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.job);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "refresh job failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(job: &JobConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&job.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if job.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(config: &AppConfig) -> Result<(), JobError> {
    config.validate()?;
    let project_ids = config.job.project_ids()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("migrations applied");
    }

    let handler = UpdateStatusesByDateHandler::new(
        Arc::new(PostgresReviewRepository::new(pool)),
        Arc::new(SystemClock),
    );

    let total = project_ids.len();
    let mut failed = 0;
    for project_id in project_ids {
        if let Err(e) = refresh(&handler, project_id, config.job.respect_overrides).await {
            warn!(project_id = %project_id, error = %e, "project refresh failed");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(JobError::Refresh { failed, total });
    }
    info!(projects = total, "refresh complete");
    Ok(())
}

async fn refresh(
    handler: &UpdateStatusesByDateHandler,
    project_id: ProjectId,
    respect_overrides: bool,
) -> Result<(), UpdateStatusesByDateError> {
    let counts = handler
        .handle(UpdateStatusesByDateCommand {
            project_id,
            respect_overrides,
        })
        .await?;
    info!(
        project_id = %project_id,
        updated = counts.updated_count,
        skipped = counts.skipped_count,
        "project refreshed"
    );
    Ok(())
}
