use anyhow::Result;
use application::usecases::reconciliation::ReconciliationUseCase;
use domain::repositories::{
    audit_logs::AuditLogRepository, job::JobRepository, reconciliation::ReconciliationRepository,
    subscriptions::SubscriptionRepository,
};
use infra::db::{
    postgres::postgres_connection,
    repositories::{
        audit_logs::AuditLogPostgres, job::JobPostgres, reconciliation::ReconciliationPostgres,
        subscriptions::SubscriptionPostgres,
    },
};
use std::sync::Arc;
use tracing::{error, info};
use worker::{config, services};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let job_repository: Arc<dyn JobRepository + Send + Sync> =
        Arc::new(JobPostgres::new(Arc::clone(&db_pool_arc)));

    let reconciliation_repository: Arc<dyn ReconciliationRepository + Send + Sync> =
        Arc::new(ReconciliationPostgres::new(Arc::clone(&db_pool_arc)));

    let audit_log_repository: Arc<dyn AuditLogRepository + Send + Sync> =
        Arc::new(AuditLogPostgres::new(Arc::clone(&db_pool_arc)));

    let subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync> =
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool_arc)));

    let reconciliation_use_case = Arc::new(ReconciliationUseCase::new(
        reconciliation_repository,
        audit_log_repository,
    ));

    let callback_loop = tokio::spawn(services::callback_worker::run(
        job_repository,
        reconciliation_use_case,
        dotenvy_env.worker.clone(),
    ));

    let sweep_loop = tokio::spawn(services::expiry_sweep::run(
        subscription_repository,
        dotenvy_env.worker.sweep_interval_secs,
    ));

    tokio::select! {
        result = callback_loop => result??,
        result = sweep_loop => result??,
    };

    Ok(())
}
