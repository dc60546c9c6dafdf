use std::{sync::Arc, time::Duration};

use anyhow::Result;
use application::usecases::reconciliation::ReconciliationUseCase;
use domain::{entities::jobs::JobEntity, repositories::job::JobRepository};
use tracing::{error, info, warn};

use crate::config::config_model::Worker;

/// Drains the payment callback queue. One job at a time per worker; the
/// row-level queue lock makes concurrent workers safe.
pub async fn run(
    job_repository: Arc<dyn JobRepository + Send + Sync>,
    reconciliation_use_case: Arc<ReconciliationUseCase>,
    worker_config: Worker,
) -> Result<()> {
    info!(
        poll_interval_secs = worker_config.poll_interval_secs,
        max_attempts = worker_config.max_attempts,
        "callback worker started"
    );

    loop {
        let job = match job_repository.lock_next_payment_callback_job().await {
            Ok(job) => job,
            Err(err) => {
                error!(error = %err, "failed to poll callback job queue");
                tokio::time::sleep(Duration::from_secs(worker_config.poll_interval_secs)).await;
                continue;
            }
        };

        match job {
            Some(job) => {
                process_job(&job_repository, &reconciliation_use_case, &worker_config, job).await;
            }
            None => {
                tokio::time::sleep(Duration::from_secs(worker_config.poll_interval_secs)).await;
            }
        }
    }
}

async fn process_job(
    job_repository: &Arc<dyn JobRepository + Send + Sync>,
    reconciliation_use_case: &Arc<ReconciliationUseCase>,
    worker_config: &Worker,
    job: JobEntity,
) {
    info!(job_id = job.id, attempts = job.attempts, "processing callback job");

    match reconciliation_use_case.process_job(job.payload.clone()).await {
        Ok(outcome) => {
            info!(job_id = job.id, ?outcome, "callback job finished");
            if let Err(err) = job_repository.mark_job_done(job.id).await {
                error!(job_id = job.id, error = %err, "failed to mark job done");
            }
        }
        Err(err) if err.is_terminal() => {
            // No retry can fix this payload. Dead-letter immediately so an
            // operator sees it.
            error!(job_id = job.id, error = %err, "callback job unprocessable, dead-lettering");
            if let Err(mark_err) = job_repository
                .mark_job_failed(job.id, &err.to_string(), 0)
                .await
            {
                error!(job_id = job.id, error = %mark_err, "failed to dead-letter job");
            }
        }
        Err(err) => {
            let exhausted = job.attempts + 1 >= worker_config.max_attempts;
            if exhausted {
                error!(
                    job_id = job.id,
                    error = %err,
                    "callback job failed on final attempt, dead-lettering"
                );
            } else {
                warn!(
                    job_id = job.id,
                    attempts = job.attempts,
                    error = %err,
                    "callback job failed, will retry with backoff"
                );
            }

            if let Err(mark_err) = job_repository
                .mark_job_failed(job.id, &err.to_string(), worker_config.max_attempts)
                .await
            {
                error!(job_id = job.id, error = %mark_err, "failed to mark job failed");
            }
        }
    }
}
