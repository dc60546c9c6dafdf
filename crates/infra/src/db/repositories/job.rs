use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::jobs::{InsertJobEntity, JobEntity},
    repositories::job::JobRepository,
    schema::jobs,
    value_objects::reconciliation::{PAYMENT_CALLBACK_JOB_TYPE, PaymentCallbackJob},
};

pub struct JobPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl JobPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl JobRepository for JobPostgres {
    async fn enqueue_payment_callback_job(&self, payload: PaymentCallbackJob) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let insert_entity = InsertJobEntity {
            type_: PAYMENT_CALLBACK_JOB_TYPE.to_string(),
            payload: serde_json::to_value(payload)?,
            run_at: Utc::now(),
            attempts: 0,
            locked_at: None,
            locked_by: None,
            status: "queued".to_string(),
            error: None,
        };

        let job_id = diesel::insert_into(jobs::table)
            .values(&insert_entity)
            .returning(jobs::id)
            .get_result::<i64>(&mut conn)?;

        Ok(job_id)
    }

    async fn lock_next_payment_callback_job(&self) -> Result<Option<JobEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let worker_id = Uuid::new_v4().to_string();
        let current_time = Utc::now();

        let job = conn.transaction::<Option<JobEntity>, diesel::result::Error, _>(|conn| {
            let candidate: Option<JobEntity> = jobs::table
                .select(JobEntity::as_select())
                .filter(jobs::type_.eq(PAYMENT_CALLBACK_JOB_TYPE))
                .filter(jobs::status.eq("queued"))
                .filter(jobs::run_at.le(current_time))
                .order(jobs::run_at.asc())
                .for_update()
                .skip_locked()
                .first::<JobEntity>(conn)
                .optional()?;

            if let Some(job) = candidate {
                let updated_job = diesel::update(jobs::table.find(job.id))
                    .set((
                        jobs::status.eq("running"),
                        jobs::locked_at.eq(Some(current_time)),
                        jobs::locked_by.eq(Some(worker_id)),
                    ))
                    .returning(JobEntity::as_select())
                    .get_result::<JobEntity>(conn)?;
                Ok(Some(updated_job))
            } else {
                Ok(None)
            }
        })?;

        Ok(job)
    }

    async fn mark_job_done(&self, job_id: i64) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        diesel::update(jobs::table.find(job_id))
            .set((
                jobs::status.eq("done"),
                jobs::locked_at.eq::<Option<chrono::DateTime<Utc>>>(None),
                jobs::locked_by.eq::<Option<String>>(None),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn mark_job_failed(&self, job_id: i64, err: &str, max_attempts: i32) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let current_time = Utc::now();

        let job = jobs::table
            .find(job_id)
            .select(JobEntity::as_select())
            .first::<JobEntity>(&mut conn)?;

        let new_attempts = job.attempts + 1;
        let (new_status, next_run_at) = if new_attempts < max_attempts {
            // Exponential backoff: 5s, 25s, 125s...
            let backoff_sec = 5 * 5_i64.pow((new_attempts - 1) as u32);
            (
                "queued",
                current_time + chrono::Duration::seconds(backoff_sec),
            )
        } else {
            // Dead-lettered: kept in the table for operator replay, never
            // deleted.
            ("dead", current_time)
        };

        diesel::update(jobs::table.find(job_id))
            .set((
                jobs::status.eq(new_status),
                jobs::attempts.eq(new_attempts),
                jobs::error.eq(Some(err)),
                jobs::run_at.eq(next_run_at),
                jobs::locked_at.eq::<Option<chrono::DateTime<Utc>>>(None),
                jobs::locked_by.eq::<Option<String>>(None),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
