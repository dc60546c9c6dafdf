use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::jobs::JobEntity;
use crate::value_objects::reconciliation::PaymentCallbackJob;

#[automock]
#[async_trait]
pub trait JobRepository {
    async fn enqueue_payment_callback_job(&self, payload: PaymentCallbackJob) -> Result<i64>;

    async fn lock_next_payment_callback_job(&self) -> Result<Option<JobEntity>>;

    async fn mark_job_done(&self, job_id: i64) -> Result<()>;

    async fn mark_job_failed(&self, job_id: i64, err: &str, max_attempts: i32) -> Result<()>;
}
