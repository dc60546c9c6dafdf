use std::sync::Arc;

use anyhow::Result;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

use domain::{
    entities::audit_logs::InsertAuditLogEntity,
    repositories::{audit_logs::AuditLogRepository, reconciliation::ReconciliationRepository},
    value_objects::{
        enums::audit_actions::AuditAction,
        payment_callback::{CallbackPayload, GatewayStatus},
        reconciliation::{PaymentCallbackJob, ReconcileOutcome},
    },
};

/// Errors from processing one queued callback job. The worker keys its
/// retry decision on this split.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The job can never succeed: malformed payload or a result code we
    /// refuse to interpret. Retrying reproduces the same answer.
    #[error("unprocessable callback job: {0}")]
    Invalid(String),
    /// Transient infrastructure failure. The job should be retried.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ReconcileError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReconcileError::Invalid(_))
    }
}

pub struct ReconciliationUseCase {
    reconciliation_repository: Arc<dyn ReconciliationRepository + Send + Sync>,
    audit_log_repository: Arc<dyn AuditLogRepository + Send + Sync>,
}

impl ReconciliationUseCase {
    pub fn new(
        reconciliation_repository: Arc<dyn ReconciliationRepository + Send + Sync>,
        audit_log_repository: Arc<dyn AuditLogRepository + Send + Sync>,
    ) -> Self {
        Self {
            reconciliation_repository,
            audit_log_repository,
        }
    }

    /// Apply one queued callback job payload to its order.
    ///
    /// Signature verification already happened at the webhook boundary; the
    /// job carries the verbatim field map, so the parse here can only fail if
    /// the stored payload was corrupted, which no retry will fix.
    pub async fn process_job(&self, payload: Value) -> Result<ReconcileOutcome, ReconcileError> {
        let job: PaymentCallbackJob = serde_json::from_value(payload)
            .map_err(|e| ReconcileError::Invalid(format!("undecodable job payload: {e}")))?;

        let callback = CallbackPayload::from_fields(job.fields)
            .map_err(|e| ReconcileError::Invalid(e.to_string()))?;

        let outcome = match callback.status() {
            GatewayStatus::Paid => {
                self.reconciliation_repository
                    .apply_success(callback.clone())
                    .await?
            }
            GatewayStatus::Failed => {
                self.reconciliation_repository
                    .apply_failure(callback.clone())
                    .await?
            }
            GatewayStatus::Unknown => {
                self.audit_rejection(
                    &callback,
                    format!("unrecognized gateway result code {}", callback.rtn_code),
                )
                .await?;
                return Err(ReconcileError::Invalid(format!(
                    "unrecognized gateway result code {}",
                    callback.rtn_code
                )));
            }
        };

        self.audit_outcome(&callback, &outcome).await?;

        match &outcome {
            ReconcileOutcome::Completed { order_id, .. } => {
                info!(%order_id, trade_no = %callback.trade_no, "order completed");
            }
            ReconcileOutcome::AlreadyCompleted { order_id } => {
                info!(%order_id, trade_no = %callback.trade_no, "duplicate callback ignored");
            }
            ReconcileOutcome::MarkedFailed { order_id } => {
                info!(%order_id, rtn_code = callback.rtn_code, "order marked failed");
            }
            rejection => {
                warn!(
                    merchant_trade_no = %callback.merchant_trade_no,
                    ?rejection,
                    "callback rejected"
                );
            }
        }

        Ok(outcome)
    }

    async fn audit_outcome(
        &self,
        callback: &CallbackPayload,
        outcome: &ReconcileOutcome,
    ) -> Result<()> {
        let description = match outcome {
            ReconcileOutcome::Completed { .. } => "payment confirmed, order completed".to_string(),
            ReconcileOutcome::AlreadyCompleted { .. } => {
                "duplicate success callback, no changes".to_string()
            }
            ReconcileOutcome::MarkedFailed { .. } => {
                format!("payment failed: {}", callback.rtn_msg)
            }
            ReconcileOutcome::UnknownOrder => "callback for unknown order".to_string(),
            ReconcileOutcome::AmountMismatch {
                expected_minor,
                received_minor,
                ..
            } => format!(
                "callback amount {received_minor} disagrees with order amount {expected_minor}"
            ),
            ReconcileOutcome::TerminalState { status, .. } => {
                format!("callback for order already in terminal state {status}")
            }
        };

        self.audit_log_repository
            .append(InsertAuditLogEntity {
                user_id: None,
                action: AuditAction::Payment.to_string(),
                resource_type: "order".to_string(),
                resource_id: callback.merchant_trade_no.clone(),
                description,
                metadata: json!({
                    "trade_no": callback.trade_no,
                    "rtn_code": callback.rtn_code,
                    "rejected": outcome.is_rejection(),
                }),
            })
            .await
    }

    async fn audit_rejection(&self, callback: &CallbackPayload, description: String) -> Result<()> {
        self.audit_log_repository
            .append(InsertAuditLogEntity {
                user_id: None,
                action: AuditAction::Payment.to_string(),
                resource_type: "order".to_string(),
                resource_id: callback.merchant_trade_no.clone(),
                description,
                metadata: json!({
                    "trade_no": callback.trade_no,
                    "rtn_code": callback.rtn_code,
                    "rejected": true,
                }),
            })
            .await
    }
}
