use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::value_objects::payment_callback::CallbackPayload;
use crate::value_objects::reconciliation::ReconcileOutcome;

/// Atomic application of a verified callback to its order. Implementations
/// must hold an exclusive lock on the order row for the whole
/// check-then-mutate-then-cascade unit so two concurrent deliveries of the
/// same callback cannot both observe `pending`.
#[automock]
#[async_trait]
pub trait ReconciliationRepository {
    /// Success callback: complete the order and fire both cascades (invoice
    /// creation, subscription activation) in the same transaction.
    async fn apply_success(&self, callback: CallbackPayload) -> Result<ReconcileOutcome>;

    /// Failure callback: mark a non-terminal order failed. No cascades.
    async fn apply_failure(&self, callback: CallbackPayload) -> Result<ReconcileOutcome>;
}
