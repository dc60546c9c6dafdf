use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::enums::order_statuses::OrderStatus;

/// Job payload queued by the webhook endpoint. Carries the verbatim callback
/// field map so a retry can reparse and reapply without any other state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCallbackJob {
    pub order_number: String,
    pub fields: BTreeMap<String, String>,
}

pub const PAYMENT_CALLBACK_JOB_TYPE: &str = "PaymentCallback";

/// Result of one atomic apply of a callback to an order. Produced inside the
/// reconciliation transaction while the order row lock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Order transitioned to completed; cascades fired in the same
    /// transaction.
    Completed {
        order_id: Uuid,
        invoice_id: Uuid,
        subscription_id: Option<Uuid>,
    },
    /// Success callback for an order that already completed: duplicate
    /// delivery, nothing mutated, nothing re-fired.
    AlreadyCompleted { order_id: Uuid },
    /// Failure callback applied to a non-terminal order.
    MarkedFailed { order_id: Uuid },
    /// No order with the callback's MerchantTradeNo.
    UnknownOrder,
    /// Callback amount disagrees with the order amount. Possible tampering;
    /// nothing mutated.
    AmountMismatch {
        order_id: Uuid,
        expected_minor: i64,
        received_minor: i64,
    },
    /// Order sits in a terminal state the callback may not leave.
    TerminalState {
        order_id: Uuid,
        status: OrderStatus,
    },
}

impl ReconcileOutcome {
    /// Semantic rejections are terminal: retrying the same payload can never
    /// change the answer, so the job must not be requeued.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::UnknownOrder
                | ReconcileOutcome::AmountMismatch { .. }
                | ReconcileOutcome::TerminalState { .. }
        )
    }
}
