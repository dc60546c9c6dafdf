use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Order lifecycle. An order is created `Pending` by the order usecase and is
/// mutated afterwards only by callback reconciliation. Terminal states are
/// never left again, with the single exception of `Completed -> Refunded`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Canceled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "completed" => Some(OrderStatus::Completed),
            "failed" => Some(OrderStatus::Failed),
            "canceled" => Some(OrderStatus::Canceled),
            "refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed
                | OrderStatus::Failed
                | OrderStatus::Canceled
                | OrderStatus::Refunded
        )
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Processing) => true,
            (OrderStatus::Pending, OrderStatus::Completed) => true,
            (OrderStatus::Pending, OrderStatus::Failed) => true,
            (OrderStatus::Pending, OrderStatus::Canceled) => true,
            (OrderStatus::Processing, OrderStatus::Completed) => true,
            (OrderStatus::Processing, OrderStatus::Failed) => true,
            (OrderStatus::Completed, OrderStatus::Refunded) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Failed,
        OrderStatus::Canceled,
        OrderStatus::Refunded,
    ];

    #[test]
    fn success_path_is_legal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn failure_and_cancel_paths_are_legal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Failed));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Failed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Canceled));
    }

    #[test]
    fn refund_only_from_completed() {
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Refunded));
        for status in ALL {
            if status != OrderStatus::Completed {
                assert!(
                    !status.can_transition_to(OrderStatus::Refunded),
                    "{status} must not refund"
                );
            }
        }
    }

    #[test]
    fn terminal_states_are_immutable() {
        for terminal in [
            OrderStatus::Failed,
            OrderStatus::Canceled,
            OrderStatus::Refunded,
        ] {
            for next in ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
        for next in ALL {
            if next != OrderStatus::Refunded {
                assert!(!OrderStatus::Completed.can_transition_to(next));
            }
        }
    }

    #[test]
    fn round_trips_through_strings() {
        for status in ALL {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("unknown"), None);
    }
}
