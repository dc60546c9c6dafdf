use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubscriptionStatus {
    #[default]
    Pending,
    Trial,
    Active,
    Canceled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubscriptionStatus::Pending),
            "trial" => Some(SubscriptionStatus::Trial),
            "active" => Some(SubscriptionStatus::Active),
            "canceled" => Some(SubscriptionStatus::Canceled),
            "expired" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }

    /// Activation is only legal from the not-yet-started states.
    pub fn can_activate(&self) -> bool {
        matches!(self, SubscriptionStatus::Pending | SubscriptionStatus::Trial)
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            SubscriptionStatus::Pending,
            SubscriptionStatus::Trial,
            SubscriptionStatus::Active,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Expired,
        ] {
            assert_eq!(SubscriptionStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unrecognized_status_is_not_coerced() {
        assert_eq!(SubscriptionStatus::from_str("suspended"), None);
        assert_eq!(SubscriptionStatus::from_str(""), None);
    }

    #[test]
    fn only_unstarted_subscriptions_can_activate() {
        assert!(SubscriptionStatus::Pending.can_activate());
        assert!(SubscriptionStatus::Trial.can_activate());
        assert!(!SubscriptionStatus::Active.can_activate());
        assert!(!SubscriptionStatus::Canceled.can_activate());
        assert!(!SubscriptionStatus::Expired.can_activate());
    }
}
