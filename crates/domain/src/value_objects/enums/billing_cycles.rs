use std::fmt::Display;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(BillingCycle::Monthly),
            "quarterly" => Some(BillingCycle::Quarterly),
            "yearly" => Some(BillingCycle::Yearly),
            _ => None,
        }
    }

    fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Quarterly => 3,
            BillingCycle::Yearly => 12,
        }
    }

    /// End of the billing period starting at `starts_at`. Calendar months, so
    /// a monthly cycle starting Jan 31 ends Feb 28/29.
    pub fn period_end(&self, starts_at: DateTime<Utc>) -> DateTime<Utc> {
        starts_at
            .checked_add_months(Months::new(self.months()))
            .unwrap_or(starts_at)
    }
}

impl Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn monthly_period_ends_one_month_later() {
        let start = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        let end = BillingCycle::Monthly.period_end(start);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn monthly_period_clamps_to_month_end() {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let end = BillingCycle::Monthly.period_end(start);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn yearly_period_spans_twelve_months() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let end = BillingCycle::Yearly.period_end(start);
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
    }
}
