//! Status enums for orders and drops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an order created by the payment webhook.
///
/// Orders are born `Paid` (the webhook only fires after a completed
/// checkout); the remaining states are driven by fulfilment updates in the
/// editor console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Paid,
    Fulfilled,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Stable string form stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Parse the stored string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(Self::Paid),
            "fulfilled" => Some(Self::Fulfilled),
            "cancelled" => Some(Self::Cancelled),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a drop sits in its availability window.
///
/// Never stored; always derived from the drop's `starts_at`/`ends_at` at
/// read time so the storefront and the console cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPhase {
    Upcoming,
    Live,
    Ended,
}

impl DropPhase {
    /// Classify a window against a reference instant.
    #[must_use]
    pub fn at(now: DateTime<Utc>, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        if now < starts_at {
            Self::Upcoming
        } else if now < ends_at {
            Self::Live
        } else {
            Self::Ended
        }
    }

    /// Whether items from the drop can be added to a cart.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp")
            .and_utc()
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Paid,
            OrderStatus::Fulfilled,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("unknown"), None);
    }

    #[test]
    fn test_drop_phase_window() {
        let starts = ts("2026-09-01 10:00:00");
        let ends = ts("2026-09-03 10:00:00");

        assert_eq!(
            DropPhase::at(ts("2026-08-31 09:00:00"), starts, ends),
            DropPhase::Upcoming
        );
        assert_eq!(
            DropPhase::at(ts("2026-09-02 12:00:00"), starts, ends),
            DropPhase::Live
        );
        assert_eq!(
            DropPhase::at(ts("2026-09-03 10:00:00"), starts, ends),
            DropPhase::Ended
        );
    }

    #[test]
    fn test_drop_phase_boundary_is_inclusive_start() {
        let starts = ts("2026-09-01 10:00:00");
        let ends = ts("2026-09-03 10:00:00");
        assert!(DropPhase::at(starts, starts, ends).is_live());
    }
}
