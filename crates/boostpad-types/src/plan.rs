//! Subscription plan tiers
//!
//! A creator's plan tier determines the discount applied at task creation,
//! the daily task quota, and how the creator's tasks rank in other users'
//! feeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier of a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Member,
    Buddy,
    Mate,
}

impl PlanTier {
    /// Percentage knocked off the full task cost at creation time
    pub fn discount_rate(&self) -> u32 {
        match self {
            PlanTier::Free | PlanTier::Member => 0,
            PlanTier::Buddy => 20,
            PlanTier::Mate => 40,
        }
    }

    /// Default daily task-creation quota for the tier
    pub fn daily_task_limit(&self) -> i32 {
        match self {
            PlanTier::Free => 5,
            PlanTier::Member => 10,
            PlanTier::Buddy => 20,
            PlanTier::Mate => 40,
        }
    }

    /// Ranking weight used by the feed selector (higher sorts first)
    pub fn feed_priority(&self) -> u8 {
        match self {
            PlanTier::Mate => 3,
            PlanTier::Buddy => 2,
            PlanTier::Member => 1,
            PlanTier::Free => 0,
        }
    }

    /// Database/text representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Member => "member",
            PlanTier::Buddy => "buddy",
            PlanTier::Mate => "mate",
        }
    }
}

impl Default for PlanTier {
    fn default() -> Self {
        PlanTier::Free
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = UnknownPlanTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "member" => Ok(PlanTier::Member),
            "buddy" => Ok(PlanTier::Buddy),
            "mate" => Ok(PlanTier::Mate),
            other => Err(UnknownPlanTier(other.to_string())),
        }
    }
}

/// Unrecognized plan tier string
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown plan tier: {0}")]
pub struct UnknownPlanTier(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_rates_match_tiers() {
        assert_eq!(PlanTier::Free.discount_rate(), 0);
        assert_eq!(PlanTier::Member.discount_rate(), 0);
        assert_eq!(PlanTier::Buddy.discount_rate(), 20);
        assert_eq!(PlanTier::Mate.discount_rate(), 40);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MATE".parse::<PlanTier>().unwrap(), PlanTier::Mate);
        assert_eq!("buddy".parse::<PlanTier>().unwrap(), PlanTier::Buddy);
        assert!("platinum".parse::<PlanTier>().is_err());
    }

    #[test]
    fn feed_priority_orders_tiers() {
        assert!(PlanTier::Mate.feed_priority() > PlanTier::Buddy.feed_priority());
        assert!(PlanTier::Buddy.feed_priority() > PlanTier::Member.feed_priority());
        assert!(PlanTier::Member.feed_priority() > PlanTier::Free.feed_priority());
    }
}
