//! Pricing engine
//!
//! Pure arithmetic for task cost, refunds, and bonus-action allotment. No
//! state and no I/O; the only failure mode is a task configured with zero
//! required actions, which upstream validation must have rejected already.
//!
//! The per-plan discount and quota tables live on [`PlanTier`](crate::PlanTier)
//! as compile-time constants; the runtime-tunable parts (bonus-country
//! allow-list, bonus ratio) are loaded once into [`PricingConfig`] at process
//! start and never mutated afterwards.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Countries whose creators receive bonus action slots on every task
const DEFAULT_BONUS_COUNTRIES: &[&str] = &[
    "US", "GB", "CA", "AU", "NZ", "IE", "DE", "FR", "NL", "SE", "NO", "DK", "CH",
];

/// Immutable pricing parameters, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// ISO-3166 alpha-2 codes eligible for bonus actions
    pub bonus_countries: HashSet<String>,
    /// Bonus slots granted per required action (rounded half-to-even)
    pub bonus_ratio: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            bonus_countries: DEFAULT_BONUS_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            bonus_ratio: Decimal::new(3, 1), // 0.3
        }
    }
}

/// Quoted cost of a task at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCost {
    /// Cost actually debited from the creator (discount applied, floored)
    pub discounted: Decimal,
    /// Full undiscounted total, kept on the task for reward/refund math
    pub original: Decimal,
}

/// Pricing preconditions violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("invalid task configuration: actions_required must be positive")]
    InvalidTaskConfiguration,
}

/// Compute the discounted and original cost of a task.
///
/// `original = base_price * actions_required`,
/// `discounted = floor(original * (1 - discount_rate/100))`.
pub fn task_cost(
    base_price: Decimal,
    actions_required: i32,
    discount_rate: u32,
) -> Result<TaskCost, PricingError> {
    if actions_required <= 0 {
        return Err(PricingError::InvalidTaskConfiguration);
    }

    let original = base_price * Decimal::from(actions_required);
    let keep = Decimal::from(100 - discount_rate.min(100)) / Decimal::ONE_HUNDRED;
    let discounted = (original * keep).floor();

    Ok(TaskCost { discounted, original })
}

/// Bonus action slots for a creator's chosen country.
///
/// `round(actions_required * ratio)` when the uppercased country code is on
/// the allow-list, zero otherwise. Bonus slots are unpaid: completers of
/// bonus actions earn no reward and they do not gate completion individually.
pub fn bonus_actions(
    actions_required: i32,
    chosen_country: Option<&str>,
    config: &PricingConfig,
) -> i32 {
    let Some(country) = chosen_country else {
        return 0;
    };

    if !config.bonus_countries.contains(&country.to_ascii_uppercase()) {
        return 0;
    }

    let bonus = (Decimal::from(actions_required.max(0)) * config.bonus_ratio).round();
    bonus.to_i32().unwrap_or(0)
}

/// Points returned to the creator when a task is deleted before completion.
///
/// The refund re-derives the per-action cost from the undiscounted total and
/// the creator's *current* discount rate, then floors the product with the
/// remaining action count. Fully-worked tasks refund nothing.
pub fn refund(
    original_cost: Decimal,
    actions_required: i32,
    actions_completed: i32,
    discount_rate: u32,
) -> Result<Decimal, PricingError> {
    if actions_required <= 0 {
        return Err(PricingError::InvalidTaskConfiguration);
    }

    let remaining = actions_required - actions_completed;
    if remaining <= 0 {
        return Ok(Decimal::ZERO);
    }

    let rate = Decimal::from(discount_rate.min(100)) / Decimal::ONE_HUNDRED;
    let discounted_cost = original_cost - original_cost * rate;
    let cost_per_action = discounted_cost / Decimal::from(actions_required);

    Ok((cost_per_action * Decimal::from(remaining)).floor())
}

/// Flat per-action reward paid to a completer of a *main* action slot.
///
/// Exactly half the undiscounted per-action price, independent of how much
/// work remains. Bonus completions earn nothing; callers pay this only for
/// main-counter increments.
pub fn completion_reward(original_price: Decimal, actions_required: i32) -> Decimal {
    if actions_required <= 0 {
        return Decimal::ZERO;
    }
    original_price / Decimal::from(actions_required) / Decimal::TWO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mate_tier_cost_scenario() {
        // base 10, 5 actions, 40% discount -> original 50, discounted 30
        let cost = task_cost(dec!(10), 5, 40).unwrap();
        assert_eq!(cost.original, dec!(50));
        assert_eq!(cost.discounted, dec!(30));
    }

    #[test]
    fn zero_discount_charges_full_price() {
        let cost = task_cost(dec!(7), 3, 0).unwrap();
        assert_eq!(cost.original, dec!(21));
        assert_eq!(cost.discounted, dec!(21));
    }

    #[test]
    fn discounted_cost_is_floored() {
        // 3 * 11 = 33, 20% off -> 26.4 -> 26
        let cost = task_cost(dec!(11), 3, 20).unwrap();
        assert_eq!(cost.discounted, dec!(26));
    }

    #[test]
    fn zero_actions_is_rejected() {
        assert_eq!(task_cost(dec!(10), 0, 0), Err(PricingError::InvalidTaskConfiguration));
        assert_eq!(refund(dec!(10), 0, 0, 0), Err(PricingError::InvalidTaskConfiguration));
    }

    #[test]
    fn refund_scenario() {
        // original 100, 10 actions, 4 done, 20% discount
        // discounted 80, per-action 8, remaining 6 -> 48
        let r = refund(dec!(100), 10, 4, 20).unwrap();
        assert_eq!(r, dec!(48));
    }

    #[test]
    fn refund_is_zero_once_fully_worked() {
        assert_eq!(refund(dec!(100), 10, 10, 20).unwrap(), Decimal::ZERO);
        assert_eq!(refund(dec!(100), 10, 12, 20).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn bonus_actions_respect_allow_list() {
        let config = PricingConfig::default();
        assert_eq!(bonus_actions(10, Some("us"), &config), 3);
        assert_eq!(bonus_actions(10, Some("DE"), &config), 3);
        assert_eq!(bonus_actions(10, Some("BR"), &config), 0);
        assert_eq!(bonus_actions(10, None, &config), 0);
    }

    #[test]
    fn bonus_rounding_is_half_to_even() {
        let config = PricingConfig::default();
        // 5 * 0.3 = 1.5 -> 2, 15 * 0.3 = 4.5 -> 4
        assert_eq!(bonus_actions(5, Some("US"), &config), 2);
        assert_eq!(bonus_actions(15, Some("US"), &config), 4);
    }

    #[test]
    fn reward_is_half_the_per_action_price() {
        assert_eq!(completion_reward(dec!(100), 10), dec!(5));
        assert_eq!(completion_reward(dec!(50), 4), dec!(6.25));
    }
}
