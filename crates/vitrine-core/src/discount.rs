//! # Discount Engine
//!
//! Decides, for one line item, how much to take off its amount.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      line_discount(amount, item)                        │
//! │                                                                         │
//! │  item.condition                                                         │
//! │       │                                                                 │
//! │       ├── Many(conditions) ──► best_discount: max over candidates       │
//! │       │                          each: quantity set?       → Quantity   │
//! │       │                                pct AND min set?    → Percentage │
//! │       │                                otherwise           → 0          │
//! │       │                                                                 │
//! │       ├── One(c), percentage set ──► percentage_discount                │
//! │       │                                                                 │
//! │       ├── One(c), quantity set ────► quantity_discount                  │
//! │       │                                                                 │
//! │       └── None / nothing set ──────► 0                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two policies:
//!
//! | Policy       | Applies when             | Discount                         |
//! |--------------|--------------------------|----------------------------------|
//! | `Percentage` | `quantity > minimum`     | `percent` of the line amount     |
//! | `Quantity`   | `quantity > threshold`   | 50% if quantity is even, else 40%|
//!
//! An even run pairs up perfectly, which is the same as buy-one-get-one-free
//! on the whole line. An odd run leaves one unit unpaired and gets 40%.
//!
//! Every function here is pure and never returns more than the line amount
//! for a non-negative amount, since no [`Percent`] exceeds 100.
//!
//! ## Usage
//! ```rust
//! use vitrine_core::discount::line_discount;
//! use vitrine_core::money::Money;
//! use vitrine_core::types::{DiscountCondition, Item, Product};
//!
//! let item = Item::new(Product::new("Nike Jordan Masc", 400), 5)
//!     .with_condition(DiscountCondition::quantity_above(2));
//!
//! // 5 units is odd: 40% of 2000
//! assert_eq!(line_discount(item.line_amount(), &item), Money::of(800));
//! ```

use tracing::trace;

use crate::money::Money;
use crate::types::{Condition, DiscountCondition, Item, Percent};

/// Discount for a line whose quantity is even.
const PAIRED_RUN: Percent = Percent::clamped(50);

/// Discount for a line whose quantity is odd.
const UNPAIRED_RUN: Percent = Percent::clamped(40);

// =============================================================================
// Policy
// =============================================================================

/// A discount policy, built once from a [`DiscountCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// `percent` off when the line quantity is strictly above `minimum`.
    Percentage { percent: Percent, minimum: u32 },

    /// Paired-units discount when the line quantity is strictly above `threshold`.
    Quantity { threshold: u32 },
}

impl Policy {
    /// Picks the policy for a condition attached on its own.
    ///
    /// A non-zero percentage selects the percentage policy even when
    /// `quantity` is also set; it is inert unless a non-zero minimum is
    /// present too. Otherwise a non-zero `quantity` selects the quantity
    /// policy.
    pub fn for_record(condition: &DiscountCondition) -> Option<Policy> {
        match condition.active_percentage() {
            Some(percent) => condition
                .active_minimum()
                .map(|minimum| Policy::Percentage { percent, minimum }),
            None => condition
                .active_quantity()
                .map(|threshold| Policy::Quantity { threshold }),
        }
    }

    /// Picks the policy for a condition competing in a list.
    ///
    /// Here a non-zero `quantity` wins over the percentage fields, and the
    /// percentage policy needs both `percentage` and `minimum`.
    pub fn for_candidate(condition: &DiscountCondition) -> Option<Policy> {
        if let Some(threshold) = condition.active_quantity() {
            return Some(Policy::Quantity { threshold });
        }

        match (condition.active_percentage(), condition.active_minimum()) {
            (Some(percent), Some(minimum)) => Some(Policy::Percentage { percent, minimum }),
            _ => None,
        }
    }

    /// Discount this policy grants on `amount` for a line of `quantity` units.
    pub fn apply(&self, amount: Money, quantity: u32) -> Money {
        match *self {
            Policy::Percentage { percent, minimum } if quantity > minimum => {
                amount.percentage(percent)
            }
            Policy::Quantity { threshold } if quantity > threshold => {
                let percent = if quantity % 2 == 0 {
                    PAIRED_RUN
                } else {
                    UNPAIRED_RUN
                };
                amount.percentage(percent)
            }
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Policies
// =============================================================================

/// Percentage discount for a single condition.
///
/// Returns `percentage` of `amount` if the percentage and minimum are both
/// set and non-zero and `quantity > minimum`; zero otherwise.
pub fn percentage_discount(amount: Money, quantity: u32, condition: &DiscountCondition) -> Money {
    match (condition.active_percentage(), condition.active_minimum()) {
        (Some(percent), Some(minimum)) => {
            Policy::Percentage { percent, minimum }.apply(amount, quantity)
        }
        _ => Money::zero(),
    }
}

/// Quantity discount for a single condition.
///
/// Returns 50% (even `quantity`) or 40% (odd) of `amount` if the condition's
/// `quantity` threshold is set and non-zero and `quantity` is above it; zero
/// otherwise.
pub fn quantity_discount(amount: Money, quantity: u32, condition: &DiscountCondition) -> Money {
    match condition.active_quantity() {
        Some(threshold) => Policy::Quantity { threshold }.apply(amount, quantity),
        None => Money::zero(),
    }
}

/// Largest discount among `conditions`; zero for an empty list.
///
/// On a tie the earliest condition's candidate is kept.
pub fn best_discount(amount: Money, quantity: u32, conditions: &[DiscountCondition]) -> Money {
    conditions
        .iter()
        .map(|condition| {
            Policy::for_candidate(condition)
                .map_or(Money::zero(), |policy| policy.apply(amount, quantity))
        })
        .reduce(|best, candidate| if candidate > best { candidate } else { best })
        .unwrap_or_default()
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Discount for one line of the cart.
///
/// `amount` is the line amount (`price × quantity`) the discount is taken from.
pub fn line_discount(amount: Money, item: &Item) -> Money {
    let discount = match &item.condition {
        Condition::Many(conditions) => best_discount(amount, item.quantity, conditions),
        Condition::One(condition) => Policy::for_record(condition)
            .map_or(Money::zero(), |policy| policy.apply(amount, item.quantity)),
        Condition::None => Money::zero(),
    };

    trace!(
        title = %item.product.title,
        quantity = item.quantity,
        amount = %amount,
        discount = %discount,
        "Resolved line discount"
    );

    discount
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn pct(value: u32) -> Percent {
        Percent::new(value).unwrap()
    }

    fn item(quantity: u32) -> Item {
        Item::new(Product::new("Nike Jordan Masc", 400), quantity)
    }

    #[test]
    fn test_percentage_applies_above_minimum() {
        let condition = DiscountCondition::percentage_above(pct(5), 3);
        assert_eq!(
            percentage_discount(Money::of(1600), 4, &condition),
            Money::of(80)
        );
    }

    #[test]
    fn test_percentage_not_applied_at_or_below_minimum() {
        let condition = DiscountCondition::percentage_above(pct(10), 3);
        assert_eq!(percentage_discount(Money::of(1200), 3, &condition), Money::zero());
        assert_eq!(percentage_discount(Money::of(800), 2, &condition), Money::zero());
    }

    #[test]
    fn test_percentage_requires_both_fields() {
        let no_minimum = DiscountCondition {
            percentage: Some(pct(10)),
            ..Default::default()
        };
        assert_eq!(percentage_discount(Money::of(1000), 50, &no_minimum), Money::zero());

        let zero_minimum = DiscountCondition::percentage_above(pct(10), 0);
        assert_eq!(percentage_discount(Money::of(1000), 50, &zero_minimum), Money::zero());

        let zero_percent = DiscountCondition::percentage_above(pct(0), 1);
        assert_eq!(percentage_discount(Money::of(1000), 50, &zero_percent), Money::zero());
    }

    #[test]
    fn test_quantity_even_and_odd() {
        let condition = DiscountCondition::quantity_above(2);
        assert_eq!(quantity_discount(Money::of(1600), 4, &condition), Money::of(800));
        assert_eq!(quantity_discount(Money::of(2000), 5, &condition), Money::of(800));
    }

    #[test]
    fn test_quantity_not_applied_at_or_below_threshold() {
        let condition = DiscountCondition::quantity_above(3);
        assert_eq!(quantity_discount(Money::of(800), 2, &condition), Money::zero());
        assert_eq!(quantity_discount(Money::of(1200), 3, &condition), Money::zero());
    }

    #[test]
    fn test_quantity_requires_threshold() {
        let unset = DiscountCondition::default();
        assert_eq!(quantity_discount(Money::of(1600), 4, &unset), Money::zero());

        let zero = DiscountCondition::quantity_above(0);
        assert_eq!(quantity_discount(Money::of(1600), 4, &zero), Money::zero());
    }

    #[test]
    fn test_best_picks_larger() {
        let conditions = [
            DiscountCondition::quantity_above(2),
            DiscountCondition::percentage_above(pct(20), 2),
        ];
        // quantity: 40% of 1200 = 480, percentage: 20% of 1200 = 240
        assert_eq!(best_discount(Money::of(1200), 3, &conditions), Money::of(480));

        let reversed = [conditions[1], conditions[0]];
        assert_eq!(best_discount(Money::of(1200), 3, &reversed), Money::of(480));
    }

    #[test]
    fn test_best_empty_is_zero() {
        assert_eq!(best_discount(Money::of(1200), 3, &[]), Money::zero());
    }

    #[test]
    fn test_best_ignores_shapeless_conditions() {
        let conditions = [
            DiscountCondition {
                percentage: Some(pct(90)),
                ..Default::default()
            },
            DiscountCondition::default(),
        ];
        assert_eq!(best_discount(Money::of(1200), 3, &conditions), Money::zero());
    }

    #[test]
    fn test_candidate_prefers_quantity_over_percentage() {
        let both = DiscountCondition {
            percentage: Some(pct(90)),
            minimum: Some(1),
            quantity: Some(1),
        };

        assert_eq!(
            Policy::for_candidate(&both),
            Some(Policy::Quantity { threshold: 1 })
        );
        assert_eq!(
            Policy::for_record(&both),
            Some(Policy::Percentage {
                percent: pct(90),
                minimum: 1
            })
        );

        // Alone, the 90% rule applies; in a list, the quantity rule is used.
        let alone = item(4).with_condition(both);
        assert_eq!(line_discount(alone.line_amount(), &alone), Money::of(1440));

        let listed = item(4).with_conditions(vec![both]);
        assert_eq!(line_discount(listed.line_amount(), &listed), Money::of(800));
    }

    #[test]
    fn test_record_with_percentage_but_no_minimum_is_inert() {
        // The quantity field is not consulted once a percentage is set.
        let condition = DiscountCondition {
            percentage: Some(pct(10)),
            minimum: None,
            quantity: Some(1),
        };
        assert_eq!(Policy::for_record(&condition), None);

        let line = item(4).with_condition(condition);
        assert_eq!(line_discount(line.line_amount(), &line), Money::zero());
    }

    #[test]
    fn test_dispatch_without_condition_is_zero() {
        let line = item(4);
        assert_eq!(line_discount(line.line_amount(), &line), Money::zero());
    }

    #[test]
    fn test_dispatch_single_quantity_condition() {
        let line = item(4).with_condition(DiscountCondition::quantity_above(2));
        assert_eq!(line_discount(line.line_amount(), &line), Money::of(800));
    }

    #[test]
    fn test_discount_never_exceeds_amount() {
        let conditions = [
            DiscountCondition::percentage_above(pct(100), 1),
            DiscountCondition::quantity_above(1),
        ];

        for quantity in 1..=12 {
            let amount = Money::of(399 * i64::from(quantity));
            for condition in &conditions {
                let single = item(quantity).with_condition(*condition);
                assert!(line_discount(amount, &single) <= amount);
            }
            let many = item(quantity).with_conditions(conditions.to_vec());
            let discount = line_discount(amount, &many);
            assert!(discount <= amount);
            assert!(!discount.is_negative());
        }
    }

    #[test]
    fn test_discount_is_pure() {
        let line = item(3).with_conditions(vec![
            DiscountCondition::quantity_above(2),
            DiscountCondition::percentage_above(pct(20), 2),
        ]);
        let amount = line.line_amount();

        let first = line_discount(amount, &line);
        let second = line_discount(amount, &line);
        assert_eq!(first, second);
    }
}
