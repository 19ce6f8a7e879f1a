//! # Domain Types
//!
//! Core domain types used throughout Vitrine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────────────────┐   │
//! │  │      Item       │        │             Condition                │   │
//! │  │  ─────────────  │        │  ──────────────────────────────────  │   │
//! │  │  product ───────┼──┐     │  None                                │   │
//! │  │  quantity       │  │     │  One(DiscountCondition)              │   │
//! │  │  condition ─────┼──┼───► │  Many(Vec<DiscountCondition>)        │   │
//! │  └─────────────────┘  │     └──────────────────┬───────────────────┘   │
//! │                       ▼                        ▼                        │
//! │  ┌─────────────────┐        ┌──────────────────────────────────────┐   │
//! │  │    Product      │        │        DiscountCondition             │   │
//! │  │  ─────────────  │        │  ──────────────────────────────────  │   │
//! │  │  title (ID)     │        │  percentage: Option<Percent>         │   │
//! │  │  price (minor)  │        │  minimum:    Option<u32>             │   │
//! │  └─────────────────┘        │  quantity:   Option<u32>             │   │
//! │                             └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A product is identified by its title alone: two products with the same
//! title are the same product even if their prices differ.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// An integer percentage in `0..=100`.
///
/// Out-of-range values are rejected on construction and on deserialization,
/// so every `Percent` in the system is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Percent(u8);

impl Percent {
    /// Creates a percentage, failing when `value > 100`.
    ///
    /// ```rust
    /// use vitrine_core::types::Percent;
    ///
    /// assert_eq!(Percent::new(20).unwrap().value(), 20);
    /// assert!(Percent::new(101).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Percent(v)),
            _ => Err(ValidationError::OutOfRange {
                field: "percentage".to_string(),
                min: 0,
                max: 100,
            }),
        }
    }

    /// Creates a percentage, capping anything above 100.
    #[inline]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 {
            Percent(100)
        } else {
            Percent(value)
        }
    }

    /// Returns the percentage as an integer.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Checks if this is 0%.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u32> for Percent {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Percent::new(value)
    }
}

impl From<Percent> for u32 {
    fn from(percent: Percent) -> Self {
        u32::from(percent.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be placed in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Display name; also the product's identity.
    pub title: String,

    /// Unit price in minor units (centavos).
    pub price: i64,
}

impl Product {
    /// Creates a product.
    pub fn new(title: impl Into<String>, price: i64) -> Self {
        Product {
            title: title.into(),
            price,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::of(self.price)
    }
}

/// Products compare by title only.
impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
    }
}

// =============================================================================
// Discount Condition
// =============================================================================

/// A rule record parameterizing a discount policy.
///
/// Which fields are set decides which policy applies; see
/// [`crate::discount::Policy`]. Zero counts as "not set" for every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCondition {
    /// Percent off the line amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Percent>,

    /// The line quantity must be strictly above this for `percentage` to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<u32>,

    /// The line quantity must be strictly above this for the paired-units
    /// discount (50% even / 40% odd) to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl DiscountCondition {
    /// `percentage` off when the line quantity is above `minimum`.
    pub fn percentage_above(percentage: Percent, minimum: u32) -> Self {
        DiscountCondition {
            percentage: Some(percentage),
            minimum: Some(minimum),
            quantity: None,
        }
    }

    /// Paired-units discount when the line quantity is above `threshold`.
    pub fn quantity_above(threshold: u32) -> Self {
        DiscountCondition {
            percentage: None,
            minimum: None,
            quantity: Some(threshold),
        }
    }

    /// Returns the percentage if it is set and non-zero.
    pub fn active_percentage(&self) -> Option<Percent> {
        self.percentage.filter(|p| !p.is_zero())
    }

    /// Returns the minimum if it is set and non-zero.
    pub fn active_minimum(&self) -> Option<u32> {
        self.minimum.filter(|m| *m != 0)
    }

    /// Returns the quantity threshold if it is set and non-zero.
    pub fn active_quantity(&self) -> Option<u32> {
        self.quantity.filter(|q| *q != 0)
    }
}

// =============================================================================
// Condition
// =============================================================================

/// The discount rule attached to a line item.
///
/// ## Wire Shape
/// Untagged: `null`/absent is `None`, an array (even empty) is `Many`, an
/// object is `One`. `Many` is listed before `One` so that arrays never parse
/// as a struct-from-sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    /// No discount.
    #[default]
    None,

    /// Best of several conditions.
    Many(Vec<DiscountCondition>),

    /// A single condition.
    One(DiscountCondition),
}

impl Condition {
    /// Returns true if no condition is attached.
    pub fn is_none(&self) -> bool {
        matches!(self, Condition::None)
    }
}

impl From<DiscountCondition> for Condition {
    fn from(condition: DiscountCondition) -> Self {
        Condition::One(condition)
    }
}

impl From<Vec<DiscountCondition>> for Condition {
    fn from(conditions: Vec<DiscountCondition>) -> Self {
        Condition::Many(conditions)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A line item: a product, how many of it, and an optional discount rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The product on this line.
    pub product: Product,

    /// Number of units, must be positive.
    pub quantity: u32,

    /// Discount rule for this line.
    #[serde(default, skip_serializing_if = "Condition::is_none")]
    pub condition: Condition,
}

impl Item {
    /// Creates a line item without a discount.
    pub fn new(product: Product, quantity: u32) -> Self {
        Item {
            product,
            quantity,
            condition: Condition::None,
        }
    }

    /// Attaches a single discount condition.
    pub fn with_condition(mut self, condition: DiscountCondition) -> Self {
        self.condition = Condition::One(condition);
        self
    }

    /// Attaches a list of conditions; the best one wins.
    pub fn with_conditions(mut self, conditions: impl Into<Vec<DiscountCondition>>) -> Self {
        self.condition = Condition::Many(conditions.into());
        self
    }

    /// Returns the product title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.product.title
    }

    /// Line amount before discount (`price × quantity`).
    ///
    /// Saturates at the `i64` bounds; items accepted by a cart are checked
    /// not to get there.
    pub fn line_amount(&self) -> Money {
        Money::of(self.product.price.saturating_mul(i64::from(self.quantity)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_range() {
        assert_eq!(Percent::new(0).unwrap().value(), 0);
        assert_eq!(Percent::new(100).unwrap().value(), 100);
        assert!(Percent::new(101).is_err());
        assert!(Percent::new(u32::MAX).is_err());
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(Percent::clamped(40).value(), 40);
        assert_eq!(Percent::clamped(250).value(), 100);
    }

    #[test]
    fn test_percent_deserialize_rejects_out_of_range() {
        let ok: Percent = serde_json::from_str("20").unwrap();
        assert_eq!(ok.value(), 20);
        assert!(serde_json::from_str::<Percent>("150").is_err());
    }

    #[test]
    fn test_product_identity_is_title() {
        let a = Product::new("Nike Jordan Masc", 400);
        let b = Product::new("Nike Jordan Masc", 999);
        let c = Product::new("Nike Jordan Fem", 400);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_active_fields_treat_zero_as_unset() {
        let condition = DiscountCondition {
            percentage: Some(Percent::new(0).unwrap()),
            minimum: Some(0),
            quantity: Some(0),
        };

        assert_eq!(condition.active_percentage(), None);
        assert_eq!(condition.active_minimum(), None);
        assert_eq!(condition.active_quantity(), None);
    }

    #[test]
    fn test_item_builders() {
        let product = Product::new("Nike Jordan Masc", 400);

        let plain = Item::new(product.clone(), 2);
        assert!(plain.condition.is_none());
        assert_eq!(plain.line_amount(), Money::of(800));

        let single = Item::new(product.clone(), 2).with_condition(DiscountCondition::quantity_above(1));
        assert!(matches!(single.condition, Condition::One(_)));

        let many = Item::new(product, 2).with_conditions(vec![]);
        assert_eq!(many.condition, Condition::Many(vec![]));
    }

    #[test]
    fn test_condition_wire_shapes() {
        let none: Item =
            serde_json::from_str(r#"{"product":{"title":"A","price":1},"quantity":1}"#).unwrap();
        assert_eq!(none.condition, Condition::None);

        let one: Item = serde_json::from_str(
            r#"{"product":{"title":"A","price":1},"quantity":1,"condition":{"quantity":2}}"#,
        )
        .unwrap();
        assert_eq!(one.condition, Condition::One(DiscountCondition::quantity_above(2)));

        let empty: Item = serde_json::from_str(
            r#"{"product":{"title":"A","price":1},"quantity":1,"condition":[]}"#,
        )
        .unwrap();
        assert_eq!(empty.condition, Condition::Many(vec![]));

        let many: Item = serde_json::from_str(
            r#"{"product":{"title":"A","price":1},"quantity":3,
                "condition":[{"quantity":2},{"percentage":20,"minimum":2}]}"#,
        )
        .unwrap();
        assert_eq!(
            many.condition,
            Condition::Many(vec![
                DiscountCondition::quantity_above(2),
                DiscountCondition::percentage_above(Percent::new(20).unwrap(), 2),
            ])
        );
    }

    #[test]
    fn test_condition_rejects_bad_percentage() {
        let result = serde_json::from_str::<Item>(
            r#"{"product":{"title":"A","price":1},"quantity":1,"condition":{"percentage":120,"minimum":1}}"#,
        );
        assert!(result.is_err());
    }
}
