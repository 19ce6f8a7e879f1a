//! # Cart
//!
//! An ordered list of line items with a discount-aware running total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_item(item) ──────► validate ──► drop line with same title ──► push │
//! │                                                                         │
//! │  remove_product(p) ───► retain lines whose product != p                 │
//! │                                                                         │
//! │  total() ─────────────► Σ (price × qty) − line_discount(...)            │
//! │                                                                         │
//! │  summary() ───────────► { total, items } borrowing the live lines       │
//! │                                                                         │
//! │  checkout() ──────────► summary with owned lines, then empty the cart   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Product titles are unique: re-adding a product **replaces** its line
//!   (quantity is overwritten, not accumulated) and moves it to the end
//! - Every line passed [`validate_item`] against the cart's limits
//! - A cart has one currency for its whole life
//!
//! A `Cart` is a single-owner value. Callers that share one across threads
//! wrap it themselves (e.g. in a `Mutex`).

use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

use crate::config::{CartConfig, CartLimits};
use crate::discount::line_discount;
use crate::error::CoreResult;
use crate::money::{Currency, Money};
use crate::types::{Item, Product};
use crate::validation::{validate_cart_size, validate_cart_total, validate_item};

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    items: Vec<Item>,
    currency: Currency,
    limits: CartLimits,
}

impl Cart {
    /// Creates an empty BRL cart with default limits.
    pub fn new() -> Self {
        Cart::with_config(&CartConfig::default())
    }

    /// Creates an empty cart with the given currency and limits.
    pub fn with_config(config: &CartConfig) -> Self {
        Cart {
            items: Vec::new(),
            currency: config.currency.clone(),
            limits: config.limits,
        }
    }

    /// Adds a line, replacing any line for a product with the same title.
    ///
    /// ## Behavior
    /// - Invalid items are rejected and the cart is left unchanged
    /// - Items that would push the cart subtotal past `i64::MAX` are rejected
    /// - Same title already present: the old line is dropped, the new one is
    ///   appended (its quantity and condition win)
    /// - New title: appended, if the cart is below `max_items`
    ///
    /// ## Example
    /// ```rust
    /// use vitrine_core::cart::Cart;
    /// use vitrine_core::types::{Item, Product};
    ///
    /// let masc = Product::new("Nike Jordan Masc", 400);
    /// let mut cart = Cart::new();
    ///
    /// cart.add_item(Item::new(masc.clone(), 1)).unwrap();
    /// cart.add_item(Item::new(masc, 2)).unwrap();
    ///
    /// assert_eq!(cart.len(), 1);
    /// assert_eq!(cart.get_total(), 800);
    /// ```
    pub fn add_item(&mut self, item: Item) -> CoreResult<()> {
        validate_item(&item, &self.limits)?;

        let replacing = self.position(item.title()).is_some();
        if !replacing {
            validate_cart_size(self.items.len(), &self.limits)?;
        }
        validate_cart_total(&self.items, &item)?;

        self.items.retain(|line| line.product != item.product);

        debug!(
            title = %item.product.title,
            quantity = item.quantity,
            replacing,
            "Adding item to cart"
        );
        self.items.push(item);

        Ok(())
    }

    /// Removes every line for `product`. Unknown products are ignored.
    ///
    /// Returns true if a line was removed.
    pub fn remove_product(&mut self, product: &Product) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|line| line.product != *product);

        let removed = self.items.len() != initial_len;
        debug!(title = %product.title, removed, "Removing product from cart");
        removed
    }

    /// Overwrites the quantity of an existing line, keeping its condition and
    /// position.
    ///
    /// Returns `Ok(false)` if the product is not in the cart.
    pub fn update_quantity(&mut self, product: &Product, quantity: u32) -> CoreResult<bool> {
        let Some(index) = self.position(&product.title) else {
            return Ok(false);
        };

        let mut updated = self.items[index].clone();
        updated.quantity = quantity;
        validate_item(&updated, &self.limits)?;
        validate_cart_total(&self.items, &updated)?;

        debug!(title = %product.title, quantity, "Updating line quantity");
        self.items[index] = updated;

        Ok(true)
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Sum of line amounts minus each line's discount.
    pub fn total(&self) -> Money {
        self.items.iter().fold(Money::zero(), |acc, item| {
            let amount = item.line_amount();
            let discount = line_discount(amount, item);
            acc.add(amount).subtract(discount)
        })
    }

    /// [`Cart::total`] in minor units.
    pub fn get_total(&self) -> i64 {
        self.total().raw()
    }

    /// Sum of line amounts before discounts.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(Item::line_amount).sum()
    }

    /// Sum of all line discounts.
    pub fn discount(&self) -> Money {
        self.items
            .iter()
            .map(|item| line_discount(item.line_amount(), item))
            .sum()
    }

    /// Per-line amounts, in cart order.
    pub fn breakdown(&self) -> Vec<LineBreakdown> {
        self.items.iter().map(LineBreakdown::from).collect()
    }

    /// Snapshot of the cart: total plus the current lines.
    pub fn summary(&self) -> CartSummary<'_> {
        CartSummary::from_items(Cow::Borrowed(&self.items), Cow::Borrowed(&self.currency))
    }

    /// Empties the cart and returns what it held.
    ///
    /// The returned summary carries the total and lines as they were just
    /// before the cart was emptied.
    pub fn checkout(&mut self) -> CartSummary<'static> {
        let items = std::mem::take(&mut self.items);
        let currency = Cow::Owned(self.currency.clone());
        let summary = CartSummary::from_items(Cow::Owned(items), currency);

        debug!(
            total = %summary.formatted_total(),
            lines = summary.items.len(),
            "Checked out cart"
        );

        summary
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The lines in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The line for a product title, if present.
    pub fn get(&self, title: &str) -> Option<&Item> {
        self.items.iter().find(|line| line.title() == title)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Currency this cart is denominated in.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Limits enforced on this cart.
    pub fn limits(&self) -> &CartLimits {
        &self.limits
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.items.iter().position(|line| line.title() == title)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Amounts for a single line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineBreakdown {
    pub title: String,
    pub quantity: u32,
    /// `price × quantity`
    pub subtotal: Money,
    pub discount: Money,
    /// `subtotal − discount`
    pub total: Money,
}

impl From<&Item> for LineBreakdown {
    fn from(item: &Item) -> Self {
        let subtotal = item.line_amount();
        let discount = line_discount(subtotal, item);

        LineBreakdown {
            title: item.product.title.clone(),
            quantity: item.quantity,
            subtotal,
            discount,
            total: subtotal.subtract(discount),
        }
    }
}

/// Cart totals together with the lines they were computed from.
///
/// `summary()` borrows the cart's lines; `checkout()` hands them over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary<'a> {
    /// `subtotal − discount`
    pub total: Money,
    pub subtotal: Money,
    pub discount: Money,
    pub items: Cow<'a, [Item]>,
    /// Currency of the cart the summary was taken from.
    pub currency: Cow<'a, Currency>,
}

impl<'a> CartSummary<'a> {
    fn from_items(items: Cow<'a, [Item]>, currency: Cow<'a, Currency>) -> Self {
        let (subtotal, discount) =
            items
                .iter()
                .fold((Money::zero(), Money::zero()), |(subtotal, discount), item| {
                    let amount = item.line_amount();
                    (subtotal + amount, discount + line_discount(amount, item))
                });

        CartSummary {
            total: subtotal - discount,
            subtotal,
            discount,
            items,
            currency,
        }
    }

    /// The total rendered in the cart's currency, e.g. `BRL 29.00`.
    pub fn formatted_total(&self) -> String {
        self.total.display(&self.currency).to_string()
    }

    /// Detaches the summary from the cart it was taken from.
    pub fn into_owned(self) -> CartSummary<'static> {
        CartSummary {
            total: self.total,
            subtotal: self.subtotal,
            discount: self.discount,
            items: Cow::Owned(self.items.into_owned()),
            currency: Cow::Owned(self.currency.into_owned()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
