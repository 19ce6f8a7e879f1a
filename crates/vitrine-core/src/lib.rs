//! # vitrine-core: Shopping Cart with Discount Resolution
//!
//! This crate holds the cart and its discount engine as pure, in-memory
//! business logic: no database, no network, no UI.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ★ vitrine-core ★                                   │
//! │                                                                         │
//! │   ┌───────────┐   line amount   ┌─────────────┐                         │
//! │   │   cart    │ ──────────────► │  discount   │  Policy::Percentage     │
//! │   │   Cart    │ ◄────────────── │  engine     │  Policy::Quantity       │
//! │   │  Summary  │    discount     └──────┬──────┘  best-of-many           │
//! │   └─────┬─────┘                        │                                │
//! │         │                              ▼                                │
//! │   ┌─────▼─────┐   ┌───────────┐   ┌───────────┐   ┌───────────┐         │
//! │   │   types   │   │ validation│   │   money   │   │  config   │         │
//! │   │  Product  │   │   rules   │   │   Money   │   │ currency  │         │
//! │   │   Item    │   │  checks   │   │ Currency  │   │  limits   │         │
//! │   └───────────┘   └───────────┘   └───────────┘   └───────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Item, DiscountCondition, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`discount`] - Discount policies and the per-line dispatcher
//! - [`cart`] - The cart, its totals and checkout
//! - [`validation`] - Input validation for items entering a cart
//! - [`config`] - Currency and limits, loaded at startup
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::{Cart, DiscountCondition, Item, Percent, Product};
//!
//! let masc = Product::new("Nike Jordan Masc", 400);
//! let fem = Product::new("Nike Jordan Fem", 300);
//!
//! let mut cart = Cart::new();
//! cart.add_item(
//!     Item::new(masc, 3).with_conditions(vec![
//!         DiscountCondition::quantity_above(2),
//!         DiscountCondition::percentage_above(Percent::new(20)?, 2),
//!     ]),
//! )?;
//! cart.add_item(Item::new(fem, 1))?;
//!
//! // 1200 − 480 (40% beats 20%) + 300
//! assert_eq!(cart.get_total(), 1020);
//!
//! let receipt = cart.checkout();
//! assert_eq!(receipt.formatted_total(), "BRL 10.20");
//! assert_eq!(cart.get_total(), 0);
//! # Ok::<(), vitrine_core::CoreError>(())
//! ```
//!
//! ## Logging
//! Cart mutations emit `debug!` events and discount resolution emits `trace!`
//! events through `tracing`. Installing a subscriber is up to the embedder.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod config;
pub mod discount;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vitrine_core::Cart` instead of
// `use vitrine_core::cart::Cart`

pub use cart::{Cart, CartSummary, LineBreakdown};
pub use config::{CartConfig, CartLimits};
pub use discount::Policy;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum number of distinct lines in a cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Default maximum quantity on a single line.
pub const MAX_ITEM_QUANTITY: u32 = 999;
