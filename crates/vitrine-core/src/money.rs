//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A 5% discount on R$ 16,00 computed in floats can land on 79.99999 and  │
//! │  round the wrong way, so golden totals drift by a centavo.              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    1600 centavos × 5 / 100 = 80 centavos, exactly                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vitrine_core::money::Money;
//! use vitrine_core::types::Percent;
//!
//! let line = Money::of(1600);
//! let discount = line.percentage(Percent::new(5).unwrap());
//!
//! assert_eq!(discount.raw(), 80);
//! assert_eq!(line.subtract(discount).raw(), 1520);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::types::Percent;

// =============================================================================
// Currency
// =============================================================================

/// Highest supported minor-unit precision.
pub const MAX_PRECISION: u8 = 4;

/// The currency a cart is denominated in.
///
/// Only used for presentation: arithmetic never looks at it, and a cart holds
/// exactly one currency for its whole life.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 alphabetic code, e.g. `BRL`.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Number of minor-unit digits (2 for BRL: 1 real = 100 centavos).
    #[serde(default = "default_precision")]
    pub precision: u8,
}

pub(crate) fn default_currency_code() -> String {
    "BRL".to_string()
}

pub(crate) fn default_precision() -> u8 {
    2
}

impl Currency {
    /// Creates a currency from its code and minor-unit precision.
    ///
    /// `precision` is capped at [`MAX_PRECISION`].
    pub fn new(code: impl Into<String>, precision: u8) -> Self {
        Currency {
            code: code.into(),
            precision: precision.min(MAX_PRECISION),
        }
    }

    /// Brazilian real, two minor-unit digits.
    pub fn brl() -> Self {
        Currency::default()
    }

    /// Number of minor units in one major unit (`10^precision`).
    ///
    /// Saturates at `i64::MAX` for precisions above 18, which only a
    /// deserialized, unvalidated currency can carry.
    pub fn minor_per_major(&self) -> i64 {
        10_i64.saturating_pow(u32::from(self.precision))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency {
            code: default_currency_code(),
            precision: default_precision(),
        }
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: `subtract` never fails on sign
/// - **Single field tuple struct**: zero-cost wrapper, serializes as a bare integer
/// - **No currency inside**: a cart is single-currency, see [`Currency`]
///
/// ## Where Money Flows
/// ```text
/// Product.price × Item.quantity ──► line amount ──┬──► Discount Engine
///                                                 │         │
///                                                 ▼         ▼
///                                  total += amount − discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use vitrine_core::money::Money;
    ///
    /// let price = Money::of(1099); // R$ 10,99
    /// assert_eq!(price.raw(), 1099);
    /// ```
    #[inline]
    pub const fn of(amount: i64) -> Self {
        Money(amount)
    }

    /// Same as [`Money::of`].
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn raw(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts.
    #[inline]
    pub const fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other` from this amount. The result may be negative.
    #[inline]
    pub const fn subtract(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }

    /// Takes `percent` of this amount.
    ///
    /// ## Truncation
    /// The result is `(amount × percent) / 100` with integer division, so the
    /// fractional minor unit is dropped toward zero:
    /// ```text
    /// 999 × 5% = 49.95  →  49
    /// -999 × 5% = -49.95  →  -49
    /// ```
    ///
    /// ```rust
    /// use vitrine_core::money::Money;
    /// use vitrine_core::types::Percent;
    ///
    /// let forty = Percent::new(40).unwrap();
    /// assert_eq!(Money::of(2000).percentage(forty).raw(), 800);
    /// assert_eq!(Money::of(999).percentage(Percent::new(5).unwrap()).raw(), 49);
    /// ```
    pub fn percentage(&self, percent: Percent) -> Money {
        // i128 so that amount × 100 cannot overflow for any i64 amount
        let part = i128::from(self.0) * i128::from(percent.value()) / 100;
        Money(part as i64)
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// Returns `None` when the product does not fit in minor units.
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    /// Renders this amount in `currency`, e.g. `BRL 12.00`.
    ///
    /// ```rust
    /// use vitrine_core::money::{Currency, Money};
    ///
    /// assert_eq!(Money::of(1520).display(&Currency::brl()).to_string(), "BRL 15.20");
    /// ```
    pub fn display<'a>(&self, currency: &'a Currency) -> MoneyDisplay<'a> {
        MoneyDisplay {
            money: *self,
            currency,
        }
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats a [`Money`] value with a currency's code and precision.
///
/// Meant for logs and plain receipts. Localized formatting belongs to
/// whatever presents the cart.
#[derive(Debug, Clone, Copy)]
pub struct MoneyDisplay<'a> {
    money: Money,
    currency: &'a Currency,
}

impl fmt::Display for MoneyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.money.raw();
        let sign = if amount < 0 { "-" } else { "" };
        let precision = usize::from(self.currency.precision);

        if precision == 0 {
            return write!(f, "{} {}{}", self.currency.code, sign, amount.unsigned_abs());
        }

        // Split the decimal digits so any precision renders exactly
        let digits = format!("{:0width$}", amount.unsigned_abs(), width = precision + 1);
        let (major, minor) = digits.split_at(digits.len() - precision);

        write!(f, "{} {}{}.{}", self.currency.code, sign, major, minor)
    }
}

/// Display without a currency shows the raw minor units.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Operator Implementations
// =============================================================================

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Money::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
