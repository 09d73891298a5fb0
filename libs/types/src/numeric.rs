//! Fixed-point minor-unit types for prices and quantities
//!
//! All prices are unsigned 64-bit integers scaled by `PRICE_SCALE` minor
//! units per major unit, so equality, ordering, and hashing are exact.
//! Quantities are plain unsigned 64-bit counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Minor units per major unit (10045 minor = 100.45 major).
pub const PRICE_SCALE: u64 = 100;

/// Price in minor units
///
/// Zero is the sentinel for "no price" (an empty book side). Serialized
/// as the raw minor-unit integer; displayed in major units with two
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Create a price from minor units
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Create a price from whole major units
    pub const fn from_major(major: u64) -> Self {
        Self(major * PRICE_SCALE)
    }

    /// Zero sentinel (empty book side)
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Raw minor-unit value
    pub const fn as_minor(&self) -> u64 {
        self.0
    }

    /// Major-unit value as a float, for indicator math only
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Check for the zero sentinel
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Notional value of `quantity` at this price, in minor units.
    ///
    /// Widened to u128 so the product cannot overflow.
    pub fn notional(&self, quantity: Quantity) -> u128 {
        self.0 as u128 * quantity.as_u64() as u128
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Price subtraction would underflow");
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / PRICE_SCALE, self.0 % PRICE_SCALE)
    }
}

/// Quantity of units in an order or trade
///
/// Positive at order creation; a remaining quantity may reach zero
/// through fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    /// Create a new quantity
    ///
    /// # Panics
    /// Panics if the quantity is zero
    pub fn new(value: u64) -> Self {
        assert!(value > 0, "Quantity must be positive");
        Self(value)
    }

    /// Try to create a quantity, returning None when zero
    pub fn try_new(value: u64) -> Option<Self> {
        if value > 0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Zero quantity (fully filled remainder)
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Check if the quantity is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Smaller of two quantities
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would underflow");
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
