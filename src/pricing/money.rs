//! Money conversion utilities using rust_decimal for precision
//!
//! Prices live in the database as REAL rounded to two decimal places.
//! Every calculation converts to `Decimal` first and only goes back to
//! `f64` when the result is persisted or serialized.

use rust_decimal::prelude::*;

/// Monetary values round to 2 decimal places, half-up
pub const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Inputs are validated finite at the boundary. If NaN/Infinity somehow
/// reaches here, logs an error and returns ZERO to avoid silent data
/// corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_else(|| {
        tracing::error!(value = ?value, "Decimal not representable as f64, defaulting to zero");
        0.0
    })
}

/// Round a Decimal to monetary precision (half-up)
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
