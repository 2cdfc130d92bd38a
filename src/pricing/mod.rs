//! Pricing
//!
//! All monetary arithmetic runs in `Decimal`; `f64` only appears at the
//! storage/serialization boundary. Discount resolution is a pure
//! function over a line's already-loaded inputs.

pub mod discount;
pub mod money;

pub use discount::{AppliedDiscount, ResolvedDiscount, resolve};
pub use money::{round_money, to_decimal, to_f64};
