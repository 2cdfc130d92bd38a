//! Discount Resolver
//!
//! Pure computation of a line item's discount amount. Eligibility and
//! active-state checks happen in the order builder before this is
//! called; an ineligible or missing discount simply arrives as `None`.
//!
//! Semantics per type:
//! - percentage: `line_subtotal * value / 100`
//! - fixed: flat `value`, capped at the line subtotal
//! - buy1take1: for every full pair of units, one unit is free

use crate::db::models::{Discount, DiscountType};
use crate::pricing::money::round_money;
use rust_decimal::Decimal;

/// Snapshot of the discount definition that was applied to a line
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDiscount {
    pub id: i64,
    pub name: String,
    pub discount_type: DiscountType,
}

/// Outcome of resolving a discount against one line
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDiscount {
    /// Rounded amount, clamped to `[0, line_subtotal]`
    pub amount: Decimal,
    /// Present whenever a discount was applied, even at amount zero
    /// (e.g. buy1take1 with quantity 1)
    pub applied: Option<AppliedDiscount>,
}

impl ResolvedDiscount {
    fn none() -> Self {
        ResolvedDiscount {
            amount: Decimal::ZERO,
            applied: None,
        }
    }
}

/// Resolve the discount for one order line.
///
/// `unit_price` and `line_subtotal` are already in `Decimal`;
/// `line_subtotal` is `unit_price * quantity`.
pub fn resolve(
    discount: Option<&Discount>,
    unit_price: Decimal,
    quantity: i64,
    line_subtotal: Decimal,
) -> ResolvedDiscount {
    let Some(discount) = discount else {
        return ResolvedDiscount::none();
    };
    if !discount.is_active {
        return ResolvedDiscount::none();
    }

    let raw = match discount.discount_type {
        DiscountType::Percentage => {
            line_subtotal * crate::pricing::money::to_decimal(discount.value)
                / Decimal::ONE_HUNDRED
        }
        DiscountType::Fixed => crate::pricing::money::to_decimal(discount.value),
        DiscountType::Buy1Take1 => Decimal::from(quantity / 2) * unit_price,
    };

    let amount = round_money(raw)
        .max(Decimal::ZERO)
        .min(round_money(line_subtotal));

    ResolvedDiscount {
        amount,
        applied: Some(AppliedDiscount {
            id: discount.id,
            name: discount.name.clone(),
            discount_type: discount.discount_type,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::money::{to_decimal, to_f64};

    fn discount(id: i64, discount_type: DiscountType, value: f64) -> Discount {
        Discount {
            id,
            name: format!("discount-{id}"),
            discount_type,
            value,
            is_active: true,
            created_at: 0,
            updated_at: 0,
            menu_item_ids: vec![],
        }
    }

    fn resolve_line(d: Option<&Discount>, unit_price: f64, quantity: i64) -> ResolvedDiscount {
        let unit = to_decimal(unit_price);
        let subtotal = unit * Decimal::from(quantity);
        resolve(d, unit, quantity, subtotal)
    }

    #[test]
    fn test_percentage() {
        let d = discount(1, DiscountType::Percentage, 10.0);
        // 2 x 150.00, 10% off
        let resolved = resolve_line(Some(&d), 150.0, 2);
        assert_eq!(to_f64(resolved.amount), 30.0);
        assert_eq!(resolved.applied.as_ref().map(|a| a.id), Some(1));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let d = discount(1, DiscountType::Percentage, 15.0);
        // 1 x 9.99 at 15% = 1.4985 -> 1.50
        let resolved = resolve_line(Some(&d), 9.99, 1);
        assert_eq!(to_f64(resolved.amount), 1.50);
    }

    #[test]
    fn test_fixed_capped_at_subtotal() {
        let d = discount(2, DiscountType::Fixed, 50.0);
        // 1 x 30.00, fixed 50 must not exceed the line
        let resolved = resolve_line(Some(&d), 30.0, 1);
        assert_eq!(to_f64(resolved.amount), 30.0);

        let resolved = resolve_line(Some(&d), 80.0, 1);
        assert_eq!(to_f64(resolved.amount), 50.0);
    }

    #[test]
    fn test_buy1take1_pairs() {
        let d = discount(3, DiscountType::Buy1Take1, 0.0);
        // 3 x 100.00: one full pair, one unit free
        let resolved = resolve_line(Some(&d), 100.0, 3);
        assert_eq!(to_f64(resolved.amount), 100.0);

        let resolved = resolve_line(Some(&d), 100.0, 4);
        assert_eq!(to_f64(resolved.amount), 200.0);
    }

    #[test]
    fn test_buy1take1_single_unit_is_zero_but_applied() {
        let d = discount(3, DiscountType::Buy1Take1, 0.0);
        let resolved = resolve_line(Some(&d), 100.0, 1);
        assert_eq!(resolved.amount, Decimal::ZERO);
        // The snapshot still records the discount
        assert!(resolved.applied.is_some());
    }

    #[test]
    fn test_none_and_inactive() {
        assert_eq!(resolve_line(None, 10.0, 1), ResolvedDiscount::none());

        let mut d = discount(4, DiscountType::Percentage, 50.0);
        d.is_active = false;
        let resolved = resolve_line(Some(&d), 10.0, 1);
        assert_eq!(resolved.amount, Decimal::ZERO);
        assert!(resolved.applied.is_none());
    }
}
