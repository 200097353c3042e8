//! Discount calculator shared by both coupon scopes.

use models::{Amount, DiscountType};

/// Computes the raw discount for an amount. Percentage discounts are
/// rounded to whole currency units; fixed discounts never exceed the
/// amount itself.
pub fn calculate(amount: Amount, discount_type: DiscountType, value: f64) -> Amount {
    match discount_type {
        DiscountType::Percentage => Amount((amount.0 * value / 100.0).round()),
        DiscountType::Fixed => Amount(value.min(amount.0)),
    }
}

/// Applies an optional cap on top of the calculated discount.
pub fn apply_cap(discount: Amount, max_discount: Option<Amount>) -> Amount {
    match max_discount {
        Some(cap) if discount > cap => cap,
        _ => discount,
    }
}
