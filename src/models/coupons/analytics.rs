//! Aggregated coupon usage for an organization.

use models::{Amount, CouponCode};

/// Rollup over all merchant coupons of one organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponAnalytics {
    pub total_coupons: i64,
    pub active_coupons: i64,
    pub total_redemptions: i64,
    pub total_discount_given: Amount,
    pub top_coupons: Vec<CouponUsage>,
}

/// Per coupon usage line inside the rollup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponUsage {
    pub code: CouponCode,
    pub redemptions: i64,
    pub discount_given: Amount,
}
