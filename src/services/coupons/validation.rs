//! Pure validation of coupons against a checkout. The checks run in a
//! fixed order and the first failed check decides the returned error code.

use std::time::SystemTime;

use models::*;
use services::discount;

/// The merchant purchase a coupon is validated against.
#[derive(Clone, Debug)]
pub struct MerchantPurchase {
    pub amount: Amount,
    pub product_ids: Option<Vec<ProductId>>,
    pub is_ai_request: bool,
}

fn check_status(status: CouponStatus) -> Option<ValidationErrorCode> {
    match status {
        CouponStatus::Active => None,
        CouponStatus::Expired => Some(ValidationErrorCode::CouponExpired),
        CouponStatus::Depleted => Some(ValidationErrorCode::CouponDepleted),
        CouponStatus::Disabled => Some(ValidationErrorCode::CouponDisabled),
    }
}

fn check_window(valid_from: SystemTime, valid_until: Option<SystemTime>, now: SystemTime) -> Option<ValidationErrorCode> {
    if valid_from > now {
        return Some(ValidationErrorCode::CouponNotStarted);
    }
    if let Some(valid_until) = valid_until {
        if valid_until < now {
            return Some(ValidationErrorCode::CouponExpired);
        }
    }
    None
}

fn check_usage(max_uses: Option<i32>, current_uses: i32) -> Option<ValidationErrorCode> {
    match max_uses {
        Some(max_uses) if current_uses >= max_uses => Some(ValidationErrorCode::CouponDepleted),
        _ => None,
    }
}

/// Validates a platform coupon against a subscription checkout.
pub fn validate_platform(
    coupon: PlatformCoupon,
    plan_id: &PlanId,
    billing_cycle: BillingCycle,
    original_amount: Amount,
    now: SystemTime,
) -> CouponValidation<PlatformCoupon> {
    if let Some(code) = check_status(coupon.status) {
        return CouponValidation::invalid(code);
    }
    if let Some(code) = check_window(coupon.valid_from, coupon.valid_until, now) {
        return CouponValidation::invalid(code);
    }
    if let Some(code) = check_usage(coupon.max_uses, coupon.current_uses) {
        return CouponValidation::invalid(code);
    }
    if let Some(ref plans) = coupon.applies_to_plans {
        if !plans.contains(plan_id) {
            return CouponValidation::invalid(ValidationErrorCode::PlanNotEligible);
        }
    }
    if let Some(ref cycles) = coupon.billing_cycles {
        if !cycles.contains(&billing_cycle) {
            return CouponValidation::invalid(ValidationErrorCode::PlanNotEligible);
        }
    }

    let discount_amount = discount::calculate(original_amount, coupon.discount_type, coupon.value);
    let final_amount = original_amount - discount_amount;

    let warnings = if coupon.grants_free_forever() {
        vec![ValidationWarning::FreeForeverCoupon]
    } else {
        vec![]
    };

    CouponValidation::valid(coupon, discount_amount, final_amount, warnings)
}

/// Validates a merchant coupon against a purchase.
///
/// `customer_redemptions` is the number of times this customer already
/// redeemed the coupon; `None` when the caller is anonymous.
pub fn validate_merchant(
    coupon: MerchantCoupon,
    purchase: &MerchantPurchase,
    customer_redemptions: Option<i64>,
    now: SystemTime,
) -> CouponValidation<MerchantCoupon> {
    if let Some(code) = check_status(coupon.status) {
        return CouponValidation::invalid(code);
    }
    if purchase.is_ai_request && !coupon.ai_authorized {
        return CouponValidation::invalid(ValidationErrorCode::AiNotAuthorized);
    }
    if let Some(code) = check_window(coupon.valid_from, coupon.valid_until, now) {
        return CouponValidation::invalid(code);
    }
    if let Some(code) = check_usage(coupon.max_uses, coupon.current_uses) {
        return CouponValidation::invalid(code);
    }
    if let Some(min_purchase) = coupon.min_purchase {
        if purchase.amount < min_purchase {
            return CouponValidation::invalid(ValidationErrorCode::MinPurchaseNotMet);
        }
    }
    if coupon.applies_to == AppliesTo::SpecificProducts {
        let eligible = match (coupon.product_ids.as_ref(), purchase.product_ids.as_ref()) {
            (Some(coupon_products), Some(purchase_products)) => {
                purchase_products.iter().any(|product| coupon_products.contains(product))
            }
            _ => false,
        };
        if !eligible {
            return CouponValidation::invalid(ValidationErrorCode::ProductNotEligible);
        }
    }
    if let (Some(limit), Some(redeemed)) = (coupon.max_uses_per_customer, customer_redemptions) {
        if redeemed >= i64::from(limit) {
            return CouponValidation::invalid(ValidationErrorCode::CustomerLimitReached);
        }
    }

    let discount_amount = discount::apply_cap(
        discount::calculate(purchase.amount, coupon.discount_type, coupon.value),
        coupon.max_discount,
    );

    if purchase.is_ai_request {
        if let Some(limit) = coupon.ai_discount_limit {
            let percent = if purchase.amount.0 > 0.0 {
                discount_amount.0 / purchase.amount.0 * 100.0
            } else {
                0.0
            };
            if percent > limit {
                return CouponValidation::invalid(ValidationErrorCode::AiDiscountLimitExceeded);
            }
        }
    }

    let final_amount = purchase.amount - discount_amount;

    CouponValidation::valid(coupon, discount_amount, final_amount, vec![])
}

#[cfg(test)]
pub mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use models::*;
    use repos::repo_factory::tests::*;

    fn purchase(amount: f64) -> MerchantPurchase {
        MerchantPurchase {
            amount: Amount(amount),
            product_ids: None,
            is_ai_request: false,
        }
    }

    fn coupon(code: &str) -> MerchantCoupon {
        create_merchant_coupon(code).unwrap()
    }

    #[test]
    fn test_merchant_percentage_coupon_valid() {
        let result = validate_merchant(coupon("SAVE20"), &purchase(150.0), Some(0), SystemTime::now());
        match result {
            CouponValidation::Valid(valid) => {
                assert_eq!(valid.discount_amount, Amount(30.0));
                assert_eq!(valid.final_amount, Amount(120.0));
                assert!(valid.warnings.is_empty());
            }
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_merchant_min_purchase_not_met() {
        let result = validate_merchant(coupon("WELCOME5"), &purchase(49.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::MinPurchaseNotMet));
    }

    #[test]
    fn test_merchant_min_purchase_met_exactly() {
        let result = validate_merchant(coupon("WELCOME5"), &purchase(50.0), Some(0), SystemTime::now());
        assert!(result.is_valid());
    }

    #[test]
    fn test_merchant_depleted() {
        let result = validate_merchant(coupon("VIP10"), &purchase(100.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponDepleted));
    }

    #[test]
    fn test_merchant_disabled_reported_before_anything_else() {
        let mut disabled = coupon("WELCOME5");
        disabled.status = CouponStatus::Disabled;
        // fails min purchase too, but status is checked first
        let result = validate_merchant(disabled, &purchase(1.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponDisabled));
    }

    #[test]
    fn test_merchant_not_started() {
        let mut future_coupon = coupon("SAVE20");
        future_coupon.valid_from = SystemTime::now() + Duration::from_secs(3600);
        let result = validate_merchant(future_coupon, &purchase(100.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponNotStarted));
    }

    #[test]
    fn test_merchant_expired_by_window() {
        let mut expired = coupon("SAVE20");
        expired.valid_until = Some(SystemTime::now() - Duration::from_secs(60));
        let result = validate_merchant(expired, &purchase(100.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponExpired));
    }

    #[test]
    fn test_merchant_ai_gate_precedes_window_checks() {
        let mut expired = coupon("BIGDEAL");
        expired.valid_until = Some(SystemTime::now() - Duration::from_secs(60));
        let request = MerchantPurchase {
            is_ai_request: true,
            ..purchase(100.0)
        };
        let result = validate_merchant(expired, &request, Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::AiNotAuthorized));
    }

    #[test]
    fn test_merchant_product_not_applicable() {
        let mut scoped = coupon("SAVE20");
        scoped.applies_to = AppliesTo::SpecificProducts;
        scoped.product_ids = Some(vec![ProductId(7), ProductId(8)]);
        let request = MerchantPurchase {
            product_ids: Some(vec![ProductId(1)]),
            ..purchase(100.0)
        };
        let result = validate_merchant(scoped, &request, Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::ProductNotEligible));
    }

    #[test]
    fn test_merchant_product_intersection_is_enough() {
        let mut scoped = coupon("SAVE20");
        scoped.applies_to = AppliesTo::SpecificProducts;
        scoped.product_ids = Some(vec![ProductId(7), ProductId(8)]);
        let request = MerchantPurchase {
            product_ids: Some(vec![ProductId(1), ProductId(8)]),
            ..purchase(100.0)
        };
        let result = validate_merchant(scoped, &request, Some(0), SystemTime::now());
        assert!(result.is_valid());
    }

    #[test]
    fn test_merchant_product_scoped_without_purchase_products() {
        let mut scoped = coupon("SAVE20");
        scoped.applies_to = AppliesTo::SpecificProducts;
        scoped.product_ids = Some(vec![ProductId(7)]);
        let result = validate_merchant(scoped, &purchase(100.0), Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::ProductNotEligible));
    }

    #[test]
    fn test_merchant_customer_limit_reached() {
        let mut limited = coupon("SAVE20");
        limited.max_uses_per_customer = Some(1);
        let result = validate_merchant(limited, &purchase(100.0), Some(1), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CustomerLimitReached));
    }

    #[test]
    fn test_merchant_customer_limit_unknown_customer() {
        let mut limited = coupon("SAVE20");
        limited.max_uses_per_customer = Some(1);
        // anonymous validation cannot count redemptions, limit is not applied
        let result = validate_merchant(limited, &purchase(100.0), None, SystemTime::now());
        assert!(result.is_valid());
    }

    #[test]
    fn test_merchant_max_discount_cap() {
        // BIGDEAL: 30% capped at $100
        let result = validate_merchant(coupon("BIGDEAL"), &purchase(1000.0), Some(0), SystemTime::now());
        match result {
            CouponValidation::Valid(valid) => {
                assert_eq!(valid.discount_amount, Amount(100.0));
                assert_eq!(valid.final_amount, Amount(900.0));
            }
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_merchant_ai_discount_limit_exceeded() {
        let mut generous = coupon("NEGOTIATE15");
        generous.value = 40.0;
        generous.ai_discount_limit = Some(15.0);
        let request = MerchantPurchase {
            is_ai_request: true,
            ..purchase(200.0)
        };
        let result = validate_merchant(generous, &request, Some(0), SystemTime::now());
        assert_eq!(result.error_code(), Some(ValidationErrorCode::AiDiscountLimitExceeded));
    }

    #[test]
    fn test_merchant_ai_discount_within_limit() {
        // NEGOTIATE15: 15% with an AI limit of 15
        let request = MerchantPurchase {
            is_ai_request: true,
            ..purchase(200.0)
        };
        let result = validate_merchant(coupon("NEGOTIATE15"), &request, Some(0), SystemTime::now());
        match result {
            CouponValidation::Valid(valid) => assert_eq!(valid.discount_amount, Amount(30.0)),
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_merchant_ai_discount_limit_ignored_for_humans() {
        let mut generous = coupon("NEGOTIATE15");
        generous.value = 40.0;
        generous.ai_discount_limit = Some(15.0);
        generous.ai_authorized = true;
        let result = validate_merchant(generous, &purchase(200.0), Some(0), SystemTime::now());
        match result {
            CouponValidation::Valid(valid) => assert_eq!(valid.discount_amount, Amount(80.0)),
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_merchant_zero_amount_percentage() {
        let request = MerchantPurchase {
            is_ai_request: true,
            ..purchase(0.0)
        };
        let result = validate_merchant(coupon("NEGOTIATE15"), &request, Some(0), SystemTime::now());
        match result {
            CouponValidation::Valid(valid) => {
                assert_eq!(valid.discount_amount, Amount(0.0));
                assert_eq!(valid.final_amount, Amount(0.0));
            }
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    fn platform(code: &str) -> PlatformCoupon {
        create_platform_coupon(code).unwrap()
    }

    #[test]
    fn test_platform_valid_on_applicable_plan() {
        let result = validate_platform(
            platform("LAUNCH50"),
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        match result {
            CouponValidation::Valid(valid) => {
                // 50% of $99, rounded
                assert_eq!(valid.discount_amount, Amount(50.0));
                assert_eq!(valid.final_amount, Amount(49.0));
                assert!(valid.warnings.is_empty());
            }
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_platform_plan_not_applicable() {
        let result = validate_platform(
            platform("LAUNCH50"),
            &PlanId("enterprise".to_string()),
            BillingCycle::Monthly,
            Amount(500.0),
            SystemTime::now(),
        );
        assert_eq!(result.error_code(), Some(ValidationErrorCode::PlanNotEligible));
    }

    #[test]
    fn test_platform_billing_cycle_not_applicable() {
        let result = validate_platform(
            platform("YEARLY20"),
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        assert_eq!(result.error_code(), Some(ValidationErrorCode::PlanNotEligible));
    }

    #[test]
    fn test_platform_stored_expired_status() {
        let result = validate_platform(
            platform("EXPIRED10"),
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponExpired));
    }

    #[test]
    fn test_platform_depleted_by_counter() {
        let mut depleted = platform("LAUNCH50");
        depleted.max_uses = Some(10);
        depleted.current_uses = 10;
        let result = validate_platform(
            depleted,
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        assert_eq!(result.error_code(), Some(ValidationErrorCode::CouponDepleted));
    }

    #[test]
    fn test_platform_free_forever_warning() {
        let result = validate_platform(
            platform("FREE100"),
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        match result {
            CouponValidation::Valid(valid) => {
                assert_eq!(valid.discount_amount, Amount(99.0));
                assert_eq!(valid.final_amount, Amount(0.0));
                assert_eq!(valid.warnings, vec![ValidationWarning::FreeForeverCoupon]);
            }
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }

    #[test]
    fn test_platform_full_percentage_without_flag_is_free_forever() {
        let mut full = platform("LAUNCH50");
        full.value = 100.0;
        full.applies_to_plans = None;
        let result = validate_platform(
            full,
            &PlanId("pro".to_string()),
            BillingCycle::Monthly,
            Amount(99.0),
            SystemTime::now(),
        );
        match result {
            CouponValidation::Valid(valid) => assert_eq!(valid.warnings, vec![ValidationWarning::FreeForeverCoupon]),
            CouponValidation::Invalid(code) => panic!("expected valid, got {}", code),
        }
    }
}
