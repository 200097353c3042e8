//! Model for platform scope coupons: discounts on the CRM subscription
//! itself, applied at checkout against a pricing plan.

use std::time::SystemTime;

use validator::{Validate, ValidationError};

use models::validation_rules::*;
use models::{Amount, BillingCycle, CouponCode, CouponId, CouponStatus, DiscountType, OrganizationId, PlanId, UserId};

use schema::platform_coupons;

/// DB presenting by platform coupon
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable)]
#[table_name = "platform_coupons"]
pub struct PlatformCoupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub description: Option<String>,
    pub status: CouponStatus,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(with = "applicability")]
    pub applies_to_plans: Option<Vec<PlanId>>,
    #[serde(with = "applicability")]
    pub billing_cycles: Option<Vec<BillingCycle>>,
    pub is_free_forever: bool,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub valid_from: SystemTime,
    pub valid_until: Option<SystemTime>,
    pub created_by: Option<UserId>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl PlatformCoupon {
    /// A coupon grants free-forever access either through the explicit flag
    /// or by being a 100% discount.
    pub fn grants_free_forever(&self) -> bool {
        self.is_free_forever || (self.discount_type == DiscountType::Percentage && self.value >= 100.0)
    }
}

/// Payload for creating platform coupon
#[derive(Serialize, Deserialize, Insertable, Clone, Validate, Debug)]
#[table_name = "platform_coupons"]
#[validate(schema(function = "validate_new_platform_coupon", skip_on_field_errors = "true"))]
pub struct NewPlatformCoupon {
    #[validate(custom = "validate_coupon_code")]
    pub code: CouponCode,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: f64,
    #[serde(default, with = "applicability")]
    pub applies_to_plans: Option<Vec<PlanId>>,
    #[serde(default, with = "applicability")]
    pub billing_cycles: Option<Vec<BillingCycle>>,
    #[serde(default)]
    pub is_free_forever: bool,
    #[validate(custom = "validate_non_negative_count")]
    pub max_uses: Option<i32>,
    pub valid_from: SystemTime,
    pub valid_until: Option<SystemTime>,
    pub created_by: Option<UserId>,
}

fn validate_new_platform_coupon(payload: &NewPlatformCoupon) -> Result<(), ValidationError> {
    validate_discount_value(payload.discount_type, payload.value)
}

/// Payload for validating a platform coupon at subscription checkout.
#[derive(Deserialize, Clone, Debug)]
pub struct ValidatePlatformCoupon {
    pub code: CouponCode,
    pub plan_id: PlanId,
    pub billing_cycle: BillingCycle,
    pub original_amount: Amount,
}

/// Payload for redeeming a platform coupon.
#[derive(Deserialize, Clone, Debug)]
pub struct RedeemPlatformCoupon {
    pub code: CouponCode,
    pub organization_id: OrganizationId,
    pub plan_id: PlanId,
    pub billing_cycle: BillingCycle,
    pub original_amount: Amount,
    pub applied_by: Option<::models::AppliedBy>,
}

/// `applies_to_plans` / `billing_cycles` travel as either the string
/// `"all"` or a non empty array. `None` in the DB means unrestricted.
pub mod applicability {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire<T> {
        Tag(String),
        Values(Vec<T>),
    }

    pub fn serialize<T, S>(value: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match *value {
            Some(ref values) => values.serialize(serializer),
            None => "all".serialize(serializer),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Wire::deserialize(deserializer)? {
            Wire::Tag(ref tag) if tag == "all" => Ok(None),
            Wire::Tag(tag) => Err(::serde::de::Error::custom(format!("unknown applicability tag: {}", tag))),
            Wire::Values(ref values) if values.is_empty() => Ok(None),
            Wire::Values(values) => Ok(Some(values)),
        }
    }
}
