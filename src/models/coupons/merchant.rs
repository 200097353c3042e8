//! Model for merchant scope coupons: discounts a tenant organization
//! grants on its own e-commerce sales.

use std::time::SystemTime;

use validator::{Validate, ValidationError};

use models::validation_rules::*;
use models::{Amount, CouponCode, CouponId, CustomerId, OrganizationId, ProductId, UserId};
use models::{AppliesTo, CouponCategory, CouponStatus, DiscountType};

use schema::merchant_coupons;

/// DB presenting by merchant coupon
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable)]
#[table_name = "merchant_coupons"]
pub struct MerchantCoupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub organization_id: OrganizationId,
    pub description: Option<String>,
    pub status: CouponStatus,
    pub discount_type: DiscountType,
    pub value: f64,
    pub min_purchase: Option<Amount>,
    pub max_discount: Option<Amount>,
    pub applies_to: AppliesTo,
    pub product_ids: Option<Vec<ProductId>>,
    pub max_uses: Option<i32>,
    pub current_uses: i32,
    pub max_uses_per_customer: Option<i32>,
    pub valid_from: SystemTime,
    pub valid_until: Option<SystemTime>,
    pub ai_authorized: bool,
    pub ai_discount_limit: Option<f64>,
    pub coupon_category: Option<CouponCategory>,
    pub ai_trigger_keywords: Option<Vec<String>>,
    pub created_by: Option<UserId>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Payload for creating merchant coupon
#[derive(Serialize, Deserialize, Insertable, Clone, Validate, Debug)]
#[table_name = "merchant_coupons"]
#[validate(schema(function = "validate_new_merchant_coupon", skip_on_field_errors = "true"))]
pub struct NewMerchantCoupon {
    #[validate(custom = "validate_coupon_code")]
    pub code: CouponCode,
    pub organization_id: OrganizationId,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: f64,
    #[validate(custom = "validate_non_negative_amount")]
    pub min_purchase: Option<Amount>,
    #[validate(custom = "validate_non_negative_amount")]
    pub max_discount: Option<Amount>,
    pub applies_to: AppliesTo,
    pub product_ids: Option<Vec<ProductId>>,
    #[validate(custom = "validate_non_negative_count")]
    pub max_uses: Option<i32>,
    #[validate(custom = "validate_non_negative_count")]
    pub max_uses_per_customer: Option<i32>,
    pub valid_from: SystemTime,
    pub valid_until: Option<SystemTime>,
    pub ai_authorized: bool,
    #[validate(range(min = "0", max = "100"))]
    pub ai_discount_limit: Option<f64>,
    pub coupon_category: Option<CouponCategory>,
    pub ai_trigger_keywords: Option<Vec<String>>,
    pub created_by: Option<UserId>,
}

fn validate_new_merchant_coupon(payload: &NewMerchantCoupon) -> Result<(), ValidationError> {
    validate_discount_value(payload.discount_type, payload.value)
}

/// Payload for updating merchant coupon
#[derive(Serialize, Deserialize, Insertable, AsChangeset, Validate, Debug, Clone)]
#[table_name = "merchant_coupons"]
pub struct UpdateMerchantCoupon {
    pub description: Option<String>,
    pub status: Option<CouponStatus>,
    // The stored discount type is not part of the payload, so only
    // non-negativity can be checked here.
    #[validate(custom = "validate_non_negative_value")]
    pub value: Option<f64>,
    #[validate(custom = "validate_non_negative_amount")]
    pub min_purchase: Option<Amount>,
    #[validate(custom = "validate_non_negative_amount")]
    pub max_discount: Option<Amount>,
    pub applies_to: Option<AppliesTo>,
    pub product_ids: Option<Vec<ProductId>>,
    #[validate(custom = "validate_non_negative_count")]
    pub max_uses: Option<i32>,
    #[validate(custom = "validate_non_negative_count")]
    pub max_uses_per_customer: Option<i32>,
    pub valid_until: Option<SystemTime>,
    pub ai_authorized: Option<bool>,
    #[validate(range(min = "0", max = "100"))]
    pub ai_discount_limit: Option<f64>,
    pub coupon_category: Option<CouponCategory>,
    pub ai_trigger_keywords: Option<Vec<String>>,
}

impl UpdateMerchantCoupon {
    /// Changeset that turns a coupon off without touching anything else.
    pub fn disable() -> Self {
        UpdateMerchantCoupon {
            description: None,
            status: Some(CouponStatus::Disabled),
            value: None,
            min_purchase: None,
            max_discount: None,
            applies_to: None,
            product_ids: None,
            max_uses: None,
            max_uses_per_customer: None,
            valid_until: None,
            ai_authorized: None,
            ai_discount_limit: None,
            coupon_category: None,
            ai_trigger_keywords: None,
        }
    }
}

/// Payload for validating a merchant coupon against a purchase.
#[derive(Deserialize, Clone, Debug)]
pub struct ValidateMerchantCoupon {
    pub code: CouponCode,
    pub organization_id: OrganizationId,
    pub purchase_amount: Amount,
    pub product_ids: Option<Vec<ProductId>>,
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub is_ai_request: bool,
}

/// Payload for redeeming a merchant coupon.
#[derive(Deserialize, Clone, Debug)]
pub struct RedeemMerchantCoupon {
    pub code: CouponCode,
    pub organization_id: OrganizationId,
    pub customer_id: CustomerId,
    pub purchase_amount: Amount,
    pub order_id: String,
    pub product_ids: Option<Vec<ProductId>>,
    pub applied_by: Option<::models::AppliedBy>,
    pub agent_id: Option<::models::AgentId>,
}

/// Search coupon by code within an organization scope.
#[derive(Deserialize, Clone, Debug)]
pub struct MerchantCouponsSearchCodePayload {
    pub code: CouponCode,
    pub organization_id: OrganizationId,
}
