//! Validation and redemption outcomes with their wire representation.
//!
//! A failed check is a normal business outcome, not a service error, so
//! outcomes serialize as `{"valid": false, "error": "..."}` rather than
//! surfacing through the error chain.

use std::fmt;

use serde::ser::{Serialize, Serializer};

use models::{Amount, Redemption};

/// Flat taxonomy of reasons a coupon can fail validation. The serialized
/// names are the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    CouponNotFound,
    CouponDisabled,
    CouponExpired,
    CouponNotStarted,
    CouponDepleted,
    MinPurchaseNotMet,
    PlanNotEligible,
    ProductNotEligible,
    CustomerLimitReached,
    AiNotAuthorized,
    AiDiscountLimitExceeded,
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match *self {
            ValidationErrorCode::CouponNotFound => "COUPON_NOT_FOUND",
            ValidationErrorCode::CouponDisabled => "COUPON_DISABLED",
            ValidationErrorCode::CouponExpired => "COUPON_EXPIRED",
            ValidationErrorCode::CouponNotStarted => "COUPON_NOT_STARTED",
            ValidationErrorCode::CouponDepleted => "COUPON_DEPLETED",
            ValidationErrorCode::MinPurchaseNotMet => "MIN_PURCHASE_NOT_MET",
            ValidationErrorCode::PlanNotEligible => "PLAN_NOT_ELIGIBLE",
            ValidationErrorCode::ProductNotEligible => "PRODUCT_NOT_ELIGIBLE",
            ValidationErrorCode::CustomerLimitReached => "CUSTOMER_LIMIT_REACHED",
            ValidationErrorCode::AiNotAuthorized => "AI_NOT_AUTHORIZED",
            ValidationErrorCode::AiDiscountLimitExceeded => "AI_DISCOUNT_LIMIT_EXCEEDED",
        };
        write!(f, "{}", s)
    }
}

/// Non fatal notes attached to a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationWarning {
    FreeForeverCoupon,
}

/// Successful validation: the coupon plus the discount it produces.
#[derive(Debug, Clone, Serialize)]
pub struct ValidCoupon<C> {
    pub coupon: C,
    pub discount_amount: Amount,
    pub final_amount: Amount,
    pub warnings: Vec<ValidationWarning>,
}

/// Outcome of validating a coupon.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponValidation<C> {
    Valid(ValidCoupon<C>),
    Invalid(ValidationErrorCode),
}

impl<C> PartialEq for ValidCoupon<C>
where
    C: PartialEq,
{
    fn eq(&self, other: &ValidCoupon<C>) -> bool {
        self.coupon == other.coupon
            && self.discount_amount == other.discount_amount
            && self.final_amount == other.final_amount
            && self.warnings == other.warnings
    }
}

impl<C> CouponValidation<C> {
    pub fn valid(coupon: C, discount_amount: Amount, final_amount: Amount, warnings: Vec<ValidationWarning>) -> Self {
        CouponValidation::Valid(ValidCoupon {
            coupon,
            discount_amount,
            final_amount,
            warnings,
        })
    }

    pub fn invalid(code: ValidationErrorCode) -> Self {
        CouponValidation::Invalid(code)
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            CouponValidation::Valid(_) => true,
            CouponValidation::Invalid(_) => false,
        }
    }

    pub fn error_code(&self) -> Option<ValidationErrorCode> {
        match *self {
            CouponValidation::Valid(_) => None,
            CouponValidation::Invalid(code) => Some(code),
        }
    }
}

#[derive(Serialize)]
struct ValidWire<'a, C: 'a> {
    valid: bool,
    #[serde(flatten)]
    payload: &'a ValidCoupon<C>,
}

#[derive(Serialize)]
struct InvalidWire {
    valid: bool,
    error: ValidationErrorCode,
}

impl<C> Serialize for CouponValidation<C>
where
    C: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            CouponValidation::Valid(ref payload) => ValidWire { valid: true, payload }.serialize(serializer),
            CouponValidation::Invalid(code) => InvalidWire { valid: false, error: code }.serialize(serializer),
        }
    }
}

/// Outcome of redeeming a coupon.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponRedemption {
    Redeemed {
        redemption: Redemption,
        /// Free-forever platform coupons skip payment provider checkout.
        bypass_stripe: bool,
    },
    Rejected(ValidationErrorCode),
}

impl CouponRedemption {
    pub fn redeemed(redemption: Redemption, bypass_stripe: bool) -> Self {
        CouponRedemption::Redeemed { redemption, bypass_stripe }
    }

    pub fn rejected(code: ValidationErrorCode) -> Self {
        CouponRedemption::Rejected(code)
    }

    pub fn is_redeemed(&self) -> bool {
        match *self {
            CouponRedemption::Redeemed { .. } => true,
            CouponRedemption::Rejected(_) => false,
        }
    }

    pub fn error_code(&self) -> Option<ValidationErrorCode> {
        match *self {
            CouponRedemption::Redeemed { .. } => None,
            CouponRedemption::Rejected(code) => Some(code),
        }
    }
}

#[derive(Serialize)]
struct RedeemedWire<'a> {
    success: bool,
    redemption: &'a Redemption,
    bypass_stripe: bool,
}

#[derive(Serialize)]
struct RejectedWire {
    success: bool,
    error: ValidationErrorCode,
}

impl Serialize for CouponRedemption {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            CouponRedemption::Redeemed { ref redemption, bypass_stripe } => RedeemedWire {
                success: true,
                redemption,
                bypass_stripe,
            }.serialize(serializer),
            CouponRedemption::Rejected(code) => RejectedWire { success: false, error: code }.serialize(serializer),
        }
    }
}
