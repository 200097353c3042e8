use std::borrow::Cow;
use std::collections::HashMap;

use regex::Regex;
use validator::ValidationError;

use models::Amount;

pub fn validate_coupon_code(code: &::models::CouponCode) -> Result<(), ValidationError> {
    lazy_static! {
        static ref COUPON_CODE_RE: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{2,31}$").unwrap();
    }

    if COUPON_CODE_RE.is_match(&code.0) {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("code"),
            message: Some(Cow::from("Coupon code must be 3-32 characters: letters, digits, `-` or `_`.")),
            params: HashMap::new(),
        })
    }
}

pub fn validate_non_negative_amount(amount: &Amount) -> Result<(), ValidationError> {
    if amount.0 >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("amount"),
            message: Some(Cow::from("Amount must be non negative.")),
            params: HashMap::new(),
        })
    }
}

pub fn validate_non_negative_count(count: i32) -> Result<(), ValidationError> {
    if count >= 0 {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("count"),
            message: Some(Cow::from("Count must be non negative.")),
            params: HashMap::new(),
        })
    }
}

pub fn validate_non_negative_value(value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("value"),
            message: Some(Cow::from("Value must be non negative.")),
            params: HashMap::new(),
        })
    }
}

/// Checks a discount definition: percentages must stay within 0..=100,
/// fixed discounts must be non negative.
pub fn validate_discount_value(discount_type: ::models::DiscountType, value: f64) -> Result<(), ValidationError> {
    let valid = match discount_type {
        ::models::DiscountType::Percentage => value >= 0.0 && value <= 100.0,
        ::models::DiscountType::Fixed => value >= 0.0,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError {
            code: Cow::from("value"),
            message: Some(Cow::from("Percentage discounts must be within 0-100, fixed discounts non negative.")),
            params: HashMap::new(),
        })
    }
}
