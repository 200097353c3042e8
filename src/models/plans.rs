//! Pricing plan registry the platform coupons resolve against.

use std::time::SystemTime;

use validator::Validate;

use models::validation_rules::validate_non_negative_amount;
use models::{Amount, PlanId};

use schema::pricing_plans;

/// DB presenting by pricing plan
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable)]
#[table_name = "pricing_plans"]
pub struct PricingPlan {
    pub id: i32,
    pub plan_id: PlanId,
    pub name: String,
    pub monthly_price: Amount,
    pub yearly_price: Amount,
    pub display_order: i32,
    pub is_active: bool,
    pub is_public: bool,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

/// Payload for creating pricing plan
#[derive(Serialize, Deserialize, Insertable, Clone, Validate, Debug)]
#[table_name = "pricing_plans"]
pub struct NewPricingPlan {
    pub plan_id: PlanId,
    pub name: String,
    #[validate(custom = "validate_non_negative_amount")]
    pub monthly_price: Amount,
    #[validate(custom = "validate_non_negative_amount")]
    pub yearly_price: Amount,
    pub display_order: i32,
    pub is_active: bool,
    pub is_public: bool,
}

/// Payload for updating pricing plan
#[derive(Serialize, Deserialize, Insertable, AsChangeset, Validate, Debug, Clone)]
#[table_name = "pricing_plans"]
pub struct UpdatePricingPlan {
    pub name: Option<String>,
    #[validate(custom = "validate_non_negative_amount")]
    pub monthly_price: Option<Amount>,
    #[validate(custom = "validate_non_negative_amount")]
    pub yearly_price: Option<Amount>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_public: Option<bool>,
}
