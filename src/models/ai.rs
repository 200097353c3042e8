//! AI agent authorization: which coupons an agent may offer, under what
//! policy, and tracking of the discounts agents ask for.

use std::time::SystemTime;

use serde_json;
use validator::Validate;

use diesel::sql_types::VarChar;

use models::{AgentId, AiRequestId, CouponCategory, CouponCode, DiscountType, MerchantCoupon, OrganizationId};

use schema::ai_discount_requests;

/// Outcome of the threshold check on an AI discount request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum AiRequestStatus {
    AutoApproved,
    PendingApproval,
}
enum_varchar_sql!(AiRequestStatus {
    AutoApproved => b"auto_approved",
    PendingApproval => b"pending_approval",
});

/// DB presenting by AI discount request
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable)]
#[table_name = "ai_discount_requests"]
pub struct AiDiscountRequest {
    pub id: AiRequestId,
    pub organization_id: OrganizationId,
    pub agent_id: AgentId,
    pub conversation_id: String,
    pub requested_discount: f64,
    pub coupon_code: Option<CouponCode>,
    pub status: AiRequestStatus,
    pub customer_context: Option<serde_json::Value>,
    pub created_at: SystemTime,
    pub resolved_at: Option<SystemTime>,
}

/// Payload for creating AI discount request
#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "ai_discount_requests"]
pub struct NewAiDiscountRequest {
    pub id: AiRequestId,
    pub organization_id: OrganizationId,
    pub agent_id: AgentId,
    pub conversation_id: String,
    pub requested_discount: f64,
    pub coupon_code: Option<CouponCode>,
    pub status: AiRequestStatus,
    pub customer_context: Option<serde_json::Value>,
    pub resolved_at: Option<SystemTime>,
}

/// Payload an agent sends when it wants to grant a discount.
#[derive(Deserialize, Clone, Debug, Validate)]
pub struct AiDiscountRequestPayload {
    pub organization_id: OrganizationId,
    pub agent_id: AgentId,
    pub conversation_id: String,
    #[validate(range(min = "0", max = "100"))]
    pub requested_discount: f64,
    pub coupon_code: Option<CouponCode>,
    pub customer_context: Option<serde_json::Value>,
}

/// A coupon as exposed to an AI agent. Deliberately omits usage counters
/// and validity windows; agents re-validate through the normal path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorizedDiscount {
    pub code: CouponCode,
    pub discount_type: DiscountType,
    pub value: f64,
    pub max_discount: Option<::models::Amount>,
    pub description: Option<String>,
    pub trigger_keywords: Vec<String>,
    pub category: CouponCategory,
}

impl<'a> From<&'a MerchantCoupon> for AuthorizedDiscount {
    fn from(coupon: &MerchantCoupon) -> Self {
        AuthorizedDiscount {
            code: coupon.code.clone(),
            discount_type: coupon.discount_type,
            value: coupon.value,
            max_discount: coupon.max_discount,
            description: coupon.description.clone(),
            trigger_keywords: coupon.ai_trigger_keywords.clone().unwrap_or_default(),
            // Unset category counts as negotiation-only.
            category: coupon.coupon_category.unwrap_or(CouponCategory::Negotiation),
        }
    }
}

/// The full authorization policy handed to an agent for one organization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AuthorizationPolicy {
    pub available_coupons: Vec<AuthorizedDiscount>,
    pub max_discount_percentage: f64,
    pub require_human_approval_above: f64,
    pub can_stack_discounts: bool,
    pub auto_offer_on_hesitation: bool,
    pub auto_offer_on_price_objection: bool,
}

/// Caller supplied context for building an authorization policy.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct AuthorizationOptions {
    #[serde(default)]
    pub can_negotiate: bool,
    #[serde(default)]
    pub is_internal_admin: bool,
}
