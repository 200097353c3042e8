//! Redemption records. Every successful redeem, platform or merchant,
//! lands here for auditing and analytics.

use std::time::SystemTime;

use diesel::sql_types::VarChar;

use models::{AgentId, Amount, CouponCode, CouponId, CustomerId, OrganizationId, RedemptionId};

use schema::coupon_redemptions;

/// Which coupon table a redemption points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum CouponScope {
    Platform,
    Merchant,
}
enum_varchar_sql!(CouponScope {
    Platform => b"platform",
    Merchant => b"merchant",
});

/// Who applied the coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum AppliedBy {
    User,
    AiAgent,
    Admin,
}
enum_varchar_sql!(AppliedBy {
    User => b"user",
    AiAgent => b"ai_agent",
    Admin => b"admin",
});

/// DB presenting by coupon redemption
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable, PartialEq)]
#[table_name = "coupon_redemptions"]
pub struct Redemption {
    pub id: RedemptionId,
    pub coupon_id: CouponId,
    pub coupon_scope: CouponScope,
    pub coupon_code: CouponCode,
    pub organization_id: OrganizationId,
    pub customer_id: Option<CustomerId>,
    pub original_amount: Amount,
    pub discount_amount: Amount,
    pub final_amount: Amount,
    pub applied_by: AppliedBy,
    pub agent_id: Option<AgentId>,
    pub order_id: Option<String>,
    pub redeemed_at: SystemTime,
}

/// Payload for creating coupon redemption
#[derive(Serialize, Deserialize, Insertable, Clone, Debug)]
#[table_name = "coupon_redemptions"]
pub struct NewRedemption {
    pub id: RedemptionId,
    pub coupon_id: CouponId,
    pub coupon_scope: CouponScope,
    pub coupon_code: CouponCode,
    pub organization_id: OrganizationId,
    pub customer_id: Option<CustomerId>,
    pub original_amount: Amount,
    pub discount_amount: Amount,
    pub final_amount: Amount,
    pub applied_by: AppliedBy,
    pub agent_id: Option<AgentId>,
    pub order_id: Option<String>,
}
