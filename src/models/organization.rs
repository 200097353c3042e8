//! Tenant organizations, read mostly. The redemption path mutates them
//! only when a free-forever platform coupon activates the account.

use std::time::SystemTime;

use diesel::sql_types::VarChar;

use models::{CouponCode, OrganizationId, UserId};

use schema::organizations;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum OrganizationStatus {
    Trial,
    Active,
    ActiveInternal,
    Suspended,
}
enum_varchar_sql!(OrganizationStatus {
    Trial => b"trial",
    Active => b"active",
    ActiveInternal => b"active_internal",
    Suspended => b"suspended",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
}
enum_varchar_sql!(SubscriptionStatus {
    Trialing => b"trialing",
    Active => b"active",
    PastDue => b"past_due",
    Canceled => b"canceled",
});

/// DB presenting by organization
#[derive(Debug, Serialize, Deserialize, Queryable, Clone, Identifiable)]
#[table_name = "organizations"]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub owner_id: UserId,
    pub status: OrganizationStatus,
    pub subscription_status: SubscriptionStatus,
    pub is_internal: bool,
    pub is_internal_admin: bool,
    pub ai_max_discount_percentage: Option<f64>,
    pub ai_human_approval_threshold: Option<f64>,
    pub ai_can_stack_discounts: Option<bool>,
    pub ai_auto_offer_on_hesitation: Option<bool>,
    pub ai_auto_offer_on_price_objection: Option<bool>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub activated_with_coupon: Option<CouponCode>,
    pub activated_at: Option<SystemTime>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}
