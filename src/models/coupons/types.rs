//! Enumerations shared by both coupon scopes. The string values are the
//! wire contract and the storage representation; do not renumber or rename.

use std::fmt;

use diesel::sql_types::VarChar;

/// Coupon lifecycle status. `Depleted` is usually derived from the usage
/// counter but may also be stored directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum CouponStatus {
    Active,
    Expired,
    Depleted,
    Disabled,
}
enum_varchar_sql!(CouponStatus {
    Active => b"active",
    Expired => b"expired",
    Depleted => b"depleted",
    Disabled => b"disabled",
});

impl fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CouponStatus::Active => write!(f, "active"),
            CouponStatus::Expired => write!(f, "expired"),
            CouponStatus::Depleted => write!(f, "depleted"),
            CouponStatus::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum DiscountType {
    Percentage,
    Fixed,
}
enum_varchar_sql!(DiscountType {
    Percentage => b"percentage",
    Fixed => b"fixed",
});

/// What a merchant coupon applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum AppliesTo {
    All,
    SpecificProducts,
}
enum_varchar_sql!(AppliesTo {
    All => b"all",
    SpecificProducts => b"specific_products",
});

/// Merchant coupon category, used to decide what an AI agent may see.
/// A coupon with no stored category is treated as `Negotiation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum CouponCategory {
    PublicMarketing,
    Negotiation,
    Retention,
    Vip,
}
enum_varchar_sql!(CouponCategory {
    PublicMarketing => b"public_marketing",
    Negotiation => b"negotiation",
    Retention => b"retention",
    Vip => b"vip",
});

/// Subscription billing cycle a platform coupon may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[serde(rename_all = "snake_case")]
#[sql_type = "VarChar"]
pub enum BillingCycle {
    Monthly,
    Yearly,
}
enum_varchar_sql!(BillingCycle {
    Monthly => b"monthly",
    Yearly => b"yearly",
});
