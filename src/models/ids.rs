//! Newtype identifiers shared across the app.

use std::fmt;

use diesel::sql_types::{Integer, Uuid as SqlUuid, VarChar};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub struct CouponId(pub i32);
newtype_sql!(CouponId, Integer, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub struct OrganizationId(pub i32);
newtype_sql!(OrganizationId, Integer, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub struct CustomerId(pub i32);
newtype_sql!(CustomerId, Integer, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub struct ProductId(pub i32);
newtype_sql!(ProductId, Integer, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Integer"]
pub struct UserId(pub i32);
newtype_sql!(UserId, Integer, i32);

/// Coupon code, unique within its scope. Stored uppercased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "VarChar"]
pub struct CouponCode(pub String);
newtype_sql!(CouponCode, VarChar, String);

impl CouponCode {
    /// Canonical form used for storage and lookup.
    pub fn normalize(&self) -> CouponCode {
        CouponCode(self.0.trim().to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "VarChar"]
pub struct PlanId(pub String);
newtype_sql!(PlanId, VarChar, String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "VarChar"]
pub struct AgentId(pub String);
newtype_sql!(AgentId, VarChar, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "SqlUuid"]
pub struct RedemptionId(pub Uuid);
newtype_sql!(RedemptionId, SqlUuid, Uuid);

impl RedemptionId {
    pub fn new() -> Self {
        RedemptionId(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "SqlUuid"]
pub struct AiRequestId(pub Uuid);
newtype_sql!(AiRequestId, SqlUuid, Uuid);

impl AiRequestId {
    pub fn new() -> Self {
        AiRequestId(Uuid::new_v4())
    }
}

macro_rules! display_newtype {
    ($($t:ident),+) => {
        $(
            impl fmt::Display for $t {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    self.0.fmt(f)
                }
            }
        )+
    };
}

display_newtype!(
    CouponId,
    OrganizationId,
    CustomerId,
    ProductId,
    UserId,
    CouponCode,
    PlanId,
    AgentId,
    RedemptionId,
    AiRequestId
);
