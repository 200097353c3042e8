//! Authorization primitives for the repo layer ACL.

use std::fmt;

/// Resources the ACL guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    MerchantCoupons,
    PlatformCoupons,
    Redemptions,
    AiDiscountRequests,
    PricingPlans,
    Organizations,
    UserRoles,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Resource::MerchantCoupons => write!(f, "merchant coupons"),
            Resource::PlatformCoupons => write!(f, "platform coupons"),
            Resource::Redemptions => write!(f, "redemptions"),
            Resource::AiDiscountRequests => write!(f, "ai discount requests"),
            Resource::PricingPlans => write!(f, "pricing plans"),
            Resource::Organizations => write!(f, "organizations"),
            Resource::UserRoles => write!(f, "user roles"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    All,
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Action::All => write!(f, "all"),
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// Scope of a permission: everything, or only objects owned by the user's
/// organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    All,
    Owned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
    pub scope: Scope,
}
