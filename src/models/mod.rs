//! Models of all of the objects the coupon engine works with, with
//! serialization and deserialization.

pub mod ai;
pub mod amount;
pub mod authorization;
pub mod coupons;
pub mod ids;
pub mod organization;
pub mod plans;
pub mod user_role;
pub mod validation_rules;

pub use self::ai::*;
pub use self::amount::*;
pub use self::authorization::*;
pub use self::coupons::*;
pub use self::ids::*;
pub use self::organization::*;
pub use self::plans::*;
pub use self::user_role::*;
