//! Repos is a module responsible for interacting with postgres db
#[macro_use]
pub mod acl;
pub mod ai_requests;
pub mod coupons;
pub mod organizations;
pub mod plans;
pub mod repo_factory;
pub mod types;
pub mod user_roles;

pub use self::acl::legacy_acl;
pub use self::acl::*;
pub use self::ai_requests::*;
pub use self::coupons::*;
pub use self::organizations::*;
pub use self::plans::*;
pub use self::repo_factory::*;
pub use self::types::*;
pub use self::user_roles::*;
