//! Coupon models for both scopes, plus validation and redemption outcomes.

pub mod analytics;
pub mod merchant;
pub mod platform;
pub mod redemptions;
pub mod types;
pub mod validation;

pub use self::analytics::*;
pub use self::merchant::*;
pub use self::platform::*;
pub use self::redemptions::*;
pub use self::types::*;
pub use self::validation::*;
