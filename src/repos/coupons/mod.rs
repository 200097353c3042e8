//! Repos for coupons of both scopes and their redemption trail.

pub mod merchant;
pub mod platform;
pub mod redemptions;

pub use self::merchant::*;
pub use self::platform::*;
pub use self::redemptions::*;
