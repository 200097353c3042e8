pub mod merchant;
pub mod platform;
pub mod validation;

pub use self::merchant::*;
pub use self::platform::*;
pub use self::validation::{validate_merchant, validate_platform, MerchantPurchase};
