//! Monetary amount in whole currency units.

use std::fmt;
use std::ops::{Add, Sub};

use diesel::sql_types::Double;

/// Money value. The platform works in whole currency units; the discount
/// calculator rounds percentage results to whole units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, FromSqlRow, AsExpression)]
#[sql_type = "Double"]
pub struct Amount(pub f64);
newtype_sql!(Amount, Double, f64);

impl Amount {
    pub fn zero() -> Self {
        Amount(0.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
