use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of money in currency units (e.g. THB).
///
/// Balances keep the full precision of decimal division. Rounding to whole
/// currency units happens only in [`crate::presentation`].
pub type Money = Decimal;

/// Absolute tolerance under which an amount is treated as zero.
///
/// Equal splits such as `100 / 3` cannot be represented exactly, so sums of
/// shares may drift from zero in the last decimal places.
pub const DEFAULT_TOLERANCE: Money = dec!(0.000001);

/// Largest total a single bill may reach.
///
/// Keeping every ledger total under this bound means no sum of amounts,
/// shares or balances can overflow `Decimal`.
pub const MAX_BILL_TOTAL: Money = dec!(1000000000000000);

/// Returns `true` if `amount` is within `tolerance` of zero.
pub fn is_negligible(amount: Money, tolerance: Money) -> bool {
    amount.abs() <= tolerance
}

/// ISO 4217-style currency code a bill is denominated in.
///
/// # Examples
///
/// ```
/// use bill_split::core::money::CurrencyCode;
///
/// assert_eq!(CurrencyCode::default().as_str(), "THB");
/// assert_ne!(CurrencyCode::new("USD"), CurrencyCode::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("THB")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
