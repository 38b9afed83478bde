//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Parsing accepts values that may
//! or may not include a dollar sign and thousands separators, because spreadsheets exported by
//! other tools often carry them. Writing always produces a plain decimal with two fractional
//! digits so that snapshot files are stable.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The number of fractional digits used when writing amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Represents a money amount.
///
/// Equality and ordering compare the numeric value, so `42.5` and `42.50` are equal.
///
/// # Examples
///
/// ```
/// # use budgetbuddy::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert_eq!(amount.to_money("$"), "$1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative. Zero is neither positive nor negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Rounds to two fractional digits, the precision of the entry form.
    pub fn rounded(&self) -> Self {
        Self(round_cents(self.0))
    }

    /// Formats for display to a user, with the currency symbol and thousands separators,
    /// e.g. `-$60,000.00`.
    pub fn to_money(&self, currency: &str) -> String {
        money(self.0, currency)
    }
}

/// Rounds to cents, half a cent going away from zero.
fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats `value` like `Amount::to_money`.
pub fn money(value: Decimal, currency: &str) -> String {
    let (sign, num) = if !value.is_zero() && value.is_sign_negative() {
        ("-", value.abs())
    } else {
        ("", value)
    };
    let num = round_cents(num);
    format!(
        "{sign}{currency}{}",
        format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
    )
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: rust_decimal::Error,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AmountError({:?}, {:?})", self.input, self.source)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid amount: {}", self.input, self.source)
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // An empty cell counts as zero
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Remove dollar sign if present: "-$50.00", "$50.00"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");

        // Spreadsheets sometimes hand us scientific notation for floats
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(|source| AmountError {
                input: s.to_string(),
                source,
            })?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut value = round_cents(self.0);
        value.rescale(AMOUNT_SCALE);
        write!(f, "{value}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
