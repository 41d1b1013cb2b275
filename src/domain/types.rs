//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (non-empty identifiers, bounded
//! decimal money and tax rates) so that once a value reaches the domain layer it can
//! be treated as trusted.
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Provided amount is not a decimal number with at most two fraction digits.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Provided rate is not a percentage between 0 and 100.
    #[error("invalid rate: {0}")]
    InvalidRate(String),
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(
    ModuleCode,
    "Opaque code selecting which backend dataset a list page binds to."
);
non_empty_string_newtype!(
    RecordId,
    "Identifier of a backend record, normalized to its textual form."
);

/// Name of the record field carrying the identifier.
///
/// Matching against record keys is case-insensitive, so `pid`, `Pid` and
/// `PID` all refer to the same field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct IdentifierField(String);

impl IdentifierField {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when `key` names this field, ignoring case.
    pub fn matches(&self, key: &str) -> bool {
        key.to_lowercase() == self.0.to_lowercase()
    }
}

impl ModuleCode {
    /// Wraps a non-empty literal.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }
}

impl RecordId {
    /// The id percent-encoded for use as one URL path segment.
    pub fn path_segment(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.0)
    }
}

impl TryFrom<String> for IdentifierField {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Default for IdentifierField {
    fn default() -> Self {
        Self("pid".to_string())
    }
}

impl Display for IdentifierField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a non-negative decimal string into a fixed-point integer with
/// `scale` fraction digits.
/// Monetary amount in rupees, kept to two decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// Largest amount a form may enter: one lakh crore rupees.
    pub const MAX: Money = Money(Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0));

    /// Parses a non-negative decimal amount such as `"120"` or `"99.5"`.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim();
        let invalid = || TypeConstraintError::InvalidAmount(trimmed.to_string());

        let amount = Decimal::from_str(trimmed).map_err(|_| invalid())?.normalize();
        if amount.is_sign_negative() || amount.scale() > 2 || amount > Self::MAX.0 {
            return Err(invalid());
        }
        Ok(Self(amount))
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Applies a rate, rounding half-up to the nearest paisa.
    pub fn checked_apply_rate(self, rate: Rate) -> Option<Money> {
        let amount = self
            .0
            .checked_mul(rate.0)?
            .checked_div(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Some(Self(amount))
    }

    /// Splits the amount in two; the first half is rounded down to the paisa.
    pub fn halves(self) -> (Money, Money) {
        let first = (self.0 / Decimal::TWO).round_dp_with_strategy(2, RoundingStrategy::ToZero);
        (Self(first), Self(self.0 - first))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Percentage between 0 and 100 with at most two decimal places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rate(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// Parses a percentage such as `"18"` or `"2.5"`.
    pub fn parse_percent(value: &str) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim();
        let invalid = || TypeConstraintError::InvalidRate(trimmed.to_string());

        let percent = Decimal::from_str(trimmed).map_err(|_| invalid())?.normalize();
        if percent.is_sign_negative() || percent.scale() > 2 || percent > Decimal::ONE_HUNDRED {
            return Err(invalid());
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> Decimal {
        self.0
    }
}

impl Display for Rate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
