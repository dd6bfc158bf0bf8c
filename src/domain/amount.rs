//! Amount and Description types
//!
//! Domain primitives for posting fields with business rule validation.
//! Both are validated at construction time, ensuring invalid values
//! cannot exist in the system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum description length, counted in characters
pub const MAX_DESCRIPTION_CHARS: usize = 10;

/// Amount represents a validated monetary magnitude in cents.
///
/// # Invariants
/// - Value is always positive (> 0)
///
/// # Example
/// ```
/// use clientes_ledger::domain::Amount;
///
/// let amount = Amount::new(100).unwrap();
/// assert_eq!(amount.value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(i64),
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value <= 0 {
            return Err(AmountError::NotPositive(value));
        }

        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Description is the free text attached to a posting.
///
/// Must hold between 1 and 10 characters. Length is measured in
/// Unicode scalar values, so "ação" counts as 4, not 6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

/// Errors that can occur when creating a Description
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionError {
    #[error("Description must not be empty")]
    Empty,

    #[error("Description is too long (max {MAX_DESCRIPTION_CHARS} characters, got {0})")]
    TooLong(usize),
}

impl Description {
    pub fn new(value: impl Into<String>) -> Result<Self, DescriptionError> {
        let value = value.into();
        let chars = value.chars().count();

        if chars == 0 {
            return Err(DescriptionError::Empty);
        }
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(DescriptionError::TooLong(chars));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = DescriptionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Description::new(value)
    }
}

impl From<Description> for String {
    fn from(description: Description) -> Self {
        description.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(100);
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), 100);
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(0);
        assert!(matches!(amount, Err(AmountError::NotPositive(0))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::new(-100);
        assert!(matches!(amount, Err(AmountError::NotPositive(-100))));
    }

    #[test]
    fn test_amount_deserialize_rejects_fraction() {
        assert!(serde_json::from_str::<Amount>("1.5").is_err());
    }

    #[test]
    fn test_amount_deserialize_rejects_zero() {
        let ok: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(ok.value(), 42);

        assert!(serde_json::from_str::<Amount>("0").is_err());
    }

    #[test]
    fn test_description_bounds() {
        assert!(Description::new("a").is_ok());
        assert!(Description::new("0123456789").is_ok());
        assert_eq!(Description::new(""), Err(DescriptionError::Empty));
        assert_eq!(
            Description::new("0123456789x"),
            Err(DescriptionError::TooLong(11))
        );
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        // 10 characters, 20 bytes
        let accented = "ççççççççç\u{e7}";
        assert_eq!(accented.chars().count(), 10);
        assert!(accented.len() > 10);
        assert!(Description::new(accented).is_ok());
    }
}
