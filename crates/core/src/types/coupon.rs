//! Coupon code type and the server-granted discount attached to it.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Errors that can occur when parsing a [`CouponCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CouponCodeError {
    /// The input string is empty (after trimming whitespace).
    #[error("coupon code cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("coupon code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside the allowed set.
    #[error("coupon code contains invalid character '{found}'")]
    InvalidCharacter {
        /// The offending character.
        found: char,
    },
}

/// A coupon code identifier.
///
/// Codes are case-insensitive; parsing normalizes them to uppercase so the
/// same code always compares and serializes identically.
///
/// ## Constraints
///
/// - Length: 1-32 characters after trimming
/// - ASCII letters, digits, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use bazaar_core::CouponCode;
///
/// let code = CouponCode::parse("summer25").unwrap();
/// assert_eq!(code.as_str(), "SUMMER25");
///
/// assert!(CouponCode::parse("").is_err());
/// assert!(CouponCode::parse("no spaces").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    /// Maximum length of a coupon code.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `CouponCode` from a string, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input (after trimming):
    /// - Is empty
    /// - Is longer than 32 characters
    /// - Contains characters other than ASCII letters, digits, `-`, or `_`
    pub fn parse(s: &str) -> Result<Self, CouponCodeError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(CouponCodeError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(CouponCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(found) = trimmed
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(CouponCodeError::InvalidCharacter { found });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the normalized code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `CouponCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A coupon the server has validated against the current cart.
///
/// The discount amount is computed server-side and trusted as-is; the client
/// performs no discount-rule evaluation of its own. Applied coupons live only
/// for the duration of a checkout session and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// The normalized coupon code.
    pub code: CouponCode,
    /// Fixed discount amount granted by the server.
    pub discount: Price,
    /// Display string describing the coupon.
    pub description: String,
}
