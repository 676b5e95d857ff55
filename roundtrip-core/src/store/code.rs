//! Short codes that identify stored routes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of characters in a route code.
pub const ROUTE_CODE_LEN: usize = 8;

/// Why a string is not a valid [`RouteCode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteCodeError {
    /// The code does not have exactly [`ROUTE_CODE_LEN`] characters.
    #[error("route codes have {ROUTE_CODE_LEN} characters, found {found}")]
    Length {
        /// Characters supplied.
        found: usize,
    },
    /// The code contains something other than ASCII letters and digits.
    #[error("route codes are alphanumeric, found {character:?}")]
    InvalidCharacter {
        /// First offending character.
        character: char,
    },
}

/// Eight ASCII alphanumerics, stored uppercase.
///
/// Parsing is case-insensitive so codes typed in lowercase still match.
///
/// # Examples
/// ```
/// use roundtrip_core::RouteCode;
///
/// let code: RouteCode = "ab12cd34".parse().expect("valid code");
/// assert_eq!(code.as_str(), "AB12CD34");
/// assert!(RouteCode::parse("short").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteCode(String);

impl RouteCode {
    /// Validate and normalise a code.
    ///
    /// # Errors
    ///
    /// Returns [`RouteCodeError`] when `value` is not eight ASCII
    /// alphanumerics.
    pub fn parse(value: &str) -> Result<Self, RouteCodeError> {
        let value = value.trim();
        if let Some(character) = value.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(RouteCodeError::InvalidCharacter { character });
        }
        if value.len() != ROUTE_CODE_LEN {
            return Err(RouteCodeError::Length { found: value.len() });
        }
        Ok(Self(value.to_ascii_uppercase()))
    }

    /// The normalised code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RouteCode {
    type Err = RouteCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AB12CD34", "AB12CD34")]
    #[case("ab12cd34", "AB12CD34")]
    #[case(" 0000zzzz ", "0000ZZZZ")]
    fn accepts_alphanumeric_codes(#[case] input: &str, #[case] expected: &str) {
        let code = RouteCode::parse(input).expect("valid code");
        assert_eq!(code.as_str(), expected);
        assert_eq!(code.to_string(), expected);
    }

    #[rstest]
    #[case("ABC", RouteCodeError::Length { found: 3 })]
    #[case("ABCDEFGHI", RouteCodeError::Length { found: 9 })]
    #[case("ABCD-123", RouteCodeError::InvalidCharacter { character: '-' })]
    #[case("ABCDÉ123", RouteCodeError::InvalidCharacter { character: 'É' })]
    fn rejects_malformed_codes(#[case] input: &str, #[case] expected: RouteCodeError) {
        assert_eq!(RouteCode::parse(input), Err(expected));
    }
}
