//! ISO 3166-1 alpha-2 country codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input is empty or whitespace.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not two ASCII letters.
    #[error("country code must be two letters (got {0:?})")]
    Malformed(String),
}

/// A two-letter country code, always stored upper case.
///
/// Parsing is case-insensitive so `"sn"` and `"SN"` produce the same value.
///
/// ```
/// use nature_pharmacy_core::CountryCode;
///
/// let code = CountryCode::parse(" sn ").unwrap();
/// assert_eq!(code.as_str(), "SN");
/// assert!(CountryCode::parse("SEN").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`CountryCodeError::Empty`] for blank input and
    /// [`CountryCodeError::Malformed`] unless the input is exactly two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CountryCodeError::Empty);
        }
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(CountryCodeError::Malformed(s.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!(CountryCode::parse("sn").unwrap().as_str(), "SN");
        assert_eq!(CountryCode::parse("Fr").unwrap().as_str(), "FR");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(CountryCode::parse("  "), Err(CountryCodeError::Empty));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            CountryCode::parse("SEN"),
            Err(CountryCodeError::Malformed(_))
        ));
        assert!(matches!(
            CountryCode::parse("S1"),
            Err(CountryCodeError::Malformed(_))
        ));
        assert!(matches!(
            CountryCode::parse("É"),
            Err(CountryCodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_serde_normalizes() {
        let code: CountryCode = serde_json::from_str("\"ci\"").unwrap();
        assert_eq!(code.as_str(), "CI");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"CI\"");
    }
}
