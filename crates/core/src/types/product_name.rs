//! Product display name.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductNameError {
    /// Empty or whitespace only.
    #[error("product name cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product name must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A non-blank product name, stored without surrounding whitespace.
///
/// Names are not unique: two products may share a name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ProductName(String);

impl ProductName {
    /// Maximum length of a product name, in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `ProductName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// 255 characters.
    pub fn parse(s: &str) -> Result<Self, ProductNameError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductNameError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ProductName {
    type Error = ProductNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductName> for String {
    fn from(name: ProductName) -> Self {
        name.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let name = ProductName::parse("  Widget ").unwrap();
        assert_eq!(name.as_str(), "Widget");
    }

    #[test]
    fn test_parse_empty_and_blank() {
        assert_eq!(ProductName::parse(""), Err(ProductNameError::Empty));
        assert_eq!(ProductName::parse(" \t\n"), Err(ProductNameError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(ProductName::parse(&"w".repeat(255)).is_ok());
        assert_eq!(
            ProductName::parse(&"w".repeat(256)),
            Err(ProductNameError::TooLong { max: 255 })
        );
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<ProductName>("\"Widget\"").is_ok());
        assert!(serde_json::from_str::<ProductName>("\"   \"").is_err());
    }
}
