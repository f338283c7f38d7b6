//! Product category enumeration.
//!
//! # Responsibility
//! - Define the closed set of classification tags for products.
//! - Convert tags to and from their stored text form.
//!
//! # Invariants
//! - The variant set is closed; unknown tags are rejected, never coerced.
//! - Store tags are upper-case and stable across releases.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Classification tag attached to every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Placeholder for products that were never classified.
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    /// Every variant in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Returns the tag persisted in `products.category`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
        }
    }

    /// Parses a tag, ignoring surrounding whitespace and ASCII case.
    ///
    /// # Errors
    /// - Returns `CategoryParseError` for any tag outside the closed set.
    pub fn parse(value: &str) -> Result<Self, CategoryParseError> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| CategoryParseError {
                value: value.to_string(),
            })
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Raised when text does not name a known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError {
    pub value: String,
}

impl Display for CategoryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid category value `{}`", self.value)
    }
}

impl Error for CategoryParseError {}

#[cfg(test)]
mod tests {
    use super::{Category, CategoryParseError};

    #[test]
    fn tags_roundtrip_through_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Ok(category));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(" cloths ".parse::<Category>(), Ok(Category::Cloths));
        assert_eq!("Tools".parse::<Category>(), Ok(Category::Tools));
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let err = Category::parse("GADGETS").unwrap_err();
        assert_eq!(
            err,
            CategoryParseError {
                value: "GADGETS".to_string()
            }
        );
        assert!(err.to_string().contains("GADGETS"));
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(Category::default(), Category::Unknown);
    }
}
