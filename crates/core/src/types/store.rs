//! Store identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`StoreId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreIdError {
    /// The input is empty (or only whitespace).
    #[error("store id cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("store id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that is not allowed in a remote path.
    #[error("store id cannot contain '{0}'")]
    InvalidCharacter(char),
}

/// Identifier of a store (a shop namespace).
///
/// A store id scopes both the remote inventory path and the local order cache
/// key, so it must be usable as a single path segment.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-128 characters
/// - Must not contain `/`, `.`, `#`, `$`, `[`, `]` or control characters
///
/// Other characters (spaces, `?`, `%`, ...) are allowed; adapters escape them.
///
/// ## Examples
///
/// ```
/// use catch_of_the_day_core::StoreId;
///
/// let id = StoreId::parse("shop-1").unwrap();
/// assert_eq!(id.remote_path(), "shop-1/fishes");
/// assert_eq!(id.order_cache_key(), "order-shop-1");
///
/// assert!(StoreId::parse("").is_err());
/// assert!(StoreId::parse("a/b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct StoreId(String);

impl StoreId {
    /// Maximum length of a store id.
    pub const MAX_LENGTH: usize = 128;

    /// Characters reserved by the remote path syntax.
    const RESERVED: &'static [char] = &['/', '.', '#', '$', '[', ']'];

    /// Parse a `StoreId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains a reserved path character or a control character.
    pub fn parse(s: &str) -> Result<Self, StoreIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StoreIdError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(StoreIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| Self::RESERVED.contains(c) || c.is_control())
        {
            return Err(StoreIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the store id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remote path the store's inventory is bound to.
    #[must_use]
    pub fn remote_path(&self) -> String {
        format!("{}/fishes", self.0)
    }

    /// Local cache key the store's order is kept under.
    #[must_use]
    pub fn order_cache_key(&self) -> String {
        format!("order-{}", self.0)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StoreId {
    type Err = StoreIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoreId {
    type Error = StoreIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StoreId> for String {
    fn from(id: StoreId) -> Self {
        id.0
    }
}

impl AsRef<str> for StoreId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(StoreId::parse("shop-1").is_ok());
        assert!(StoreId::parse("gorgeous-smoky-fish").is_ok());
        assert!(StoreId::parse("a").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = StoreId::parse("  shop-1 \n").unwrap();
        assert_eq!(id.as_str(), "shop-1");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(StoreId::parse(""), Err(StoreIdError::Empty));
        assert_eq!(StoreId::parse("   "), Err(StoreIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(StoreId::MAX_LENGTH + 1);
        assert!(matches!(
            StoreId::parse(&long),
            Err(StoreIdError::TooLong { .. })
        ));
        assert!(StoreId::parse(&"a".repeat(StoreId::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_reserved_characters() {
        assert_eq!(
            StoreId::parse("shop/1"),
            Err(StoreIdError::InvalidCharacter('/'))
        );
        assert_eq!(
            StoreId::parse("shop.1"),
            Err(StoreIdError::InvalidCharacter('.'))
        );
        assert_eq!(
            StoreId::parse("shop[1]"),
            Err(StoreIdError::InvalidCharacter('['))
        );
        assert_eq!(
            StoreId::parse("shop\n1"),
            Err(StoreIdError::InvalidCharacter('\n'))
        );
    }

    #[test]
    fn test_parse_allows_escapable_characters() {
        for id in ["shop 1", "shop_1", "shop?x", "a%2Fb", "café"] {
            assert_eq!(StoreId::parse(id).unwrap().as_str(), id);
        }
    }

    #[test]
    fn test_scoped_keys() {
        let id = StoreId::parse("shop-1").unwrap();
        assert_eq!(id.remote_path(), "shop-1/fishes");
        assert_eq!(id.order_cache_key(), "order-shop-1");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = StoreId::parse("shop-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"shop-1\"");

        let parsed: StoreId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<StoreId>("\"\"").is_err());
        assert!(serde_json::from_str::<StoreId>("\"a/b\"").is_err());
    }
}
