//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Item identifier - newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Create a new `ItemId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Recipe identifier - newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(u32);

impl RecipeId {
    /// Create a new `RecipeId` from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric identifier.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecipeId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Market identifier: a world or data center, by id or by name.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Market(String);

impl Market {
    /// Create a new `Market` from a world id or name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the market identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Market {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Market {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u32> for Market {
    fn from(world_id: u32) -> Self {
        Self::new(world_id.to_string())
    }
}

/// Cache key for market listings: one item in one market.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemMarketKey {
    pub item_id: ItemId,
    pub market: Market,
}

impl ItemMarketKey {
    pub fn new(item_id: ItemId, market: impl Into<Market>) -> Self {
        Self {
            item_id,
            market: market.into(),
        }
    }
}

impl fmt::Display for ItemMarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.market, self.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_serializes_as_number() {
        let json = serde_json::to_string(&ItemId::new(5057)).unwrap();
        assert_eq!(json, "5057");
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ItemId::new(5057));
    }

    #[test]
    fn test_market_from_world_id() {
        assert_eq!(Market::from(55).as_str(), "55");
        assert_eq!(Market::from("Lamia").to_string(), "Lamia");
    }

    #[test]
    fn test_item_market_key_display() {
        let key = ItemMarketKey::new(ItemId::new(7), "Lamia");
        assert_eq!(key.to_string(), "Lamia/7");
    }
}
