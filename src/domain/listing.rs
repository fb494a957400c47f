//! Market listings payload and the figures the engine derives from it.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// One item currently for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub price_per_unit: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub hq: bool,
    #[serde(rename = "sellerID", default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub retainer_name: Option<String>,
}

/// One completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub price_per_unit: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub hq: bool,
    /// Unix seconds.
    #[serde(default)]
    pub timestamp: i64,
}

const fn default_quantity() -> u32 {
    1
}

/// Market listings for one item in one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listings {
    #[serde(rename = "itemID")]
    pub item_id: ItemId,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub recent_history: Vec<Sale>,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub average_price: f64,
    #[serde(default)]
    pub regular_sale_velocity: f64,
    /// Unix milliseconds of the last upload to the market board.
    #[serde(default)]
    pub last_upload_time: i64,
}

/// Engine-facing figures derived from a [`Listings`] payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketSnapshot {
    pub market_cost: Option<f64>,
    pub revenue: Option<f64>,
    pub velocity: Option<f64>,
    pub listing_count: usize,
}

impl Listings {
    /// Cheapest listing not posted by `own_seller`.
    #[must_use]
    pub fn min_price_excluding(&self, own_seller: Option<&str>) -> Option<f64> {
        self.listings
            .iter()
            .filter(|listing| match (own_seller, listing.seller_id.as_deref()) {
                (Some(own), Some(seller)) => own != seller,
                _ => true,
            })
            .map(|listing| listing.price_per_unit)
            .min_by(f64::total_cmp)
    }

    /// Mean unit price over the recent sale history.
    #[must_use]
    pub fn average_sale_price(&self) -> Option<f64> {
        if self.recent_history.is_empty() {
            return None;
        }
        let total: f64 = self.recent_history.iter().map(|sale| sale.price_per_unit).sum();
        Some(total / self.recent_history.len() as f64)
    }

    /// Derive market cost, revenue, velocity and listing count.
    ///
    /// Revenue is what one unit can be sold for: the cheapest competing
    /// listing, or the average recent sale price when nothing competes.
    #[must_use]
    pub fn snapshot(&self, own_seller: Option<&str>) -> MarketSnapshot {
        let market_cost = self.min_price_excluding(own_seller);
        let revenue = market_cost.or_else(|| self.average_sale_price());
        MarketSnapshot {
            market_cost,
            revenue,
            velocity: Some(self.regular_sale_velocity),
            listing_count: self.listings.len(),
        }
    }
}
