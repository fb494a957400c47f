//! Builders for recipes and listings payloads.

use craftledger::domain::{IngredientSlot, Item, ItemId, Listing, Listings, Recipe, RecipeId};

pub fn item(id: u32, name: &str) -> Item {
    Item::new(ItemId::new(id), name)
}

/// Recipe `id` producing `result` from `(item, quantity)` pairs.
pub fn recipe(id: u32, result: (u32, &str), ingredients: &[(u32, &str, u32)]) -> Recipe {
    Recipe::try_new(
        RecipeId::new(id),
        item(result.0, result.1),
        ingredients
            .iter()
            .map(|&(item_id, name, quantity)| IngredientSlot::new(item(item_id, name), quantity))
            .collect(),
    )
    .unwrap()
}

/// Listings with one offer per price, all from seller `"other"`.
pub fn listings(item_id: u32, prices: &[f64], velocity: f64) -> Listings {
    Listings {
        item_id: ItemId::new(item_id),
        listings: prices
            .iter()
            .map(|&price| Listing {
                price_per_unit: price,
                quantity: 1,
                hq: false,
                seller_id: Some("other".into()),
                retainer_name: None,
            })
            .collect(),
        recent_history: vec![],
        min_price: prices.iter().copied().reduce(f64::min).unwrap_or(0.0),
        average_price: 0.0,
        regular_sale_velocity: velocity,
        last_upload_time: 0,
    }
}

/// Market board JSON body for `listings`.
pub fn listings_json(item_id: u32, prices: &[f64], velocity: f64) -> String {
    serde_json::to_string(&listings(item_id, prices, velocity)).unwrap()
}
