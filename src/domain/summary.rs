//! Read model for one recipe row.

use super::action::AcquireAction;
use super::id::{ItemId, RecipeId};
use super::recipe::ClassJob;

/// Profit and market-activity figures for one recipe's result item.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub recipe_id: RecipeId,
    pub item_id: ItemId,
    pub item_name: String,
    pub job: Option<ClassJob>,
    pub acquire_action: AcquireAction,
    pub profit: Option<f64>,
    pub revenue: Option<f64>,
    pub crafting_cost: Option<f64>,
    pub market_cost: Option<f64>,
    pub velocity: Option<f64>,
    pub listing_count: Option<usize>,
}

impl RecipeSummary {
    /// Sales per day per competing listing.
    #[must_use]
    pub fn speed(&self) -> Option<f64> {
        let velocity = self.velocity?;
        let listings = self.listing_count?.max(1);
        Some(velocity / listings as f64)
    }

    /// Expected profit per day.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        Some(self.profit? * self.velocity?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(profit: Option<f64>, velocity: Option<f64>, listings: Option<usize>) -> RecipeSummary {
        RecipeSummary {
            recipe_id: RecipeId::new(1),
            item_id: ItemId::new(2),
            item_name: "Iron Ingot".into(),
            job: None,
            acquire_action: AcquireAction::Buy { cost: 10.0 },
            profit,
            revenue: None,
            crafting_cost: None,
            market_cost: None,
            velocity,
            listing_count: listings,
        }
    }

    #[test]
    fn test_speed_guards_zero_listings() {
        assert_eq!(summary(None, Some(3.0), Some(0)).speed(), Some(3.0));
        assert_eq!(summary(None, Some(3.0), Some(6)).speed(), Some(0.5));
        assert_eq!(summary(None, None, Some(6)).speed(), None);
    }

    #[test]
    fn test_score_needs_profit_and_velocity() {
        assert_eq!(summary(Some(100.0), Some(2.0), None).score(), Some(200.0));
        assert_eq!(summary(None, Some(2.0), None).score(), None);
    }
}
