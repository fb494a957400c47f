//! Per-item cost state owned by the cost graph.

use super::action::AcquireAction;

/// Volatile cost figures for one item.
///
/// `None` means "not known yet" and is distinct from `f64::INFINITY`
/// ("known, but unreachable").
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCostState {
    /// Cheapest current market listing.
    pub market_cost: Option<f64>,
    /// Cheapest fully-resolved recipe for this item.
    pub crafting_cost: Option<f64>,
    /// Expected sale price of one unit.
    pub revenue: Option<f64>,
    pub acquire_action: AcquireAction,
    /// `revenue - acquire_action.cost()`.
    pub profit: Option<f64>,
    /// Regular sale velocity from market history.
    pub velocity: Option<f64>,
    /// Number of current market listings.
    pub listing_count: Option<usize>,
}

impl ItemCostState {
    /// Fresh state for an item nothing is known about yet.
    #[must_use]
    pub const fn new(gather_cost: f64) -> Self {
        Self {
            market_cost: None,
            crafting_cost: None,
            revenue: None,
            acquire_action: AcquireAction::Gather { cost: gather_cost },
            profit: None,
            velocity: None,
            listing_count: None,
        }
    }

    /// Cost of the active acquire action.
    #[must_use]
    pub const fn acquire_cost(&self) -> f64 {
        self.acquire_action.cost()
    }
}
