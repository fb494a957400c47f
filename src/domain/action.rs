//! Acquisition actions: how one unit of an item is obtained.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::RecipeId;

/// The decided cheapest way to acquire one unit of an item.
///
/// Exactly one variant is active per item. A cost of `f64::INFINITY` is a
/// valid, resolved value meaning "unreachable".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AcquireAction {
    Buy { cost: f64 },
    Craft { cost: f64, via: RecipeId },
    Gather { cost: f64 },
}

impl AcquireAction {
    #[must_use]
    pub const fn cost(&self) -> f64 {
        match self {
            Self::Buy { cost } | Self::Craft { cost, .. } | Self::Gather { cost } => *cost,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Buy { .. } => "BUY",
            Self::Craft { .. } => "CRAFT",
            Self::Gather { .. } => "GATHER",
        }
    }

    /// Recipe used when the action is `Craft`.
    #[must_use]
    pub const fn via_recipe(&self) -> Option<RecipeId> {
        match self {
            Self::Craft { via, .. } => Some(*via),
            _ => None,
        }
    }

    /// Tie-break rank: lower wins when costs are equal.
    const fn preference(&self) -> u8 {
        match self {
            Self::Craft { .. } => 0,
            Self::Buy { .. } => 1,
            Self::Gather { .. } => 2,
        }
    }

    /// Pick the cheaper of two candidates, preferring Craft > Buy > Gather
    /// on equal cost.
    #[must_use]
    pub fn cheaper(self, other: Self) -> Self {
        if other.cost() < self.cost()
            || (other.cost() == self.cost() && other.preference() < self.preference())
        {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for AcquireAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.cost())
    }
}
