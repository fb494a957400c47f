//! Notifier port for cost change notifications.
//!
//! The engine emits one event per item whose figures moved in a propagation
//! batch and one per recipe producing such an item. Observers (a table, a
//! log, a test recorder) subscribe by registering a [`Notifier`].

use tracing::info;

use crate::domain::{ItemCostState, ItemId, RecipeSummary};

/// Events emitted after a propagation batch.
#[derive(Debug, Clone, PartialEq)]
pub enum CostEvent {
    /// An item's cost state was seeded or changed.
    ItemChanged {
        /// The item.
        item_id: ItemId,
        /// Its state after the batch.
        state: ItemCostState,
    },
    /// The result item of a recipe changed.
    RecipeChanged(RecipeSummary),
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget. `notify` is called from the engine
/// task and should return quickly.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: CostEvent);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: CostEvent) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A no-op notifier for when nobody is listening.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: CostEvent) {}
}

/// A notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: CostEvent) {
        match event {
            CostEvent::ItemChanged { item_id, state } => {
                info!(
                    item_id = %item_id,
                    action = %state.acquire_action,
                    market_cost = ?state.market_cost,
                    crafting_cost = ?state.crafting_cost,
                    revenue = ?state.revenue,
                    profit = ?state.profit,
                    "Item cost changed"
                );
            }
            CostEvent::RecipeChanged(row) => {
                info!(
                    recipe_id = %row.recipe_id,
                    item = %row.item_name,
                    action = %row.acquire_action,
                    profit = ?row.profit,
                    velocity = ?row.velocity,
                    score = ?row.score(),
                    "Recipe profit changed"
                );
            }
        }
    }
}
