use std::sync::Arc;

use craftledger::port::{CostEvent, Notifier};
use parking_lot::Mutex;

/// Notifier that keeps every event for later assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<CostEvent>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<CostEvent> {
        self.events.lock().clone()
    }

    pub fn recipe_events(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| matches!(event, CostEvent::RecipeChanged(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: CostEvent) {
        self.events.lock().push(event);
    }
}
