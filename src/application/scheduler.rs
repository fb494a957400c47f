//! Deduplicating recomputation queue.
//!
//! Event handlers on any thread enqueue item ids; the single owner of the
//! [`CostGraph`] drains them. A burst of updates for one item collapses into
//! a single pending entry.

use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;
use tracing::debug;

use crate::application::graph::{BatchReport, CostGraph};
use crate::domain::ItemId;

#[derive(Debug, Default)]
struct PendingQueue {
    order: VecDeque<ItemId>,
    members: HashSet<ItemId>,
}

/// Thread-safe FIFO of items awaiting recomputation, without duplicates.
#[derive(Debug, Default)]
pub struct RecomputeScheduler {
    pending: Mutex<PendingQueue>,
}

impl RecomputeScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an item. Returns false if it was already pending.
    pub fn enqueue(&self, item_id: ItemId) -> bool {
        let mut pending = self.pending.lock();
        if !pending.members.insert(item_id) {
            return false;
        }
        pending.order.push_back(item_id);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take everything currently pending, in arrival order.
    fn take_batch(&self) -> Vec<ItemId> {
        let mut pending = self.pending.lock();
        pending.members.clear();
        pending.order.drain(..).collect()
    }

    /// Run propagation batches until nothing is pending.
    ///
    /// Each batch visits an item at most once; items enqueued while a batch
    /// runs are picked up by the next one.
    pub fn drain(&self, graph: &mut CostGraph) -> BatchReport {
        let mut report = BatchReport::default();
        let mut batches = 0usize;
        loop {
            let seeds = self.take_batch();
            if seeds.is_empty() {
                break;
            }
            batches += 1;
            report.merge(graph.propagate(seeds));
        }
        if batches > 0 {
            debug!(
                batches,
                changed = report.changed.len(),
                "Recompute queue drained"
            );
        }
        report
    }
}
