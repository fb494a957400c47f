//! Batch propagation of cost changes along recipe edges.
//!
//! A batch starts from a set of seed items. Every item whose cost can depend
//! on a seed (result items of consuming recipes, transitively) is collected,
//! ordered so ingredients come before the items crafted from them, and then
//! visited at most once. An item is recomputed only if it is a seed or one of
//! its ingredients changed earlier in the batch. Items on a recipe cycle
//! cannot be ordered; they are visited once each in discovery order and keep
//! a best-effort value until a later batch touches them again.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::CostGraph;
use crate::domain::ItemId;

/// What a propagation batch touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Items the batch started from.
    pub seeds: Vec<ItemId>,
    /// Items recomputed, in visiting order.
    pub visited: Vec<ItemId>,
    /// Items whose cost figures changed.
    pub changed: Vec<ItemId>,
    /// Items that sat on a recipe cycle.
    pub cyclic: Vec<ItemId>,
}

impl BatchReport {
    /// Fold another batch into this one.
    pub fn merge(&mut self, other: Self) {
        self.seeds.extend(other.seeds);
        self.visited.extend(other.visited);
        self.changed.extend(other.changed);
        self.cyclic.extend(other.cyclic);
    }

    /// Seeds and changed items, without duplicates, in first-seen order.
    #[must_use]
    pub fn touched(&self) -> Vec<ItemId> {
        let mut seen = HashSet::new();
        self.seeds
            .iter()
            .chain(&self.changed)
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.visited.is_empty()
    }
}

impl CostGraph {
    /// Run one propagation batch from `seeds`.
    pub(crate) fn propagate(&mut self, seeds: Vec<ItemId>) -> BatchReport {
        let mut report = BatchReport::default();
        let seeds: Vec<ItemId> = seeds
            .into_iter()
            .filter(|id| self.states.contains_key(id))
            .collect();
        if seeds.is_empty() {
            return report;
        }

        let affected = self.dependents_closure(&seeds);
        let members: HashSet<ItemId> = affected.iter().copied().collect();

        // Ingredient -> crafted-item edges restricted to the affected set.
        let mut pending_inputs: HashMap<ItemId, usize> = HashMap::new();
        let mut successors: HashMap<ItemId, Vec<ItemId>> = HashMap::new();
        for &item_id in &affected {
            let mut inputs = HashSet::new();
            for recipe_id in self.index.producers(item_id) {
                let Some(recipe) = self.recipes.get(&recipe_id) else {
                    continue;
                };
                for slot in recipe.ingredients() {
                    if members.contains(&slot.item.id) && inputs.insert(slot.item.id) {
                        successors.entry(slot.item.id).or_default().push(item_id);
                    }
                }
            }
            pending_inputs.insert(item_id, inputs.len());
        }

        let mut ready: VecDeque<ItemId> = affected
            .iter()
            .copied()
            .filter(|id| pending_inputs.get(id) == Some(&0))
            .collect();
        let mut dirty: HashSet<ItemId> = seeds.iter().copied().collect();
        let mut visited: HashSet<ItemId> = HashSet::new();

        while let Some(item_id) = ready.pop_front() {
            self.visit(item_id, &successors, &mut dirty, &mut visited, &mut report);
            for &next in successors.get(&item_id).into_iter().flatten() {
                if let Some(count) = pending_inputs.get_mut(&next) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        // Whatever is left depends on itself through a recipe cycle.
        let cyclic: Vec<ItemId> = affected
            .iter()
            .copied()
            .filter(|id| !visited.contains(id))
            .collect();
        if !cyclic.is_empty() {
            warn!(
                items = cyclic.len(),
                first = %cyclic[0],
                "Cyclic recipe dependency, costs for the group are best-effort"
            );
            for &item_id in &cyclic {
                self.visit(item_id, &successors, &mut dirty, &mut visited, &mut report);
            }
            report.cyclic = cyclic;
        }

        report.seeds = seeds;
        debug!(
            seeds = report.seeds.len(),
            visited = report.visited.len(),
            changed = report.changed.len(),
            "Propagation batch complete"
        );
        report
    }

    fn visit(
        &mut self,
        item_id: ItemId,
        successors: &HashMap<ItemId, Vec<ItemId>>,
        dirty: &mut HashSet<ItemId>,
        visited: &mut HashSet<ItemId>,
        report: &mut BatchReport,
    ) {
        if !visited.insert(item_id) || !dirty.contains(&item_id) {
            return;
        }
        report.visited.push(item_id);
        if self.recompute(item_id) {
            report.changed.push(item_id);
            dirty.extend(successors.get(&item_id).into_iter().flatten().copied());
        }
    }

    /// Seeds plus every item crafted (transitively) from them, in BFS order.
    fn dependents_closure(&self, seeds: &[ItemId]) -> Vec<ItemId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        for &seed in seeds {
            if seen.insert(seed) {
                order.push(seed);
                queue.push_back(seed);
            }
        }
        while let Some(item_id) = queue.pop_front() {
            for recipe_id in self.index.consumers(item_id) {
                let Some(recipe) = self.recipes.get(&recipe_id) else {
                    continue;
                };
                let result_id = recipe.result().id;
                if seen.insert(result_id) {
                    order.push(result_id);
                    queue.push_back(result_id);
                }
            }
        }
        order
    }
}
