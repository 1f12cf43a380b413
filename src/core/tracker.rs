use std::rc::Rc;

use indexmap::IndexMap;

use crate::core::{ModelKey, PointKey, PointSlot};

/// Previous fetch's point slots, consulted to reuse point identities.
///
/// Models with a reference identity are matched by that identity. Models
/// without one are matched by position against the previous snapshot, which
/// assumes the source keeps a stable order between fetches: reordering a
/// value-model source without replacing it re-attaches views by position.
///
/// Matching never mutates the tracker. A [`TrackerPass`] collects the new
/// slot list and is committed only once the whole fetch succeeded.
#[derive(Debug)]
pub struct ByValTracker<V> {
    slots: Vec<Rc<PointSlot<V>>>,
    by_model: IndexMap<ModelKey, usize>,
    next_synthetic: u64,
}

impl<V> Default for ByValTracker<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_model: IndexMap::new(),
            next_synthetic: 0,
        }
    }
}

impl<V> ByValTracker<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots of the last committed fetch, in snapshot order.
    #[must_use]
    pub fn slots(&self) -> &[Rc<PointSlot<V>>] {
        &self.slots
    }

    #[must_use]
    pub fn begin(&self) -> TrackerPass<'_, V> {
        TrackerPass {
            tracker: self,
            claimed: vec![false; self.slots.len()],
            slots: Vec::with_capacity(self.slots.len()),
            by_model: IndexMap::with_capacity(self.by_model.len()),
            next_synthetic: self.next_synthetic,
        }
    }

    /// Installs the result of a finished pass and returns the slots that no
    /// longer back any point.
    pub fn commit(&mut self, outcome: TrackerOutcome<V>) -> Vec<Rc<PointSlot<V>>> {
        self.slots = outcome.slots;
        self.by_model = outcome.by_model;
        self.next_synthetic = outcome.next_synthetic;
        outcome.stale
    }

    /// Forgets every slot, e.g. after the items source was replaced.
    pub fn clear(&mut self) -> Vec<Rc<PointSlot<V>>> {
        self.by_model.clear();
        std::mem::take(&mut self.slots)
    }
}

/// In-flight matching state for one fetch.
#[derive(Debug)]
pub struct TrackerPass<'a, V> {
    tracker: &'a ByValTracker<V>,
    claimed: Vec<bool>,
    slots: Vec<Rc<PointSlot<V>>>,
    by_model: IndexMap<ModelKey, usize>,
    next_synthetic: u64,
}

impl<V> TrackerPass<'_, V> {
    /// Resolves the slot for the model at `index` (the next position in the
    /// snapshot) and records it in the pass.
    pub fn claim(&mut self, index: usize, identity: Option<ModelKey>) -> Rc<PointSlot<V>> {
        let slot = match identity {
            Some(key) if !self.by_model.contains_key(&key) => {
                let slot = self
                    .claim_by_model(key)
                    .unwrap_or_else(|| Rc::new(PointSlot::new(PointKey::Model(key))));
                self.by_model.insert(key, self.slots.len());
                slot
            }
            // A reference seen twice in one snapshot falls back to position.
            _ => self
                .claim_by_position(index)
                .unwrap_or_else(|| self.allocate_synthetic()),
        };
        self.slots.push(Rc::clone(&slot));
        slot
    }

    fn claim_by_model(&mut self, key: ModelKey) -> Option<Rc<PointSlot<V>>> {
        let previous = *self.tracker.by_model.get(&key)?;
        if self.claimed[previous] {
            return None;
        }
        self.claimed[previous] = true;
        Some(Rc::clone(&self.tracker.slots[previous]))
    }

    fn claim_by_position(&mut self, index: usize) -> Option<Rc<PointSlot<V>>> {
        let slot = self.tracker.slots.get(index)?;
        if self.claimed[index] || !matches!(slot.key(), PointKey::Synthetic(_)) {
            return None;
        }
        self.claimed[index] = true;
        Some(Rc::clone(slot))
    }

    fn allocate_synthetic(&mut self) -> Rc<PointSlot<V>> {
        let key = PointKey::Synthetic(self.next_synthetic);
        self.next_synthetic += 1;
        Rc::new(PointSlot::new(key))
    }

    #[must_use]
    pub fn finish(self) -> TrackerOutcome<V> {
        let stale = self
            .tracker
            .slots
            .iter()
            .zip(&self.claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(slot, _)| Rc::clone(slot))
            .collect();
        TrackerOutcome {
            slots: self.slots,
            by_model: self.by_model,
            next_synthetic: self.next_synthetic,
            stale,
        }
    }
}

#[derive(Debug)]
pub struct TrackerOutcome<V> {
    slots: Vec<Rc<PointSlot<V>>>,
    by_model: IndexMap<ModelKey, usize>,
    next_synthetic: u64,
    stale: Vec<Rc<PointSlot<V>>>,
}
