use std::collections::HashMap;

/// Upper bound on entries written out at a phase boundary.
pub const COUNTER_DUMP_LIMIT: usize = 25;

#[derive(Debug, Clone, Copy)]
struct Slot {
    count: u64,
    // First-insertion order, breaks ties when ranking.
    order: u64,
}

/// Counter id -> occurrence count, for coarse profiling.
///
/// Not synchronized on its own; [`super::phase::PhaseTracker`] guards it
/// together with the active phase.
#[derive(Debug, Default, Clone)]
pub struct CounterTable {
    slots: HashMap<String, Slot>,
    next_order: u64,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, id: &str) -> u64 {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.count += 1;
            return slot.count;
        }
        let order = self.next_order;
        self.next_order += 1;
        self.slots.insert(id.to_string(), Slot { count: 1, order });
        1
    }

    pub fn get(&self, id: &str) -> Option<u64> {
        self.slots.get(id).map(|slot| slot.count)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Highest counts first; equal counts keep insertion order.
    pub fn top(&self, limit: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(&String, &Slot)> = self.slots.iter().collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.1.order.cmp(&b.1.order)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(id, slot)| (id.clone(), slot.count))
            .collect()
    }

    pub fn drain_top(&mut self, limit: usize) -> Vec<(String, u64)> {
        let top = self.top(limit);
        self.clear();
        top
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.next_order = 0;
    }
}
