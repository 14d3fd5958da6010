//! Indexed binary min-heap over flat cell offsets.
//!
//! Both pathfinders key cells by a priority (A* score, Dijkstra
//! centi-distance) and must be able to lower a queued cell's key when a
//! better route to it turns up. A plain binary heap cannot find the entry to
//! re-key, so this one keeps an offset-to-slot table beside the entry array:
//! membership is O(1) and re-keying is a single sift.

/// Slot value meaning "this offset is not queued".
const ABSENT: u32 = u32::MAX;

/// Min-heap of `(key, offset)` entries with an offset-to-slot back index.
///
/// Keys must order totally over the values actually inserted (no NaN).
pub(crate) struct SlotHeap<K> {
    entries: Vec<(K, u32)>,
    slots: Vec<u32>,
}

impl<K: PartialOrd + Copy> SlotHeap<K> {
    /// Create a heap able to queue offsets in `0..len`.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            entries: Vec::new(),
            slots: vec![ABSENT; len],
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `offset` is currently queued.
    pub(crate) fn contains(&self, offset: u32) -> bool {
        self.slots[offset as usize] != ABSENT
    }

    /// Drop every entry but keep the allocations.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.slots.fill(ABSENT);
    }

    /// Queue `offset` under `key`. The offset must not already be queued.
    pub(crate) fn push(&mut self, offset: u32, key: K) {
        let slot = self.entries.len();
        self.entries.push((key, offset));
        self.slots[offset as usize] = slot as u32;
        self.sift_up(slot);
    }

    /// Remove and return the offset with the smallest key.
    pub(crate) fn pop(&mut self) -> Option<u32> {
        let (_, offset) = *self.entries.first()?;
        self.slots[offset as usize] = ABSENT;
        let last = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.entries[0] = last;
            self.slots[last.1 as usize] = 0;
            self.sift_down(0);
        }
        Some(offset)
    }

    /// Lower the key of a queued offset and restore heap order.
    ///
    /// Offsets that are no longer queued are ignored; the pathfinders keep
    /// their own grids authoritative for cells already expanded.
    pub(crate) fn decrease(&mut self, offset: u32, key: K) {
        let slot = self.slots[offset as usize];
        if slot == ABSENT {
            return;
        }
        let slot = slot as usize;
        self.entries[slot].0 = key;
        self.sift_up(slot);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[parent].0 <= self.entries[slot].0 {
                break;
            }
            self.swap_slots(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let mut smallest = slot;
            for child in [2 * slot + 1, 2 * slot + 2] {
                if child < self.entries.len() && self.entries[child].0 < self.entries[smallest].0 {
                    smallest = child;
                }
            }
            if smallest == slot {
                return;
            }
            self.swap_slots(slot, smallest);
            slot = smallest;
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots[self.entries[a].1 as usize] = a as u32;
        self.slots[self.entries[b].1 as usize] = b as u32;
    }
}
