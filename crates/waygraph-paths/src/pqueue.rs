//! Indexed min-priority queue.
//!
//! A binary heap stored in a `Vec`, plus a key → heap-slot map so that an
//! entry can be re-prioritized or removed by key in O(log n). Entries with
//! equal priority come out in FIFO order of their last enqueue or update.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Errors reported by [`IndexedPriorityQueue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Dequeue or peek on an empty queue.
    #[error("priority queue is empty")]
    Empty,
    /// No entry with the requested key.
    #[error("key not found in priority queue")]
    KeyNotFound,
    /// The key is already queued.
    #[error("key is already in the priority queue")]
    DuplicateKey,
    /// Heap index past the end.
    #[error("heap index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// The priority does not compare with itself (NaN).
    #[error("priority is not comparable")]
    InvalidPriority,
}

#[derive(Debug, Clone)]
struct Slot<K, V, P> {
    key: K,
    value: V,
    priority: P,
    /// Monotonically increasing; lower = enqueued (or updated) earlier.
    seq: u64,
}

/// A key/value/priority min-heap with by-key updates.
///
/// At most one entry exists per key. Priorities only need `PartialOrd`,
/// but a priority that does not compare with itself (NaN) is rejected with
/// [`QueueError::InvalidPriority`], so the queued priorities stay totally
/// ordered.
#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<K, V, P> {
    heap: Vec<Slot<K, V, P>>,
    index: HashMap<K, usize>,
    seq: u64,
}

impl<K, V, P> Default for IndexedPriorityQueue<K, V, P>
where
    K: Eq + Hash + Clone,
    P: PartialOrd + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> IndexedPriorityQueue<K, V, P>
where
    K: Eq + Hash + Clone,
    P: PartialOrd + Copy,
{
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            index: HashMap::new(),
            seq: 0,
        }
    }

    /// Create an empty queue with room for `cap` entries.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            heap: Vec::with_capacity(cap),
            index: HashMap::with_capacity(cap),
            seq: 0,
        }
    }

    /// Number of queued entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether an entry for `key` is queued.
    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current heap slot of `key`.
    #[inline]
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.heap[i].value)
    }

    /// Priority stored for `key`.
    pub fn priority_of(&self, key: &K) -> Option<P> {
        self.index.get(key).map(|&i| self.heap[i].priority)
    }

    /// Insert a new entry.
    ///
    /// Fails with [`QueueError::DuplicateKey`] if `key` is already queued;
    /// use [`change_value_and_priority`](Self::change_value_and_priority)
    /// for that.
    pub fn enqueue(&mut self, key: K, value: V, priority: P) -> Result<(), QueueError> {
        if self.index.contains_key(&key) {
            return Err(QueueError::DuplicateKey);
        }
        check_priority(priority)?;
        let seq = self.next_seq();
        let i = self.heap.len();
        self.index.insert(key.clone(), i);
        self.heap.push(Slot {
            key,
            value,
            priority,
            seq,
        });
        self.sift_up(i);
        Ok(())
    }

    /// Remove and return the minimum-priority entry.
    pub fn dequeue(&mut self) -> Result<(K, V, P), QueueError> {
        if self.heap.is_empty() {
            return Err(QueueError::Empty);
        }
        self.remove_at(0)
    }

    /// The minimum-priority entry, without removing it.
    pub fn peek(&self) -> Result<(&K, &V, P), QueueError> {
        self.heap
            .first()
            .map(|s| (&s.key, &s.value, s.priority))
            .ok_or(QueueError::Empty)
    }

    /// Replace the value and priority of an existing entry and restore heap
    /// order. The entry's FIFO position is refreshed as if it had just been
    /// enqueued.
    pub fn change_value_and_priority(
        &mut self,
        key: &K,
        value: V,
        priority: P,
    ) -> Result<(), QueueError> {
        let i = *self.index.get(key).ok_or(QueueError::KeyNotFound)?;
        check_priority(priority)?;
        let seq = self.next_seq();
        let slot = &mut self.heap[i];
        slot.value = value;
        slot.priority = priority;
        slot.seq = seq;
        self.restore(i);
        Ok(())
    }

    /// Remove the entry stored at heap slot `index`.
    ///
    /// Slot 0 is always the minimum; other slots are in heap order, which
    /// callers can discover through [`index_of`](Self::index_of).
    pub fn remove_at(&mut self, index: usize) -> Result<(K, V, P), QueueError> {
        let len = self.heap.len();
        if index >= len {
            return Err(QueueError::IndexOutOfRange { index, len });
        }
        let last = len - 1;
        if index != last {
            self.swap(index, last);
        }
        let Some(slot) = self.heap.pop() else {
            return Err(QueueError::Empty);
        };
        self.index.remove(&slot.key);
        if index < self.heap.len() {
            self.restore(index);
        }
        Ok((slot.key, slot.value, slot.priority))
    }

    /// Remove the entry for `key`.
    pub fn remove(&mut self, key: &K) -> Result<(V, P), QueueError> {
        let i = *self.index.get(key).ok_or(QueueError::KeyNotFound)?;
        self.remove_at(i).map(|(_, v, p)| (v, p))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    /// Iterate over entries in heap (not priority) order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, P)> + '_ {
        self.heap.iter().map(|s| (&s.key, &s.value, s.priority))
    }

    // -----------------------------------------------------------------------
    // Heap internals
    // -----------------------------------------------------------------------

    fn next_seq(&mut self) -> u64 {
        let s = self.seq;
        self.seq += 1;
        s
    }

    /// Whether slot `a` must come out before slot `b`.
    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        let (sa, sb) = (&self.heap[a], &self.heap[b]);
        match sa.priority.partial_cmp(&sb.priority) {
            Some(Ordering::Less) => true,
            Some(Ordering::Greater) => false,
            _ => sa.seq < sb.seq,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        if let Some(i) = self.index.get_mut(&self.heap[a].key) {
            *i = a;
        }
        if let Some(i) = self.index.get_mut(&self.heap[b].key) {
            *i = b;
        }
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let l = 2 * i + 1;
            let r = l + 1;
            let mut best = i;
            if l < len && self.less(l, best) {
                best = l;
            }
            if r < len && self.less(r, best) {
                best = r;
            }
            if best == i {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }

    /// Move the slot at `i` up or down until heap order holds again.
    fn restore(&mut self, i: usize) {
        let i = self.sift_up(i);
        self.sift_down(i);
    }
}

fn check_priority<P: PartialOrd>(priority: P) -> Result<(), QueueError> {
    match priority.partial_cmp(&priority) {
        Some(_) => Ok(()),
        None => Err(QueueError::InvalidPriority),
    }
}
