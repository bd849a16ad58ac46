//! Per-block parameter change queue.
//!
//! Changes are pushed between blocks and applied at the start of the next
//! one with last-value-wins semantics. Storage is a fixed array, so pushing
//! never allocates.

use super::params::{ParamId, ParamValues};

/// Default number of distinct pending changes.
pub const QUEUE_CAPACITY: usize = 64;

/// Fixed-capacity queue of `(ParamId, value)` pairs.
///
/// A push for an id that is already queued overwrites that entry. When the
/// queue is full and the id is not queued, the change is dropped and counted.
///
/// # Example
///
/// ```rust
/// use stompchain_effects::chain::{ParamChanges, ParamId, ParamValues};
///
/// let mut queue = ParamChanges::new();
/// queue.push(ParamId::Gain, 0.2);
/// queue.push(ParamId::Gain, 0.9);
/// assert_eq!(queue.len(), 1);
///
/// let mut values = ParamValues::default();
/// queue.drain_into(&mut values);
/// assert_eq!(values.get(ParamId::Gain), 0.9);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ParamChanges<const N: usize = QUEUE_CAPACITY> {
    entries: [(ParamId, f32); N],
    len: usize,
    dropped: usize,
}

impl<const N: usize> Default for ParamChanges<N> {
    fn default() -> Self {
        Self {
            entries: [(ParamId::AmpBypass, 0.0); N],
            len: 0,
            dropped: 0,
        }
    }
}

impl ParamChanges<QUEUE_CAPACITY> {
    /// Empty queue with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<const N: usize> ParamChanges<N> {
    /// Queue a change. Returns `false` if it was dropped.
    pub fn push(&mut self, id: ParamId, value: f32) -> bool {
        if let Some(entry) = self.entries[..self.len].iter_mut().find(|(e, _)| *e == id) {
            entry.1 = value;
            return true;
        }
        if self.len == N {
            self.dropped += 1;
            return false;
        }
        self.entries[self.len] = (id, value);
        self.len += 1;
        true
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Changes dropped because the queue was full, since construction.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Pending entries in push order.
    pub fn pending(&self) -> &[(ParamId, f32)] {
        &self.entries[..self.len]
    }

    /// Apply every pending change to `values` and empty the queue.
    pub fn drain_into(&mut self, values: &mut ParamValues) {
        for &(id, value) in &self.entries[..self.len] {
            values.set(id, value);
        }
        self.len = 0;
    }

    /// Discard pending changes.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
