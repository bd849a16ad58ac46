//! Lock-free parameter store shared between a control thread and the audio thread.
//!
//! Values are stored as `f32` bit patterns in `AtomicU32`s. Writers store with
//! `Release`, the audio thread loads with `Acquire` once per block via
//! [`SharedParams::snapshot_into`].

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use super::params::{PARAM_COUNT, ParamId, ParamValues};

/// Cloneable handle to one set of atomic parameter values.
///
/// # Example
///
/// ```rust
/// use stompchain_effects::chain::{ParamId, ParamValues, SharedParams};
///
/// let shared = SharedParams::new();
/// let ui = shared.clone();
/// ui.set(ParamId::ReverbMix, 0.8);
///
/// let mut values = ParamValues::default();
/// shared.snapshot_into(&mut values);
/// assert_eq!(values.get(ParamId::ReverbMix), 0.8);
/// ```
#[derive(Debug, Clone)]
pub struct SharedParams {
    values: Arc<[AtomicU32; PARAM_COUNT]>,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedParams {
    /// Create a store holding every default.
    pub fn new() -> Self {
        Self::from_values(&ParamValues::default())
    }

    /// Create a store seeded from `values`.
    pub fn from_values(values: &ParamValues) -> Self {
        let array = values.as_array();
        Self {
            values: Arc::new(core::array::from_fn(|i| AtomicU32::new(array[i].to_bits()))),
        }
    }

    /// Write a value. Clamped into `[0, 1]`; NaN is replaced by the default.
    pub fn set(&self, id: ParamId, value: f32) {
        let value = id.descriptor().sanitize(value);
        self.values[id.as_index()].store(value.to_bits(), Ordering::Release);
    }

    /// Read the latest written value.
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.as_index()].load(Ordering::Acquire))
    }

    /// Copy every value into `dest`, applying its quantization.
    ///
    /// Returns the number of parameters whose stored value changed.
    pub fn snapshot_into(&self, dest: &mut ParamValues) -> usize {
        let mut changed = 0;
        for id in ParamId::ALL {
            let before = dest.get(id);
            if dest.set(id, self.get(id)) != before {
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let a = SharedParams::new();
        let b = a.clone();
        b.set(ParamId::Gain, 0.9);
        assert_eq!(a.get(ParamId::Gain), 0.9);
    }

    #[test]
    fn writes_are_clamped() {
        let shared = SharedParams::new();
        shared.set(ParamId::DelayMix, 3.0);
        assert_eq!(shared.get(ParamId::DelayMix), 1.0);
        shared.set(ParamId::DelayMix, f32::NAN);
        assert_eq!(shared.get(ParamId::DelayMix), 0.3);
    }

    #[test]
    fn snapshot_counts_changes() {
        let shared = SharedParams::new();
        let mut values = ParamValues::default();
        assert_eq!(shared.snapshot_into(&mut values), 0);
        shared.set(ParamId::ModDepth, 0.1);
        shared.set(ParamId::DistType, 0.1);
        assert_eq!(shared.snapshot_into(&mut values), 2);
        assert_eq!(values.get(ParamId::DistType), 0.0);
    }

    #[test]
    fn cross_thread_write_is_visible() {
        let shared = SharedParams::new();
        let writer = shared.clone();
        std::thread::spawn(move || writer.set(ParamId::ReverbSize, 0.25))
            .join()
            .unwrap();
        assert_eq!(shared.get(ParamId::ReverbSize), 0.25);
    }
}
