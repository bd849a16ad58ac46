//! Noise gates for near-silent signals.
//!
//! Two flavors:
//!
//! - [`gate`] - stateless: anything below the threshold becomes 0.0.
//! - [`NoiseGate`] - two thresholds with hysteresis, so a signal hovering
//!   around a single threshold cannot chatter open/closed every sample.

/// Stateless gate: returns 0.0 when `|x| < threshold`, otherwise `x`.
#[inline]
pub fn gate(x: f32, threshold: f32) -> f32 {
    if x.abs() < threshold { 0.0 } else { x }
}

/// Gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Signal passes.
    #[default]
    Open,
    /// Signal is replaced with silence.
    Closed,
}

/// Hysteresis gate on instantaneous magnitude.
///
/// The gate closes when `|x|` drops below `close_threshold` and reopens only
/// once `|x|` reaches `open_threshold`.
///
/// # Example
///
/// ```rust
/// use stompchain_core::{GateState, NoiseGate};
///
/// let mut gate = NoiseGate::new(0.004, 0.002);
/// assert_eq!(gate.process(0.001), 0.0);
/// assert_eq!(gate.state(), GateState::Closed);
/// // Between the thresholds: stays closed.
/// assert_eq!(gate.process(0.003), 0.0);
/// assert_eq!(gate.process(0.005), 0.005);
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGate {
    open_threshold: f32,
    close_threshold: f32,
    state: GateState,
}

impl NoiseGate {
    /// Create an open gate. If the thresholds are given in the wrong order
    /// they are swapped.
    pub fn new(open_threshold: f32, close_threshold: f32) -> Self {
        let (open_threshold, close_threshold) = if open_threshold >= close_threshold {
            (open_threshold, close_threshold)
        } else {
            (close_threshold, open_threshold)
        };
        Self {
            open_threshold,
            close_threshold,
            state: GateState::Open,
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Gate one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        self.state = match self.state {
            GateState::Open if level < self.close_threshold => GateState::Closed,
            GateState::Closed if level >= self.open_threshold => GateState::Open,
            state => state,
        };
        match self.state {
            GateState::Open => input,
            GateState::Closed => 0.0,
        }
    }

    /// Return to the open state.
    pub fn reset(&mut self) {
        self.state = GateState::Open;
    }
}
