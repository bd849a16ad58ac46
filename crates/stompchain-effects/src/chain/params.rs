//! The 24-parameter control surface of the pipeline.
//!
//! [`ParamId`] is a dense `#[repr(u8)]` enum whose discriminants are the host
//! parameter ids, so `ParamId as usize` indexes every per-parameter table
//! directly. [`ParamValues`] is the fixed array the orchestrator owns.

use stompchain_core::{ParamDescriptor, ParamUnit};

use crate::distortion::DistortionType;
use crate::modulation::ModulationType;

/// Number of parameters.
pub const PARAM_COUNT: usize = 24;

/// Values above this engage a bypass or toggle.
pub const SWITCH_THRESHOLD: f32 = 0.5;

const DIST_TYPES: &[&str] = &["Clean", "Crunch", "Fuzz"];
const MOD_TYPES: &[&str] = &["Chorus", "Flanger", "Phaser"];

/// Parameter identifier. Discriminants are the host parameter ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ParamId {
    AmpBypass = 0,
    Gain = 1,
    Bass = 2,
    Mid = 3,
    Treble = 4,
    Presence = 5,
    OutputLevel = 6,
    DistBypass = 7,
    DistType = 8,
    DistDrive = 9,
    ReverbBypass = 10,
    ReverbMix = 11,
    ReverbSize = 12,
    ReverbReverse = 13,
    ReverbShimmer = 14,
    DelayBypass = 15,
    DelayMix = 16,
    DelayTime = 17,
    DelayFeedback = 18,
    DelayReverse = 19,
    ModBypass = 20,
    ModType = 21,
    ModRate = 22,
    ModDepth = 23,
}

/// Descriptor table indexed by `ParamId as usize`.
static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::bypass("Amp Bypass", "Amp Byp", "amp_bypass").with_group("Bypass"),
    ParamDescriptor::percent("Gain", "Gain", "gain", 0.5).with_group("Preamp"),
    ParamDescriptor::ranged("Bass", "Bass", "bass", ParamUnit::Decibels, -12.0, 12.0, 0.5)
        .with_group("EQ"),
    ParamDescriptor::ranged("Mid", "Mid", "mid", ParamUnit::Decibels, -12.0, 12.0, 0.5)
        .with_group("EQ"),
    ParamDescriptor::ranged("Treble", "Treble", "treble", ParamUnit::Decibels, -12.0, 12.0, 0.5)
        .with_group("EQ"),
    ParamDescriptor::ranged("Presence", "Presnc", "presence", ParamUnit::Decibels, -12.0, 12.0, 0.5)
        .with_group("EQ"),
    ParamDescriptor::ranged("Output Level", "Output", "output_level", ParamUnit::Level, 0.0, 1.0, 0.7)
        .with_group("Master"),
    ParamDescriptor::bypass("Distortion Bypass", "Dist Byp", "dist_bypass").with_group("Bypass"),
    ParamDescriptor::choice("Distortion Type", "DistType", "dist_type", DIST_TYPES, 0.5)
        .with_group("Distortion"),
    ParamDescriptor::percent("Drive", "Drive", "dist_drive", 0.5).with_group("Distortion"),
    ParamDescriptor::bypass("Reverb Bypass", "Rev Byp", "reverb_bypass").with_group("Bypass"),
    ParamDescriptor::percent("Reverb Mix", "Rev Mix", "reverb_mix", 0.3).with_group("Reverb"),
    ParamDescriptor::percent("Reverb Size", "Size", "reverb_size", 0.5).with_group("Reverb"),
    ParamDescriptor::toggle("Reverb Reverse", "Rev Rev", "reverb_reverse", 0.0).with_group("Reverb"),
    ParamDescriptor::percent("Shimmer", "Shimmer", "reverb_shimmer", 0.0).with_group("Reverb"),
    ParamDescriptor::bypass("Delay Bypass", "Dly Byp", "delay_bypass").with_group("Bypass"),
    ParamDescriptor::percent("Delay Mix", "Dly Mix", "delay_mix", 0.3).with_group("Delay"),
    ParamDescriptor::ranged("Delay Time", "Time", "delay_time", ParamUnit::Seconds, 0.1, 4.0, 0.5)
        .with_group("Delay"),
    ParamDescriptor::percent("Delay Feedback", "Feedback", "delay_feedback", 0.3).with_group("Delay"),
    ParamDescriptor::toggle("Delay Reverse", "Dly Rev", "delay_reverse", 0.0).with_group("Delay"),
    ParamDescriptor::bypass("Modulation Bypass", "Mod Byp", "mod_bypass").with_group("Bypass"),
    ParamDescriptor::choice("Modulation Type", "ModType", "mod_type", MOD_TYPES, 0.0)
        .with_group("Modulation"),
    ParamDescriptor::ranged("Mod Rate", "Rate", "mod_rate", ParamUnit::Hertz, 0.1, 5.0, 0.5)
        .with_group("Modulation"),
    ParamDescriptor::percent("Mod Depth", "Depth", "mod_depth", 0.5).with_group("Modulation"),
];

impl ParamId {
    /// Every parameter in id order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        Self::AmpBypass,
        Self::Gain,
        Self::Bass,
        Self::Mid,
        Self::Treble,
        Self::Presence,
        Self::OutputLevel,
        Self::DistBypass,
        Self::DistType,
        Self::DistDrive,
        Self::ReverbBypass,
        Self::ReverbMix,
        Self::ReverbSize,
        Self::ReverbReverse,
        Self::ReverbShimmer,
        Self::DelayBypass,
        Self::DelayMix,
        Self::DelayTime,
        Self::DelayFeedback,
        Self::DelayReverse,
        Self::ModBypass,
        Self::ModType,
        Self::ModRate,
        Self::ModDepth,
    ];

    /// Look up a host id.
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Position in every per-parameter table.
    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// Metadata for this parameter.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.as_index()]
    }

    /// Stable snake_case key used by presets and the command line.
    pub fn string_id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Look up a parameter by its [`string_id`](Self::string_id).
    pub fn from_string_id(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.string_id() == key)
    }

    /// Default normalized value.
    pub fn default_value(self) -> f32 {
        self.descriptor().default
    }

    /// True for the two three-way selectors.
    pub fn is_selector(self) -> bool {
        matches!(self, Self::DistType | Self::ModType)
    }
}

/// The current value of every parameter, normalized.
///
/// # Invariants
///
/// - every value is in `[0, 1]`
/// - selector values are one of `0.0`, `0.5`, `1.0`
///
/// # Example
///
/// ```rust
/// use stompchain_effects::chain::{ParamId, ParamValues};
/// use stompchain_effects::DistortionType;
///
/// let mut values = ParamValues::default();
/// values.set(ParamId::DistType, 0.8);
/// assert_eq!(values.get(ParamId::DistType), 1.0);
/// assert_eq!(values.distortion_type(), DistortionType::Fuzz);
/// values.set(ParamId::Gain, 7.0);
/// assert_eq!(values.get(ParamId::Gain), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamValues {
    values: [f32; PARAM_COUNT],
}

impl Default for ParamValues {
    fn default() -> Self {
        let mut values = [0.0; PARAM_COUNT];
        for id in ParamId::ALL {
            values[id.as_index()] = id.default_value();
        }
        Self { values }
    }
}

impl ParamValues {
    /// Store a sanitized value: clamped into `[0, 1]`, NaN replaced by the
    /// default, selectors quantized to their nearest position.
    ///
    /// Returns the value actually stored.
    #[inline]
    pub fn set(&mut self, id: ParamId, value: f32) -> f32 {
        let desc = id.descriptor();
        let mut v = desc.sanitize(value);
        if id.is_selector() {
            v = desc.choice_value(desc.choice_index(v));
        }
        self.values[id.as_index()] = v;
        v
    }

    /// Current normalized value.
    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.as_index()]
    }

    /// All values in id order.
    pub fn as_array(&self) -> &[f32; PARAM_COUNT] {
        &self.values
    }

    /// Iterate `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamId, f32)> + '_ {
        ParamId::ALL.iter().map(|&id| (id, self.get(id)))
    }

    #[inline]
    fn switch(&self, id: ParamId) -> bool {
        self.get(id) > SWITCH_THRESHOLD
    }

    /// Amp + EQ stage bypassed.
    pub fn amp_bypassed(&self) -> bool {
        self.switch(ParamId::AmpBypass)
    }

    /// Distortion stage bypassed.
    pub fn dist_bypassed(&self) -> bool {
        self.switch(ParamId::DistBypass)
    }

    /// Modulation stage bypassed.
    pub fn mod_bypassed(&self) -> bool {
        self.switch(ParamId::ModBypass)
    }

    /// Delay stage bypassed.
    pub fn delay_bypassed(&self) -> bool {
        self.switch(ParamId::DelayBypass)
    }

    /// Reverb stage bypassed.
    pub fn reverb_bypassed(&self) -> bool {
        self.switch(ParamId::ReverbBypass)
    }

    /// Delay reverse mode engaged.
    pub fn delay_reverse(&self) -> bool {
        self.switch(ParamId::DelayReverse)
    }

    /// Reverb reverse mode engaged.
    pub fn reverb_reverse(&self) -> bool {
        self.switch(ParamId::ReverbReverse)
    }

    /// Selected distortion voice.
    pub fn distortion_type(&self) -> DistortionType {
        let id = ParamId::DistType;
        DistortionType::from_index(id.descriptor().choice_index(self.get(id)))
    }

    /// Selected modulation voice.
    pub fn modulation_type(&self) -> ModulationType {
        let id = ParamId::ModType;
        ModulationType::from_index(id.descriptor().choice_index(self.get(id)))
    }

    /// Linear output gain.
    pub fn output_level(&self) -> f32 {
        self.get(ParamId::OutputLevel)
    }
}
