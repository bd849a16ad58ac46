//! Extreme parameter tests for every stage and the full chain.
//!
//! Verifies finite output with every parameter at its minimum and maximum,
//! and at extreme sample rates (8 kHz and 192 kHz).

use stompchain_core::Effect;
use stompchain_effects::chain::{MultiFx, ParamId};
use stompchain_effects::{
    AmpStage, DelayStage, DistortionStage, DistortionType, ModulationStage, ModulationType,
    ReverbStage,
};

const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
const LOW_SAMPLE_RATE: f32 = 8000.0;
const HIGH_SAMPLE_RATE: f32 = 192000.0;
const NUM_SAMPLES: usize = 2000;

fn test_input(i: usize) -> f32 {
    match i % 3 {
        0 => 0.5,
        1 => -0.5,
        _ => 0.0,
    }
}

/// Process `NUM_SAMPLES` through an effect and assert all outputs are finite.
fn assert_finite_output(effect: &mut dyn Effect, label: &str) {
    for i in 0..NUM_SAMPLES {
        let output = effect.process(test_input(i));
        assert!(
            output.is_finite(),
            "{}: non-finite output at sample {}: {}",
            label,
            i,
            output
        );
    }
}

/// Every parameter at `value` (bypasses included, so pass `false` to keep stages on).
fn chain_at(sample_rate: f32, value: f32, keep_stages_on: bool) -> MultiFx {
    let mut fx = MultiFx::with_sample_rate(sample_rate).unwrap();
    for id in ParamId::ALL {
        fx.set_parameter(id, value);
    }
    if keep_stages_on {
        for id in [
            ParamId::AmpBypass,
            ParamId::DistBypass,
            ParamId::ModBypass,
            ParamId::DelayBypass,
            ParamId::ReverbBypass,
        ] {
            fx.set_parameter(id, 0.0);
        }
    }
    fx
}

fn assert_chain_finite(fx: &mut MultiFx, label: &str) {
    let input: Vec<f32> = (0..NUM_SAMPLES).map(test_input).collect();
    let mut left = vec![0.0f32; NUM_SAMPLES];
    let mut right = vec![0.0f32; NUM_SAMPLES];
    for block in 0..4 {
        fx.process_block([&input, &input], [&mut left, &mut right]);
        for (i, (&l, &r)) in left.iter().zip(&right).enumerate() {
            assert!(
                l.is_finite() && r.is_finite(),
                "{}: non-finite output in block {} sample {}: ({}, {})",
                label,
                block,
                i,
                l,
                r
            );
        }
    }
}

#[test]
fn chain_extremes_at_every_rate() {
    for sr in [LOW_SAMPLE_RATE, DEFAULT_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for value in [0.0, 1.0] {
            let mut fx = chain_at(sr, value, true);
            assert_chain_finite(&mut fx, &format!("chain all={} @ {}", value, sr));
        }
        let mut fx = chain_at(sr, 1.0, false);
        assert_chain_finite(&mut fx, &format!("chain bypassed @ {}", sr));
    }
}

#[test]
fn every_voice_at_max_settings() {
    for dist in [0.0, 0.5, 1.0] {
        for modulation in [0.0, 0.5, 1.0] {
            let mut fx = chain_at(DEFAULT_SAMPLE_RATE, 1.0, true);
            fx.set_parameter(ParamId::DistType, dist);
            fx.set_parameter(ParamId::ModType, modulation);
            fx.set_parameter(ParamId::DelayReverse, 0.0);
            fx.set_parameter(ParamId::ReverbReverse, 0.0);
            assert_chain_finite(&mut fx, &format!("dist {} mod {}", dist, modulation));
        }
    }
}

#[test]
fn amp_extremes() {
    for sr in [LOW_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for value in [0.0, 1.0] {
            let mut amp = AmpStage::new(sr);
            amp.set_gain(value);
            let tone = amp.tone_mut();
            tone.set_bass(value);
            tone.set_mid(value);
            tone.set_treble(value);
            tone.set_presence(value);
            assert_finite_output(&mut amp, &format!("amp {} @ {}", value, sr));
        }
    }
}

#[test]
fn distortion_extremes() {
    for sr in [LOW_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for kind in DistortionType::ALL {
            for drive in [0.0, 1.0] {
                let mut dist = DistortionStage::new(sr);
                dist.set_type(kind);
                dist.set_drive(drive);
                assert_finite_output(&mut dist, &format!("{:?} drive {} @ {}", kind, drive, sr));
            }
        }
    }
}

#[test]
fn modulation_extremes() {
    for sr in [LOW_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for kind in ModulationType::ALL {
            for value in [0.0, 1.0] {
                let mut delay = DelayStage::new(sr);
                delay.set_mix(0.0);
                let mut modulation = ModulationStage::new(sr);
                modulation.set_type(kind);
                modulation.set_rate(value);
                modulation.set_depth(value);
                for i in 0..NUM_SAMPLES {
                    let y = modulation.process(test_input(i), delay.line());
                    delay.process(y);
                    assert!(y.is_finite(), "{:?} {} @ {}: {}", kind, value, sr, y);
                }
            }
        }
    }
}

#[test]
fn delay_extremes() {
    for sr in [LOW_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for value in [0.0, 1.0] {
            for reverse in [false, true] {
                let mut delay = DelayStage::new(sr);
                delay.set_time(value);
                delay.set_feedback(value);
                delay.set_mix(value);
                delay.set_reverse(reverse);
                assert_finite_output(
                    &mut delay,
                    &format!("delay {} reverse {} @ {}", value, reverse, sr),
                );
            }
        }
    }
}

#[test]
fn reverb_extremes() {
    for sr in [LOW_SAMPLE_RATE, HIGH_SAMPLE_RATE] {
        for value in [0.0, 1.0] {
            for reverse in [false, true] {
                let mut reverb = ReverbStage::new(sr);
                reverb.set_mix(value);
                reverb.set_size(value);
                reverb.set_shimmer(value);
                reverb.set_reverse(reverse);
                assert_finite_output(
                    &mut reverb,
                    &format!("reverb {} reverse {} @ {}", value, reverse, sr),
                );
            }
        }
    }
}
