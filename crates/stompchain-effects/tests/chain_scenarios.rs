//! End-to-end scenarios through `MultiFx`.

use stompchain_effects::chain::{ChainError, MultiFx, ParamId};

const BLOCK: usize = 512;

const BYPASSES: [ParamId; 5] = [
    ParamId::AmpBypass,
    ParamId::DistBypass,
    ParamId::ModBypass,
    ParamId::DelayBypass,
    ParamId::ReverbBypass,
];

/// Run a mono signal through both channels in fixed-size blocks, returning the left output.
fn run(fx: &mut MultiFx, input: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(input.len());
    let mut left = [0.0f32; BLOCK];
    let mut right = [0.0f32; BLOCK];
    for chunk in input.chunks(BLOCK) {
        let n = fx.process_block([chunk, chunk], [&mut left[..chunk.len()], &mut right[..chunk.len()]]);
        out.extend_from_slice(&left[..n]);
    }
    out
}

/// Chain with only the delay stage active at unity output.
fn delay_only(sample_rate: f32) -> MultiFx {
    let mut fx = MultiFx::with_sample_rate(sample_rate).unwrap();
    for id in BYPASSES {
        fx.set_parameter(id, 1.0);
    }
    fx.set_parameter(ParamId::DelayBypass, 0.0);
    fx.set_parameter(ParamId::OutputLevel, 1.0);
    fx
}

#[test]
fn full_bypass_applies_output_level() {
    let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
    for id in BYPASSES {
        fx.set_parameter(id, 1.0);
    }
    fx.set_parameter(ParamId::OutputLevel, 0.7);

    let out = run(&mut fx, &[0.5; 2048]);
    for (i, &s) in out.iter().enumerate() {
        assert!((s - 0.35).abs() < 1e-6, "sample {} was {}", i, s);
    }
}

#[test]
fn delay_impulse_repeats_at_delay_time() {
    let mut fx = delay_only(44100.0);
    fx.set_parameter(ParamId::DelayTime, 0.5);
    fx.set_parameter(ParamId::DelayFeedback, 0.3);
    fx.set_parameter(ParamId::DelayMix, 1.0);

    // (0.1 + 3.9 * 0.5) s at 44.1 kHz, truncated in f32.
    let period = ((0.1f32 + 0.5 * 3.9f32) * 44100.0) as usize;
    assert_eq!(period, 90405);

    let mut input = vec![0.0f32; 3 * period + 1];
    input[0] = 1.0;
    let out = run(&mut fx, &input);

    assert!(out[1..period].iter().all(|&s| s.abs() < 1e-6));
    assert!((out[period] - 1.0).abs() < 1e-5, "first repeat {}", out[period]);
    assert!((out[2 * period] - 0.3).abs() < 1e-5, "second repeat {}", out[2 * period]);
    assert!((out[3 * period] - 0.09).abs() < 1e-5, "third repeat {}", out[3 * period]);
}

#[test]
fn reverse_delay_plays_chunk_backwards() {
    let mut fx = delay_only(8000.0);
    fx.set_parameter(ParamId::DelayTime, 0.0);
    fx.set_parameter(ParamId::DelayFeedback, 0.0);
    fx.set_parameter(ParamId::DelayMix, 1.0);
    fx.set_parameter(ParamId::DelayReverse, 1.0);

    // 0.1 s at 8 kHz
    let chunk = 800;
    let ramp: Vec<f32> = (0..chunk).map(|i| (i + 1) as f32 / chunk as f32).collect();
    let mut input = ramp.clone();
    input.resize(2 * chunk, 0.0);
    let out = run(&mut fx, &input);

    let reversed: Vec<f32> = ramp.iter().rev().copied().collect();
    assert_eq!(&out[chunk - 1..2 * chunk - 1], reversed.as_slice());
}

#[test]
fn silence_after_signal_decays() {
    let sr = 22050.0;
    let mut fx = MultiFx::with_sample_rate(sr).unwrap();
    fx.set_parameter(ParamId::ReverbMix, 0.6);
    fx.set_parameter(ParamId::DelayMix, 0.5);
    fx.set_parameter(ParamId::DelayTime, 0.0);
    fx.set_parameter(ParamId::DelayFeedback, 0.3);

    let burst: Vec<f32> = (0..11025).map(|i| libm::sinf(i as f32 * 0.05) * 0.5).collect();
    run(&mut fx, &burst);

    let second = 22050;
    let tail = run(&mut fx, &vec![0.0; 12 * second]);
    let energy = |s: &[f32]| s.iter().map(|x| x * x).sum::<f32>();
    let first = energy(&tail[..second]);
    let last = energy(&tail[11 * second..]);

    assert!(tail.iter().all(|s| s.is_finite()));
    assert!(first > 0.0);
    assert!(last < first * 0.01, "tail did not decay: first {} last {}", first, last);
}

#[test]
fn parameters_are_clamped_on_set() {
    let mut fx = MultiFx::new();
    assert_eq!(fx.set_parameter(ParamId::Gain, 1.7), 1.0);
    assert_eq!(fx.set_parameter(ParamId::Bass, -0.3), 0.0);
    assert_eq!(fx.get_parameter(ParamId::Gain), 1.0);
    assert_eq!(fx.get_parameter(ParamId::Bass), 0.0);
    assert_eq!(fx.set_parameter(ParamId::ModType, 0.6), 0.5);
    assert_eq!(fx.set_parameter(ParamId::ReverbMix, f32::NAN), 0.3);
}

#[test]
fn queued_changes_last_value_wins() {
    let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
    for id in BYPASSES {
        fx.set_parameter(id, 1.0);
    }
    fx.queue_parameter(ParamId::OutputLevel, 0.1);
    fx.queue_parameter(ParamId::OutputLevel, 0.5);

    let out = run(&mut fx, &[1.0; 16]);
    assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
}

#[test]
fn unprepared_chain_is_silent() {
    let mut fx = MultiFx::new();
    let out = run(&mut fx, &[0.9; 100]);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn invalid_sample_rate_is_rejected() {
    let mut fx = MultiFx::new();
    assert_eq!(fx.prepare(-48000.0), Err(ChainError::InvalidSampleRate(-48000.0)));
    assert_eq!(fx.prepare(4000.0), Err(ChainError::InvalidSampleRate(4000.0)));
    assert!(fx.prepare(f32::INFINITY).is_err());
    assert!(MultiFx::with_sample_rate(8000.0).is_ok());
    assert!(MultiFx::with_sample_rate(384000.0).is_ok());
}

#[test]
fn reprepare_clears_tails() {
    let mut fx = MultiFx::with_sample_rate(44100.0).unwrap();
    run(&mut fx, &[0.5; 4096]);
    fx.prepare(48000.0).unwrap();
    let out = run(&mut fx, &[0.0; 1024]);
    assert!(out.iter().all(|&s| s.abs() < 1e-9));
}

#[test]
fn mono_block_matches_left_channel() {
    let input: Vec<f32> = (0..2048).map(|i| libm::sinf(i as f32 * 0.02) * 0.4).collect();

    let mut stereo = MultiFx::with_sample_rate(44100.0).unwrap();
    let expected = run(&mut stereo, &input);

    let mut mono = MultiFx::with_sample_rate(44100.0).unwrap();
    let mut out = vec![0.0f32; input.len()];
    for (i, o) in input.chunks(BLOCK).zip(out.chunks_mut(BLOCK)) {
        mono.process_mono_block(i, o);
    }
    assert_eq!(out, expected);
}
