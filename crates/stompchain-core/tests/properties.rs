//! Property-based tests for stompchain-core primitives.

use proptest::prelude::*;
use stompchain_core::{
    AllpassDiffuser, CombFilter, DelayLine, Interpolation, Lfo, NoiseGate, OnePole,
    OnePoleCascade, ParamDescriptor, equal_power_levels, soft_limit,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn delay_reads_stay_within_written_range(
        input in prop::array::uniform32(-1.0f32..=1.0f32),
        delay in -10.0f32..100.0f32,
        len in 1usize..64,
        cubic in any::<bool>(),
    ) {
        let mut line = DelayLine::new(len);
        if cubic {
            line.set_interpolation(Interpolation::Cubic);
        }
        for &x in &input {
            line.write(x);
            let y = line.read(delay);
            prop_assert!(y.is_finite());
            // Catmull-Rom may overshoot the written range slightly.
            prop_assert!(y.abs() <= 2.5, "read {} out of range", y);
            if !cubic {
                prop_assert!(y.abs() <= 1.0 + 1e-6);
            }
        }
    }

    #[test]
    fn absolute_reads_accept_any_position(
        position in -1.0e6f32..1.0e6f32,
        len in 1usize..128,
    ) {
        let mut line = DelayLine::new(len);
        for i in 0..len {
            line.write((i as f32 * 0.37).sin());
        }
        prop_assert!(line.read_at(position).abs() <= 1.0 + 1e-5);
        prop_assert!(line.read_cubic_at(position).is_finite());
    }

    #[test]
    fn reversed_tail_mirrors_writes(values in prop::collection::vec(-1.0f32..=1.0f32, 1..200)) {
        let mut line = DelayLine::new(values.len());
        for &v in &values {
            line.write(v);
        }
        let mut out = vec![0.0; values.len()];
        line.copy_reversed_tail(&mut out);
        let expected: Vec<f32> = values.iter().rev().copied().collect();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn one_pole_output_bounded_by_input(
        input in prop::array::uniform32(-1.0f32..=1.0f32),
        coeff in 0.0f32..=1.0f32,
    ) {
        let mut pole = OnePole::new(coeff);
        let mut cascade = OnePoleCascade::new([0.95, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3]);
        for &x in &input {
            prop_assert!(pole.process(x).abs() <= 1.0 + 1e-6);
            prop_assert!(cascade.process(x).abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn feedback_networks_stay_finite(
        input in prop::array::uniform32(-1.0f32..=1.0f32),
        feedback in 0.0f32..0.9f32,
        damping in 0.0f32..=1.0f32,
    ) {
        let mut comb = CombFilter::new(37);
        comb.set_feedback(feedback);
        comb.set_damping(damping);
        let mut ap = AllpassDiffuser::new(13, feedback);
        for _ in 0..50 {
            for &x in &input {
                let y = ap.process(comb.process(x));
                prop_assert!(y.is_finite());
                prop_assert!(y.abs() < 1.0e3);
            }
        }
    }

    #[test]
    fn gate_passes_or_silences(input in prop::array::uniform32(-0.01f32..=0.01f32)) {
        let mut gate = NoiseGate::new(0.004, 0.002);
        for &x in &input {
            let y = gate.process(x);
            prop_assert!(y == 0.0 || y == x);
        }
    }

    #[test]
    fn lfo_unipolar_in_unit_range(freq in 0.0f32..10_000.0f32, rate in 8000.0f32..192_000.0f32) {
        let mut lfo = Lfo::new(rate, freq);
        for _ in 0..256 {
            let v = lfo.next_unipolar();
            prop_assert!((0.0..=1.0).contains(&v));
            prop_assert!((0.0..1.0).contains(&lfo.phase()));
        }
    }

    #[test]
    fn sanitize_always_in_unit_range(value in prop::num::f32::ANY) {
        let d = ParamDescriptor::percent("Mix", "Mix", "mix", 0.3);
        let v = d.sanitize(value);
        prop_assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn equal_power_and_soft_limit(mix in 0.0f32..=1.0f32, x in -100.0f32..100.0f32) {
        let (dry, wet) = equal_power_levels(mix);
        prop_assert!((dry * dry + wet * wet - 1.0).abs() < 1e-4);
        prop_assert!(soft_limit(x, 0.8).abs() <= 0.8);
    }
}
