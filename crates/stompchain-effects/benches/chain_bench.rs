//! Criterion benchmarks for the stompchain pipeline
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use stompchain_core::Effect;
use stompchain_effects::chain::{MultiFx, ParamId};
use stompchain_effects::{AmpStage, DelayStage, DistortionStage, ReverbStage};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_stage<E: Effect>(c: &mut Criterion, name: &str, mut effect: E) {
    let mut group = c.benchmark_group(name);
    let input = generate_test_signal(512);
    let mut output = vec![0.0; 512];
    group.bench_function("512", |b| {
        b.iter(|| {
            effect.process_block(black_box(&input), &mut output);
            black_box(output[0])
        })
    });
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    bench_stage(c, "Amp", AmpStage::new(SAMPLE_RATE));
    bench_stage(c, "Distortion", DistortionStage::new(SAMPLE_RATE));

    let mut delay = DelayStage::new(SAMPLE_RATE);
    delay.set_mix(0.5);
    bench_stage(c, "Delay", delay);

    let mut reverb = ReverbStage::new(SAMPLE_RATE);
    reverb.set_mix(0.5);
    reverb.set_shimmer(0.5);
    bench_stage(c, "ReverbShimmer", reverb);
}

fn bench_full_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("MultiFx");

    let Ok(mut fx) = MultiFx::with_sample_rate(SAMPLE_RATE) else {
        return;
    };
    fx.set_parameter(ParamId::ReverbShimmer, 0.4);
    fx.set_parameter(ParamId::ModType, 0.5);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = vec![0.0; block_size];
                let mut right = vec![0.0; block_size];
                b.iter(|| {
                    fx.process_block([black_box(&input), black_box(&input)], [&mut left, &mut right]);
                    black_box(left[0] + right[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_full_chain);

criterion_main!(benches);
