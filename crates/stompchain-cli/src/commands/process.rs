//! File-based processing command.

use crate::commands::common::{load_preset, parse_param_arg, rms, to_dbfs};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use stompchain_effects::MultiFx;
use stompchain_effects::chain::{ParamId, TracingObserver};
use stompchain_io::{
    DEFAULT_BLOCK_SIZE, Renderer, SUPPORTED_BIT_DEPTHS, WavSpec, read_wav_stereo, write_wav_stereo,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono files are processed as dual mono)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override applied after the preset (e.g. "dist_type=fuzz", "delay_mix=0.4")
    #[arg(long, value_parser = parse_param_arg)]
    param: Vec<(ParamId, f32)>,

    /// Processing block size
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value_t = 32)]
    bit_depth: u16,

    /// Seconds of silence appended so delay and reverb tails ring out
    #[arg(long, default_value = "2.0")]
    tail: f32,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&args.bit_depth) {
        anyhow::bail!(
            "Unsupported bit depth {} (expected one of {:?})",
            args.bit_depth,
            SUPPORTED_BIT_DEPTHS
        );
    }

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} ch, {} Hz, {:.2}s",
        input.len(),
        spec.channels,
        spec.sample_rate,
        input.len() as f32 / sample_rate
    );

    let mut fx = MultiFx::with_sample_rate(sample_rate)?;
    fx.set_observer(Box::new(TracingObserver));

    if let Some(name) = &args.preset {
        let preset = load_preset(name)?;
        println!("Loading preset: {}", preset.name);
        preset.apply(&mut fx)?;
    }
    for &(id, value) in &args.param {
        let stored = fx.set_parameter(id, value);
        println!(
            "  {} = {}",
            id.string_id(),
            id.descriptor().format_value(stored)
        );
    }

    let mut renderer = Renderer::new(fx, args.block_size);
    let total = input.len() + (args.tail.max(0.0) * sample_rate) as usize;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let output = renderer.render(&input, args.tail, |done, _| pb.set_position(done as u64));
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        to_dbfs(rms(&input.left, &input.right)),
        to_dbfs(input.peak())
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        to_dbfs(rms(&output.left, &output.right)),
        to_dbfs(output.peak())
    );

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}
