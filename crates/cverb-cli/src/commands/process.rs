//! File-based reverb processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use cverb_config::{Overflow, ReverbPreset, load_preset, validate_preset};
use cverb_core::Reverb;
use cverb_io::{RunObserver, StreamStats, process_raw_file_with, process_wav_file_with};
use indicatif::{ProgressBar, ProgressStyle};

/// Output path used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "cverb_out.wav";

#[derive(Clone, Copy, ValueEnum)]
enum OverflowArg {
    /// Clamp to the 16-bit range
    Saturate,
    /// Wrap modulo 2^16
    Wrap,
    /// Abort on the first out-of-range sample
    Fail,
}

impl From<OverflowArg> for Overflow {
    fn from(value: OverflowArg) -> Self {
        match value {
            OverflowArg::Saturate => Overflow::Saturate,
            OverflowArg::Wrap => Overflow::Wrap,
            OverflowArg::Fail => Overflow::Fail,
        }
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (mono 16-bit PCM WAV, or raw PCM with --raw)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(short, long, value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long, default_value = "reference")]
    preset: String,

    /// Comb and all-pass delay in milliseconds
    #[arg(long)]
    delay_ms: Option<f32>,

    /// Number of comb feedback taps
    #[arg(long)]
    combs: Option<usize>,

    /// Number of all-pass stages
    #[arg(long)]
    allpasses: Option<usize>,

    /// Comb feedback gain per tap
    #[arg(long)]
    comb_feedback: Option<f32>,

    /// All-pass feed-forward and feedback gain
    #[arg(long)]
    allpass_gain: Option<f32>,

    /// Silence appended after the input, in milliseconds
    #[arg(long)]
    tail_ms: Option<f32>,

    /// Handling of samples outside the 16-bit range
    #[arg(long, value_enum)]
    overflow: Option<OverflowArg>,

    /// Treat input and output as headerless PCM
    #[arg(long, requires = "sample_rate")]
    raw: bool,

    /// Sample rate of raw input in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Raw frames are big-endian
    #[arg(long, requires = "raw")]
    big_endian: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

impl ProcessArgs {
    fn resolve_preset(&self) -> anyhow::Result<ReverbPreset> {
        let mut preset = load_preset(&self.preset)?;
        let params = &mut preset.reverb;

        if let Some(v) = self.delay_ms {
            params.delay_ms = v;
            params.allpass_delays_ms.clear();
        }
        if let Some(v) = self.combs {
            params.comb_count = v;
        }
        if let Some(v) = self.allpasses {
            params.allpass_count = v;
            params.allpass_delays_ms.clear();
        }
        if let Some(v) = self.comb_feedback {
            params.comb_feedback = v;
        }
        if let Some(v) = self.allpass_gain {
            params.allpass_feedforward = v;
            params.allpass_feedback = v;
        }
        if let Some(v) = self.tail_ms {
            params.tail_ms = v;
        }
        if let Some(v) = self.overflow {
            params.overflow = v.into();
        }
        if self.big_endian {
            params.endianness = cverb_config::ByteOrder::Big;
        }

        validate_preset(&preset)
            .with_context(|| format!("preset '{}' is not usable", preset.name))?;
        Ok(preset)
    }
}

/// Prints sizing when the run starts and drives the progress bar.
struct Console<'a> {
    args: &'a ProcessArgs,
    bar: ProgressBar,
}

impl<'a> Console<'a> {
    fn new(args: &'a ProcessArgs) -> anyhow::Result<Self> {
        let bar = if args.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                    .progress_chars("##-"),
            );
            bar
        };
        Ok(Self { args, bar })
    }
}

impl RunObserver for Console<'_> {
    fn started(&mut self, reverb: &Reverb, input_frames: u64, tail_frames: u64) {
        println!(
            "Input:  {} ({} frames, {} Hz{})",
            self.args.input.display(),
            input_frames,
            reverb.sample_rate(),
            if self.args.raw { ", raw" } else { "" }
        );
        println!(
            "Reverb: {} combs x {} samples, {} all-passes, {}-slot lines",
            reverb.comb().count(),
            reverb.comb().delay_samples(),
            reverb.allpass().len(),
            reverb.capacity()
        );
        self.bar.set_length(input_frames + tail_frames);
    }

    fn progress(&mut self, frames_out: u64) {
        self.bar.set_position(frames_out);
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let preset = args.resolve_preset()?;
    let config = preset.to_config();
    println!("Preset: {}", preset.name);

    let mut console = Console::new(&args)?;
    let result = if args.raw {
        let sample_rate = args
            .sample_rate
            .context("--sample-rate is required with --raw")?;
        process_raw_file_with(
            &args.input,
            &args.output,
            &config,
            sample_rate,
            preset.tail_ms(),
            &mut console,
        )
    } else {
        process_wav_file_with(
            &args.input,
            &args.output,
            &config,
            preset.tail_ms(),
            &mut console,
        )
    };
    console.bar.finish_and_clear();
    let stats = result?;

    tracing::info!(
        output = %args.output.display(),
        frames = stats.frames_out,
        "reverb applied"
    );
    print_stats(&stats, &args.output);
    Ok(())
}

fn print_stats(stats: &StreamStats, output: &std::path::Path) {
    println!("Output: {} ({} frames)", output.display(), stats.frames_out);
    println!(
        "Stats:  {} in, {} out, peak {} ({:.1} dBFS), {} clipped",
        stats.frames_in,
        stats.frames_out,
        stats.peak,
        stats.peak_dbfs(),
        stats.clipped
    );
    if stats.clipped > 0 {
        println!("Warning: {} samples left the 16-bit range", stats.clipped);
    }
}
