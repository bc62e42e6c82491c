//! File-based chorus processing command.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::PathBuf;
use std::rc::Rc;

use coro_core::{AudioBlock, BLOCK_SAMPLES, BlockEffect, SAMPLE_RATE_HZ};
use coro_effects::{BbdChorus, ChorusMode, EnsembleChorus, PhaseLatch, StereoChannel};

use crate::wav::{WavSpec, read_wav, write_wav};

/// Delay storage handed to each engine instance, in samples.
///
/// Comfortably above the deepest tap either engine sweeps (220 samples for
/// the BBD, ~236 for the ensemble).
const DELAY_STORAGE_SAMPLES: usize = 512;

/// Which chorus engine to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Dual-tap BBD chorus (mono per channel, adjustable rate/depth/mix)
    Bbd,
    /// Phase-synchronized stereo ensemble chorus (modal, 100% wet)
    Ensemble,
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Chorus engine to run (default: bbd for mono input, ensemble for stereo)
    #[arg(short, long)]
    effect: Option<EffectKind>,

    /// LFO rate in Hz (bbd only, 0.1-5.0)
    #[arg(long)]
    rate: Option<f32>,

    /// Modulation depth 0-1 (bbd only)
    #[arg(long)]
    depth: Option<f32>,

    /// Wet/dry mix 0-1 (bbd only)
    #[arg(long)]
    mix: Option<f32>,

    /// Chorus mode 0-3 (ensemble only: 0=off, 1, 2, 3=combined)
    #[arg(long)]
    mode: Option<i32>,

    /// Bypass the effect (audio passes through untouched)
    #[arg(long)]
    bypass: bool,

    /// Preset file (TOML)
    #[arg(short, long)]
    preset: Option<PathBuf>,
}

/// Preset file contents; command-line flags override preset values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Preset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    effect: Option<EffectKind>,
    #[serde(default)]
    rate: Option<f32>,
    #[serde(default)]
    depth: Option<f32>,
    #[serde(default)]
    mix: Option<f32>,
    #[serde(default)]
    mode: Option<i32>,
    #[serde(default)]
    bypass: Option<bool>,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav(&args.input)?;
    let channels = spec.channels as usize;
    let frames = samples.len() / channels;

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        channels,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    if spec.sample_rate as f32 != SAMPLE_RATE_HZ {
        tracing::warn!(
            input_rate = spec.sample_rate,
            engine_rate = SAMPLE_RATE_HZ,
            "engines are tuned for 44.1 kHz; modulation times will be off"
        );
    }

    let preset = match &args.preset {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let preset: Preset = toml::from_str(&content)?;
            if let Some(name) = &preset.name {
                println!("Loading preset: {name}");
            }
            preset
        }
        None => Preset::default(),
    };

    let effect = args
        .effect
        .or(preset.effect)
        .unwrap_or(if channels >= 2 { EffectKind::Ensemble } else { EffectKind::Bbd });
    let rate = args.rate.or(preset.rate);
    let depth = args.depth.or(preset.depth);
    let mix = args.mix.or(preset.mix);
    let mode = args.mode.or(preset.mode);
    let bypass = args.bypass || preset.bypass.unwrap_or(false);

    // Deinterleave into per-channel lanes.
    let mut lanes: Vec<Vec<i16>> = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks(channels) {
        for (lane, &s) in lanes.iter_mut().zip(frame) {
            lane.push(s);
        }
    }

    let input_rms = rms_dbfs(&samples);

    let out_lanes = match effect {
        EffectKind::Bbd => {
            if mode.is_some() {
                tracing::warn!("--mode has no effect on the bbd engine");
            }
            process_bbd(lanes, rate, depth, mix, bypass)?
        }
        EffectKind::Ensemble => {
            if rate.is_some() || depth.is_some() || mix.is_some() {
                tracing::warn!(
                    "--rate/--depth/--mix have no effect on the ensemble engine (fixed per mode)"
                );
            }
            process_ensemble(lanes, mode, bypass)?
        }
    };

    // Reinterleave.
    let out_channels = out_lanes.len();
    let mut output = Vec::with_capacity(frames * out_channels);
    for i in 0..frames {
        for lane in &out_lanes {
            output.push(lane[i]);
        }
    }

    println!("\nStats:");
    println!("  Input:  RMS {:.1} dBFS", input_rms);
    println!("  Output: RMS {:.1} dBFS", rms_dbfs(&output));

    let out_spec = WavSpec {
        channels: out_channels as u16,
        sample_rate: spec.sample_rate,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Run each channel lane through its own BBD chorus instance.
fn process_bbd(
    mut lanes: Vec<Vec<i16>>,
    rate: Option<f32>,
    depth: Option<f32>,
    mix: Option<f32>,
    bypass: bool,
) -> anyhow::Result<Vec<Vec<i16>>> {
    let blocks_per_lane = lanes.first().map_or(0, |l| l.len().div_ceil(BLOCK_SAMPLES));
    let pb = progress_bar((blocks_per_lane * lanes.len()) as u64);

    for lane in &mut lanes {
        let mut storage = vec![0i16; DELAY_STORAGE_SAMPLES];
        let mut chorus = BbdChorus::new(&mut storage)?;
        if let Some(rate) = rate {
            chorus.set_rate(rate);
        }
        if let Some(depth) = depth {
            chorus.set_depth(depth);
        }
        if let Some(mix) = mix {
            chorus.set_mix(mix);
        }
        chorus.set_bypass(bypass);

        for chunk in lane.chunks_mut(BLOCK_SAMPLES) {
            process_chunk(&mut chorus, chunk);
            pb.inc(1);
        }
    }

    pb.finish_with_message("done");
    Ok(lanes)
}

/// Run a stereo pair of ensemble engines in per-block lockstep.
///
/// Mono input is duplicated into both channels, so the output is always
/// stereo. The two instances share one phase latch and must be fed
/// alternately block by block, the way the embedded pipeline drives them.
fn process_ensemble(
    lanes: Vec<Vec<i16>>,
    mode: Option<i32>,
    bypass: bool,
) -> anyhow::Result<Vec<Vec<i16>>> {
    let mut left_lane = lanes[0].clone();
    let mut right_lane = lanes.get(1).cloned().unwrap_or_else(|| lanes[0].clone());
    if lanes.len() > 2 {
        tracing::warn!("input has {} channels; only the first two are processed", lanes.len());
    }

    let latch = Rc::new(PhaseLatch::new());
    let mut left_buf = vec![0i16; DELAY_STORAGE_SAMPLES];
    let mut right_buf = vec![0i16; DELAY_STORAGE_SAMPLES];
    let mut left = EnsembleChorus::new(&mut left_buf, Rc::clone(&latch), StereoChannel::Left)?;
    let mut right = EnsembleChorus::new(&mut right_buf, latch, StereoChannel::Right)?;
    if let Some(index) = mode {
        left.set_mode(ChorusMode::from_index(index));
        right.set_mode(ChorusMode::from_index(index));
    }
    left.set_bypass(bypass);
    right.set_bypass(bypass);

    let pb = progress_bar(left_lane.len().div_ceil(BLOCK_SAMPLES) as u64);

    for (l_chunk, r_chunk) in left_lane
        .chunks_mut(BLOCK_SAMPLES)
        .zip(right_lane.chunks_mut(BLOCK_SAMPLES))
    {
        process_chunk(&mut left, l_chunk);
        process_chunk(&mut right, r_chunk);
        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(vec![left_lane, right_lane])
}

/// Process one chunk through an engine, zero-padding a final short chunk.
fn process_chunk(effect: &mut dyn BlockEffect, chunk: &mut [i16]) {
    let mut block: AudioBlock = [0; BLOCK_SAMPLES];
    block[..chunk.len()].copy_from_slice(chunk);
    effect.process_block(Some(&mut block));
    chunk.copy_from_slice(&block[..chunk.len()]);
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("static progress template is valid")
            .progress_chars("##-"),
    );
    pb
}

fn rms_dbfs(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return f32::NEG_INFINITY;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    let rms = (sum / samples.len() as f64).sqrt() / f64::from(i16::MAX);
    if rms <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * rms.log10() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_dbfs_full_scale_square() {
        let samples = vec![i16::MAX; 1000];
        assert!(rms_dbfs(&samples).abs() < 0.01);
    }

    #[test]
    fn test_rms_dbfs_silence() {
        assert_eq!(rms_dbfs(&[0; 100]), f32::NEG_INFINITY);
        assert_eq!(rms_dbfs(&[]), f32::NEG_INFINITY);
    }

    #[test]
    fn test_preset_parses_minimal_toml() {
        let preset: Preset = toml::from_str("effect = \"ensemble\"\nmode = 3\n").unwrap();
        assert_eq!(preset.effect, Some(EffectKind::Ensemble));
        assert_eq!(preset.mode, Some(3));
        assert!(preset.rate.is_none());
    }

    #[test]
    fn test_preset_rejects_unknown_keys() {
        assert!(toml::from_str::<Preset>("wobble = 1.0\n").is_err());
    }

    #[test]
    fn test_process_chunk_pads_and_trims() {
        let mut storage = vec![0i16; DELAY_STORAGE_SAMPLES];
        let mut chorus = BbdChorus::new(&mut storage).unwrap();
        chorus.set_mix(0.0); // identity path

        let mut chunk = [123i16; 50];
        process_chunk(&mut chorus, &mut chunk);
        assert_eq!(chunk, [123i16; 50]);
    }
}
