//! Test signal generation command.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::wav::{WavSpec, write_wav};

const SAMPLE_RATE: u32 = 44_100;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "1000.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "2.0")]
        duration: f32,

        /// Amplitude (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f32,
    },

    /// Generate a single-sample impulse
    Impulse {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Length in samples
        #[arg(long, default_value = "44100")]
        length: usize,

        /// Impulse amplitude (0-1)
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
    };

    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            amplitude,
        } => {
            let amplitude = amplitude.clamp(0.0, 1.0);
            let num_samples = (duration.max(0.0) * SAMPLE_RATE as f32) as usize;
            let samples: Vec<i16> = (0..num_samples)
                .map(|n| {
                    let t = n as f32 / SAMPLE_RATE as f32;
                    let v = (std::f32::consts::TAU * freq * t).sin() * amplitude;
                    (v * f32::from(i16::MAX)) as i16
                })
                .collect();

            tracing::info!(freq, duration, "generating tone");
            write_wav(&output, &samples, spec)?;
            println!(
                "Wrote {} ({} samples, {freq} Hz tone)",
                output.display(),
                samples.len()
            );
        }
        GenerateCommand::Impulse {
            output,
            length,
            amplitude,
        } => {
            let amplitude = amplitude.clamp(0.0, 1.0);
            let mut samples = vec![0i16; length.max(1)];
            samples[0] = (amplitude * f32::from(i16::MAX)) as i16;

            tracing::info!(length, "generating impulse");
            write_wav(&output, &samples, spec)?;
            println!(
                "Wrote {} ({} samples, impulse at sample 0)",
                output.display(),
                samples.len()
            );
        }
    }

    Ok(())
}
