//! WAV file reading and writing, 16-bit PCM focused.
//!
//! The engines work on `i16` blocks, so everything read here is converted
//! to 16-bit integer frames up front: higher integer depths are shifted
//! down, 8-bit shifted up, and float material scaled. Samples stay
//! interleaved; the process command deinterleaves per channel.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Errors from WAV file I/O.
#[derive(Debug, thiserror::Error)]
pub enum WavError {
    /// Underlying WAV read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Integer bit depth this tool does not convert.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

/// Read a WAV file as interleaved 16-bit PCM frames.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("input.wav")?;
/// println!("{} frames at {} Hz", samples.len() / spec.channels as usize, spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, WavSpec), WavError> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec {
        channels: hound_spec.channels,
        sample_rate: hound_spec.sample_rate,
    };

    let samples: Vec<i16> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = hound_spec.bits_per_sample;
            match bits {
                16 => reader
                    .into_samples::<i16>()
                    .collect::<Result<Vec<_>, _>>()?,
                8 => reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| (v << 8) as i16))
                    .collect::<Result<Vec<_>, _>>()?,
                24 | 32 => {
                    let shift = bits - 16;
                    reader
                        .into_samples::<i32>()
                        .map(|s| s.map(|v| (v >> shift) as i16))
                        .collect::<Result<Vec<_>, _>>()?
                }
                other => return Err(WavError::UnsupportedBitDepth(other)),
            }
        }
    };

    Ok((samples, spec))
}

/// Write interleaved 16-bit PCM frames to a WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[i16], spec: WavSpec) -> Result<(), WavError> {
    let hound_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, hound_spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");

        let samples: Vec<i16> = (0..1000).map(|i| (i * 31) as i16).collect();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
        };
        write_wav(&path, &samples, spec).unwrap();

        let (read_back, read_spec) = read_wav(&path).unwrap();
        assert_eq!(read_back, samples);
        assert_eq!(read_spec.channels, 1);
        assert_eq!(read_spec.sample_rate, 44_100);
    }

    #[test]
    fn test_roundtrip_stereo_interleaved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let samples: Vec<i16> = (0..500)
            .flat_map(|i| [i as i16, -(i as i16)])
            .collect();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44_100,
        };
        write_wav(&path, &samples, spec).unwrap();

        let (read_back, read_spec) = read_wav(&path).unwrap();
        assert_eq!(read_back, samples);
        assert_eq!(read_spec.channels, 2);
    }

    #[test]
    fn test_missing_file_errors() {
        let err = read_wav("/nonexistent/nope.wav").unwrap_err();
        assert!(matches!(err, WavError::Wav(_)));
    }
}
