//! Stereo WAV decoding and encoding for offline rendering.
//!
//! The pipeline is always stereo, so everything here converts to and from
//! [`StereoSamples`]: mono files are duplicated onto both channels and extra
//! channels beyond the first two are ignored. Output is 16- or 24-bit PCM or
//! 32-bit float.

use crate::{Error, Result, StereoSamples};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Bit depths accepted by [`write_wav_stereo`]. 32 bits is written as float.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// Channel layout, rate and bit depth of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Channels in the file. Output files are always written with 2.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample; 32 means float.
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// True for the 32-bit float encoding.
    pub fn is_float(&self) -> bool {
        self.bits_per_sample == 32
    }

    /// Scale between `[-1, 1)` floats and integer PCM at this depth.
    fn pcm_full_scale(&self) -> f32 {
        (1i64 << (self.bits_per_sample.clamp(1, 32) - 1)) as f32
    }
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(h: hound::WavSpec) -> Self {
        Self {
            channels: h.channels,
            sample_rate: h.sample_rate,
            bits_per_sample: h.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.is_float() {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Decode a WAV file into stereo frames, returning the file's own spec.
///
/// Integer PCM is scaled into `[-1, 1)`. A file with zero channels is
/// rejected.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let format = reader.spec().sample_format;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels);
    if channels == 0 {
        return Err(Error::UnsupportedFormat("file declares zero channels".into()));
    }

    let interleaved: Vec<f32> = if format == SampleFormat::Float {
        reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?
    } else {
        let scale = spec.pcm_full_scale().recip();
        reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 * scale))
            .collect::<std::result::Result<_, _>>()?
    };

    let frames = match channels {
        1 => StereoSamples::from_mono(interleaved),
        2 => StereoSamples::from_interleaved(&interleaved),
        n => {
            let (left, right): (Vec<f32>, Vec<f32>) = interleaved
                .chunks_exact(n)
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            StereoSamples::new(left, right)
        }
    };

    tracing::debug!(
        frames = frames.len(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "decoded wav"
    );
    Ok((frames, spec))
}

/// Encode stereo frames at `spec.sample_rate` and `spec.bits_per_sample`.
///
/// `spec.channels` is ignored. Integer output is clamped to full scale, so
/// overs clip instead of wrapping.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    if !SUPPORTED_BIT_DEPTHS.contains(&spec.bits_per_sample) {
        return Err(Error::UnsupportedFormat(format!(
            "{}-bit output, expected one of {:?}",
            spec.bits_per_sample, SUPPORTED_BIT_DEPTHS
        )));
    }

    let spec = WavSpec { channels: 2, ..spec };
    let mut writer = WavWriter::create(path, spec.into())?;
    let frames = samples.left.iter().zip(&samples.right);

    if spec.is_float() {
        for (&l, &r) in frames {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let scale = spec.pcm_full_scale();
        let quantize = |x: f32| (x * scale).clamp(-scale, scale - 1.0) as i32;
        for (&l, &r) in frames {
            writer.write_sample(quantize(l))?;
            writer.write_sample(quantize(r))?;
        }
    }

    writer.finalize()?;
    tracing::debug!(frames = samples.len(), bits = spec.bits_per_sample, "encoded wav");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sweep(len: usize) -> StereoSamples {
        let left: Vec<f32> = (0..len).map(|i| (i as f32 * 0.01).sin() * 0.7).collect();
        let right: Vec<f32> = left.iter().map(|s| -s * 0.5).collect();
        StereoSamples::new(left, right)
    }

    #[test]
    fn float_output_is_lossless() {
        let samples = sweep(1000);
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec, WavSpec::default());
        assert_eq!(loaded, samples);
    }

    #[test]
    fn pcm_24_is_within_one_lsb() {
        let samples = sweep(1000);
        let spec = WavSpec {
            sample_rate: 44100,
            bits_per_sample: 24,
            ..WavSpec::default()
        };
        let file = NamedTempFile::new().unwrap();
        write_wav_stereo(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
        assert!(!loaded_spec.is_float());
        let lsb = 1.0 / (1 << 23) as f32;
        for (a, b) in samples.right.iter().zip(&loaded.right) {
            assert!((a - b).abs() <= lsb);
        }
    }

    #[test]
    fn unsupported_depth_is_rejected_before_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let spec = WavSpec {
            bits_per_sample: 8,
            ..WavSpec::default()
        };
        let err = write_wav_stereo(&path, &sweep(10), spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[test]
    fn multichannel_keeps_first_two() {
        let file = NamedTempFile::new().unwrap();
        let h = hound::WavSpec {
            channels: 4,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(file.path(), h).unwrap();
        for frame in 0..3 {
            for ch in 0..4 {
                writer.write_sample(frame as f32 + ch as f32 * 10.0).unwrap();
            }
        }
        writer.finalize().unwrap();

        let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 4);
        assert_eq!(loaded.left, vec![0.0, 1.0, 2.0]);
        assert_eq!(loaded.right, vec![10.0, 11.0, 12.0]);
    }
}
