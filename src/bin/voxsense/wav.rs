//! `--wav`: replay a recording through the detector on a simulated clock.

use crate::cli_utils::write_event;
use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};
use std::io;
use std::path::Path;
use tracing::info;
use voxsense::audio::downmix_to_mono;
use voxsense::config::AppConfig;
use voxsense::detector::offline_detect_from_pcm;

/// Decode a WAV file into mono f32 in [-1, 1].
fn read_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("failed to open WAV file '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples = match spec.sample_format {
        SampleFormat::Float => {
            let raw = reader
                .samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("failed to decode float samples")?;
            downmix_to_mono(&raw, channels, |sample| sample)
        }
        SampleFormat::Int => {
            let bits = u32::from(spec.bits_per_sample.clamp(1, 32));
            let scale = (1u64 << (bits - 1)) as f32;
            let raw = reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .context("failed to decode integer samples")?;
            downmix_to_mono(&raw, channels, |sample| sample as f32 / scale)
        }
    };
    Ok((samples, spec.sample_rate))
}

pub(crate) fn run_wav(config: &AppConfig, path: &Path) -> Result<()> {
    let (samples, sample_rate) = read_mono(path)?;
    info!(
        path = %path.display(),
        sample_rate,
        samples = samples.len(),
        "replaying wav file"
    );

    let events = offline_detect_from_pcm(
        &samples,
        sample_rate,
        config.detector_config(),
        config.estimator_config(),
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for event in &events {
        write_event(&mut out, event)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    #[test]
    fn read_mono_downmixes_and_scales_pcm16() {
        let path = std::env::temp_dir().join(format!(
            "voxsense_read_mono_{}.wav",
            std::process::id()
        ));
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).expect("create wav");
        for _ in 0..4 {
            writer.write_sample(16_384i16).expect("left");
            writer.write_sample(0i16).expect("right");
        }
        writer.finalize().expect("finalize wav");

        let (samples, rate) = read_mono(&path).expect("read wav");
        let _ = std::fs::remove_file(&path);

        assert_eq!(rate, 8_000);
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| (s - 0.25).abs() < 1e-6));
    }
}
