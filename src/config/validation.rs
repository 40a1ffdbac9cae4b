use super::{
    AppConfig, ConfigError, DetectorConfig, EstimatorConfig, MAX_CALIBRATE_SAMPLE_MS,
    MAX_DETECTOR_DURATION_MS, MAX_RUN_SECONDS, MIN_CALIBRATE_SAMPLE_MS,
};
use anyhow::{bail, Result};
use tracing::warn;

impl AppConfig {
    /// Check CLI-only ranges, then the detector and estimator settings they feed.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RUN_SECONDS).contains(&self.seconds) {
            bail!(
                "--seconds must be between 1 and {MAX_RUN_SECONDS}, got {}",
                self.seconds
            );
        }
        if !(MIN_CALIBRATE_SAMPLE_MS..=MAX_CALIBRATE_SAMPLE_MS).contains(&self.calibrate_ambient_ms)
        {
            bail!(
                "--calibrate-ambient-ms must be between {MIN_CALIBRATE_SAMPLE_MS} and {MAX_CALIBRATE_SAMPLE_MS} ms"
            );
        }
        if !(MIN_CALIBRATE_SAMPLE_MS..=MAX_CALIBRATE_SAMPLE_MS).contains(&self.calibrate_speech_ms)
        {
            bail!(
                "--calibrate-speech-ms must be between {MIN_CALIBRATE_SAMPLE_MS} and {MAX_CALIBRATE_SAMPLE_MS} ms"
            );
        }
        if !(1..=65_536).contains(&self.event_channel_capacity) {
            bail!(
                "--event-channel-capacity must be between 1 and 65536, got {}",
                self.event_channel_capacity
            );
        }
        if let Some(path) = &self.wav {
            if !path.is_file() {
                bail!("--wav path '{}' is not a readable file", path.display());
            }
        }

        self.detector_config().validate()?;
        self.estimator_config().validate()?;
        Ok(())
    }

    /// Snapshot the CLI-controlled classifier settings.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            tick_interval_ms: self.tick_interval_ms,
            prespeechstart_ms: self.prespeechstart_ms,
            speaking_min_volume: self.speaking_min_volume,
            silence_volume: self.silence_volume,
            mute_volume: self.mute_volume,
            recording_enabled: !self.disable_recording,
            max_interspeech_silence_ms: self.max_interspeech_silence_ms,
            min_signal_duration_ms: self.min_signal_duration_ms,
            min_average_signal_volume: self.min_average_signal_volume,
        }
    }

    /// Snapshot the CLI-controlled estimator settings.
    pub fn estimator_config(&self) -> EstimatorConfig {
        EstimatorConfig {
            clip_level: self.clip_level,
            averaging_factor: self.averaging_factor,
            clip_lag_ms: self.clip_lag_ms,
            block_size: self.block_size,
        }
    }
}

impl DetectorConfig {
    /// Reject configurations that make the classifier's branches degenerate.
    ///
    /// Imprecise but workable settings (a heartbeat window that is not a
    /// multiple of the tick, a silence volume outside the hysteresis band) are
    /// logged and accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        check_duration("tick_interval_ms", self.tick_interval_ms)?;
        check_duration("prespeechstart_ms", self.prespeechstart_ms)?;
        check_duration("max_interspeech_silence_ms", self.max_interspeech_silence_ms)?;
        check_duration("min_signal_duration_ms", self.min_signal_duration_ms)?;
        check_volume("speaking_min_volume", self.speaking_min_volume)?;
        check_volume("silence_volume", self.silence_volume)?;
        check_volume("mute_volume", self.mute_volume)?;
        check_volume("min_average_signal_volume", self.min_average_signal_volume)?;
        if self.mute_volume >= self.speaking_min_volume {
            return Err(ConfigError::ThresholdOrder {
                mute_volume: self.mute_volume,
                speaking_min_volume: self.speaking_min_volume,
            });
        }
        if self.max_silence_ticks() == 0 {
            return Err(ConfigError::ZeroSilenceTicks {
                max_interspeech_silence_ms: self.max_interspeech_silence_ms,
                tick_interval_ms: self.tick_interval_ms,
            });
        }

        if self.prespeechstart_ms % self.tick_interval_ms != 0 {
            warn!(
                prespeechstart_ms = self.prespeechstart_ms,
                tick_interval_ms = self.tick_interval_ms,
                "prespeechstart window is not a multiple of the tick interval; heartbeat cadence will drift"
            );
        }
        if self.silence_volume < self.mute_volume || self.silence_volume > self.speaking_min_volume
        {
            warn!(
                silence_volume = self.silence_volume,
                "silence volume lies outside the mute/speaking band and has no effect"
            );
        }
        Ok(())
    }
}

impl EstimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if !(0.0..1.0).contains(&self.averaging_factor) {
            return Err(ConfigError::AveragingFactor(self.averaging_factor));
        }
        if !(self.clip_level > 0.0 && self.clip_level <= 1.0) {
            return Err(ConfigError::ClipLevel(self.clip_level));
        }
        Ok(())
    }
}

fn check_volume(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVolume { name, value })
    }
}

fn check_duration(name: &'static str, value_ms: u64) -> Result<(), ConfigError> {
    if value_ms > MAX_DETECTOR_DURATION_MS {
        return Err(ConfigError::DurationTooLong {
            name,
            value_ms,
            max_ms: MAX_DETECTOR_DURATION_MS,
        });
    }
    Ok(())
}
