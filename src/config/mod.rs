//! Detector configuration, command-line parsing, and validation helpers.

mod defaults;
mod error;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use error::ConfigError;

/// CLI options for the `voxsense` binary. Validated values are turned into the
/// library configs below before anything touches the microphone.
#[derive(Debug, Parser, Clone)]
#[command(about = "VoxSense voice activity monitor", author, version)]
pub struct AppConfig {
    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// How long to monitor the microphone before exiting (seconds)
    #[arg(long, default_value_t = DEFAULT_RUN_SECONDS)]
    pub seconds: u64,

    /// Replay a WAV file through the detector instead of opening a microphone
    #[arg(long)]
    pub wav: Option<PathBuf>,

    /// Measure ambient noise and speech, suggest thresholds, then exit
    #[arg(long, default_value_t = false)]
    pub calibrate: bool,

    /// Ambient noise sample duration for calibration (milliseconds)
    #[arg(long = "calibrate-ambient-ms", default_value_t = DEFAULT_CALIBRATE_AMBIENT_MS)]
    pub calibrate_ambient_ms: u64,

    /// Speech sample duration for calibration (milliseconds)
    #[arg(long = "calibrate-speech-ms", default_value_t = DEFAULT_CALIBRATE_SPEECH_MS)]
    pub calibrate_speech_ms: u64,

    /// Enable JSON trace logging to a file
    #[arg(long = "logs", env = "VOXSENSE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs)
    #[arg(long = "no-logs", env = "VOXSENSE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Interval between classification ticks (milliseconds)
    #[arg(long = "tick-interval-ms", default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    pub tick_interval_ms: u64,

    /// Cadence of the pre-speech heartbeat (milliseconds)
    #[arg(long = "prespeechstart-ms", default_value_t = DEFAULT_PRESPEECHSTART_MS)]
    pub prespeechstart_ms: u64,

    /// Loudness above which a tick counts as speech signal
    #[arg(long = "speaking-min-volume", default_value_t = DEFAULT_SPEAKING_MIN_VOLUME)]
    pub speaking_min_volume: f32,

    /// Nominal silence level (informational)
    #[arg(long = "silence-volume", default_value_t = DEFAULT_SILENCE_VOLUME)]
    pub silence_volume: f32,

    /// Loudness below which the microphone is considered muted
    #[arg(long = "mute-volume", default_value_t = DEFAULT_MUTE_VOLUME)]
    pub mute_volume: f32,

    /// Trailing silence that ends a speech segment (milliseconds)
    #[arg(
        long = "max-interspeech-silence-ms",
        default_value_t = DEFAULT_MAX_INTERSPEECH_SILENCE_MS
    )]
    pub max_interspeech_silence_ms: u64,

    /// Shortest speech segment that is accepted (milliseconds)
    #[arg(
        long = "min-signal-duration-ms",
        default_value_t = DEFAULT_MIN_SIGNAL_DURATION_MS
    )]
    pub min_signal_duration_ms: u64,

    /// Lowest average segment loudness that is accepted
    #[arg(
        long = "min-average-signal-volume",
        default_value_t = DEFAULT_MIN_AVERAGE_SIGNAL_VOLUME
    )]
    pub min_average_signal_volume: f32,

    /// Run only the pre-speech heartbeat and skip classification
    #[arg(long = "disable-recording", default_value_t = false)]
    pub disable_recording: bool,

    /// Absolute sample value treated as clipping
    #[arg(long = "clip-level", default_value_t = DEFAULT_CLIP_LEVEL)]
    pub clip_level: f32,

    /// Per-block decay applied to the smoothed loudness
    #[arg(long = "averaging-factor", default_value_t = DEFAULT_AVERAGING_FACTOR)]
    pub averaging_factor: f32,

    /// How long the clip indicator stays lit after the last clipped sample (milliseconds)
    #[arg(long = "clip-lag-ms", default_value_t = DEFAULT_CLIP_LAG_MS)]
    pub clip_lag_ms: u64,

    /// Samples per analysis block
    #[arg(long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: usize,

    /// Capacity of the event channel between the tick loop and the printer
    #[arg(
        long = "event-channel-capacity",
        default_value_t = DEFAULT_EVENT_CHANNEL_CAPACITY
    )]
    pub event_channel_capacity: usize,
}

/// Tunables for the control-rate speech classifier and heartbeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub tick_interval_ms: u64,
    pub prespeechstart_ms: u64,
    pub speaking_min_volume: f32,
    /// Carried for compatibility; silence is "neither mute nor signal".
    pub silence_volume: f32,
    pub mute_volume: f32,
    pub recording_enabled: bool,
    pub max_interspeech_silence_ms: u64,
    pub min_signal_duration_ms: u64,
    pub min_average_signal_volume: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            prespeechstart_ms: DEFAULT_PRESPEECHSTART_MS,
            speaking_min_volume: DEFAULT_SPEAKING_MIN_VOLUME,
            silence_volume: DEFAULT_SILENCE_VOLUME,
            mute_volume: DEFAULT_MUTE_VOLUME,
            recording_enabled: true,
            max_interspeech_silence_ms: DEFAULT_MAX_INTERSPEECH_SILENCE_MS,
            min_signal_duration_ms: DEFAULT_MIN_SIGNAL_DURATION_MS,
            min_average_signal_volume: DEFAULT_MIN_AVERAGE_SIGNAL_VOLUME,
        }
    }
}

impl DetectorConfig {
    /// Number of consecutive silence ticks that resolves an active segment.
    pub fn max_silence_ticks(&self) -> u64 {
        if self.tick_interval_ms == 0 {
            return 0;
        }
        (self.max_interspeech_silence_ms as f64 / self.tick_interval_ms as f64).round() as u64
    }
}

/// Tunables for the audio-rate amplitude estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub clip_level: f32,
    pub averaging_factor: f32,
    pub clip_lag_ms: u64,
    pub block_size: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            clip_level: DEFAULT_CLIP_LEVEL,
            averaging_factor: DEFAULT_AVERAGING_FACTOR,
            clip_lag_ms: DEFAULT_CLIP_LAG_MS,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}
