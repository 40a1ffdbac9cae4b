//! Default tuning values shared by the library configs and the CLI parser.

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
pub const DEFAULT_PRESPEECHSTART_MS: u64 = 600;
pub const DEFAULT_SPEAKING_MIN_VOLUME: f32 = 0.05;
pub const DEFAULT_SILENCE_VOLUME: f32 = 0.01;
pub const DEFAULT_MUTE_VOLUME: f32 = 0.0001;
pub const DEFAULT_MAX_INTERSPEECH_SILENCE_MS: u64 = 1000;
pub const DEFAULT_MIN_SIGNAL_DURATION_MS: u64 = 300;
pub const DEFAULT_MIN_AVERAGE_SIGNAL_VOLUME: f32 = 0.07;
/// Upper bound for every detector duration setting (one day).
pub const MAX_DETECTOR_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

pub const DEFAULT_CLIP_LEVEL: f32 = 0.98;
pub const DEFAULT_AVERAGING_FACTOR: f32 = 0.95;
pub const DEFAULT_CLIP_LAG_MS: u64 = 750;
pub const DEFAULT_BLOCK_SIZE: usize = 512;

pub const DEFAULT_RUN_SECONDS: u64 = 30;
pub const MAX_RUN_SECONDS: u64 = 3600;
pub const DEFAULT_CALIBRATE_AMBIENT_MS: u64 = 3000;
pub const DEFAULT_CALIBRATE_SPEECH_MS: u64 = 3000;
pub const MIN_CALIBRATE_SAMPLE_MS: u64 = 500;
pub const MAX_CALIBRATE_SAMPLE_MS: u64 = 30_000;
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
