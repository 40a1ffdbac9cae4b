use thiserror::Error;

/// Reasons a detector or estimator configuration is rejected at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,

    #[error(
        "max interspeech silence ({max_interspeech_silence_ms} ms) rounds to zero ticks at a {tick_interval_ms} ms tick interval"
    )]
    ZeroSilenceTicks {
        max_interspeech_silence_ms: u64,
        tick_interval_ms: u64,
    },

    #[error("{name} ({value_ms} ms) exceeds the maximum of {max_ms} ms")]
    DurationTooLong {
        name: &'static str,
        value_ms: u64,
        max_ms: u64,
    },

    #[error("mute volume ({mute_volume}) must be below speaking min volume ({speaking_min_volume})")]
    ThresholdOrder {
        mute_volume: f32,
        speaking_min_volume: f32,
    },

    #[error("{name} must be a finite, non-negative volume, got {value}")]
    InvalidVolume { name: &'static str, value: f32 },

    #[error("averaging factor must be in [0, 1), got {0}")]
    AveragingFactor(f32),

    #[error("clip level must be in (0, 1], got {0}")]
    ClipLevel(f32),

    #[error("block size must be at least one sample")]
    ZeroBlockSize,
}
