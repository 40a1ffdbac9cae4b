use super::{
    AppConfig, ConfigError, DetectorConfig, EstimatorConfig, DEFAULT_TICK_INTERVAL_MS,
    MAX_DETECTOR_DURATION_MS,
};
use clap::Parser;

#[test]
fn defaults_validate() {
    assert!(DetectorConfig::default().validate().is_ok());
    assert!(EstimatorConfig::default().validate().is_ok());
    let cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn max_silence_ticks_rounds_to_nearest() {
    let mut cfg = DetectorConfig {
        tick_interval_ms: 100,
        max_interspeech_silence_ms: 1000,
        ..DetectorConfig::default()
    };
    assert_eq!(cfg.max_silence_ticks(), 10);

    cfg.max_interspeech_silence_ms = 1049;
    assert_eq!(cfg.max_silence_ticks(), 10);

    cfg.max_interspeech_silence_ms = 1050;
    assert_eq!(cfg.max_silence_ticks(), 11);
}

#[test]
fn rejects_silence_window_that_rounds_to_zero_ticks() {
    let cfg = DetectorConfig {
        tick_interval_ms: 100,
        max_interspeech_silence_ms: 40,
        ..DetectorConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::ZeroSilenceTicks {
            max_interspeech_silence_ms: 40,
            tick_interval_ms: 100,
        })
    );
}

#[test]
fn accepts_silence_window_that_rounds_up_to_one_tick() {
    let cfg = DetectorConfig {
        tick_interval_ms: 100,
        max_interspeech_silence_ms: 50,
        ..DetectorConfig::default()
    };
    assert_eq!(cfg.max_silence_ticks(), 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_zero_tick_interval() {
    let cfg = DetectorConfig {
        tick_interval_ms: 0,
        ..DetectorConfig::default()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroTickInterval));
}

#[test]
fn rejects_durations_beyond_signed_range() {
    let cfg = DetectorConfig {
        max_interspeech_silence_ms: u64::MAX,
        ..DetectorConfig::default()
    };
    assert_eq!(
        cfg.validate(),
        Err(ConfigError::DurationTooLong {
            name: "max_interspeech_silence_ms",
            value_ms: u64::MAX,
            max_ms: MAX_DETECTOR_DURATION_MS,
        })
    );

    let cfg = DetectorConfig {
        min_signal_duration_ms: MAX_DETECTOR_DURATION_MS + 1,
        ..DetectorConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::DurationTooLong {
            name: "min_signal_duration_ms",
            ..
        })
    ));

    let cfg = DetectorConfig {
        max_interspeech_silence_ms: MAX_DETECTOR_DURATION_MS,
        min_signal_duration_ms: MAX_DETECTOR_DURATION_MS,
        ..DetectorConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn cli_rejects_huge_silence_window() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--max-interspeech-silence-ms",
        "18446744073709551615",
    ]);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("max_interspeech_silence_ms"));
}

#[test]
fn rejects_non_monotonic_thresholds() {
    let cfg = DetectorConfig {
        mute_volume: 0.3,
        speaking_min_volume: 0.3,
        ..DetectorConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::ThresholdOrder { .. })
    ));
}

#[test]
fn rejects_nan_volume() {
    let cfg = DetectorConfig {
        min_average_signal_volume: f32::NAN,
        ..DetectorConfig::default()
    };
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidVolume {
            name: "min_average_signal_volume",
            ..
        })
    ));
}

#[test]
fn heartbeat_window_off_the_tick_grid_is_only_a_warning() {
    let cfg = DetectorConfig {
        tick_interval_ms: 100,
        prespeechstart_ms: 650,
        ..DetectorConfig::default()
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn estimator_rejects_bad_values() {
    let base = EstimatorConfig::default();
    let cfg = EstimatorConfig {
        block_size: 0,
        ..base.clone()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ZeroBlockSize));

    let cfg = EstimatorConfig {
        averaging_factor: 1.0,
        ..base.clone()
    };
    assert_eq!(cfg.validate(), Err(ConfigError::AveragingFactor(1.0)));

    let cfg = EstimatorConfig {
        clip_level: 0.0,
        ..base
    };
    assert_eq!(cfg.validate(), Err(ConfigError::ClipLevel(0.0)));
}

#[test]
fn cli_flags_flow_into_detector_config() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--tick-interval-ms",
        "50",
        "--mute-volume",
        "0.01",
        "--speaking-min-volume",
        "0.3",
        "--disable-recording",
    ]);
    let detector = cfg.detector_config();
    assert_eq!(detector.tick_interval_ms, 50);
    assert_eq!(detector.mute_volume, 0.01);
    assert_eq!(detector.speaking_min_volume, 0.3);
    assert!(!detector.recording_enabled);
}

#[test]
fn cli_rejects_inverted_thresholds() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--mute-volume",
        "0.5",
        "--speaking-min-volume",
        "0.1",
    ]);
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("mute volume"));
}

#[test]
fn rejects_seconds_out_of_bounds() {
    let cfg = AppConfig::parse_from(["test-app", "--seconds", "0"]);
    assert!(cfg.validate().is_err());

    let cfg = AppConfig::parse_from(["test-app", "--seconds", "3601"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_calibration_windows_out_of_bounds() {
    let cfg = AppConfig::parse_from(["test-app", "--calibrate-ambient-ms", "10"]);
    assert!(cfg.validate().is_err());

    let cfg = AppConfig::parse_from(["test-app", "--calibrate-speech-ms", "60000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_missing_wav_file() {
    let cfg = AppConfig::parse_from(["test-app", "--wav", "/definitely/not/here.wav"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn detector_config_deserializes_with_defaults() {
    let cfg: DetectorConfig =
        serde_json::from_str(r#"{"tick_interval_ms": 20, "max_interspeech_silence_ms": 400}"#)
            .expect("parse detector config");
    assert_eq!(cfg.tick_interval_ms, 20);
    assert_eq!(cfg.max_silence_ticks(), 20);
    assert_eq!(
        cfg.speaking_min_volume,
        DetectorConfig::default().speaking_min_volume
    );
    assert_ne!(cfg.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
}
