//! Control-rate speech classification state machine.
//!
//! Each tick reads the latest smoothed loudness, classifies it as mute, signal
//! or silence, tracks the current speech segment, and decides on the tick that
//! completes the trailing-silence run whether the segment was speech or noise.

use super::event::{AbortReason, SpeechEvent};
use super::heartbeat::PreSpeechHeartbeat;
use super::sink::EventSink;
use crate::audio::LiveMeter;
use crate::clock::Clock;
use crate::config::{ConfigError, DetectorConfig};
use std::sync::Arc;
use tracing::debug;

/// Last reported microphone-level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MicState {
    Mute,
    #[default]
    Silence,
    Signal,
}

/// Mutable state owned by the tick loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationState {
    pub mic_state: MicState,
    pub speech_active: bool,
    pub consecutive_silence_ticks: u64,
    pub consecutive_signal_ticks: u64,
    /// Start of the current (or most recent) segment.
    pub speech_start_ms: u64,
    pub segment_volumes: Vec<f32>,
    pub pre_speech_tick_count: u64,
}

impl ClassificationState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            mic_state: MicState::default(),
            speech_active: false,
            consecutive_silence_ticks: 0,
            consecutive_signal_ticks: 0,
            speech_start_ms: now_ms,
            segment_volumes: Vec::new(),
            pre_speech_tick_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Mute,
    Signal,
    Silence,
}

fn classify(config: &DetectorConfig, volume: f32) -> Level {
    if volume < config.mute_volume {
        Level::Mute
    } else if volume > config.speaking_min_volume {
        Level::Signal
    } else {
        Level::Silence
    }
}

/// Run one classification step against `state`.
///
/// Level events (`mute`/`signal`/`silence`) are emitted before segment
/// boundary and mic transition events of the same tick.
pub(crate) fn classify_tick(
    state: &mut ClassificationState,
    config: &DetectorConfig,
    max_silence_ticks: u64,
    volume: f32,
    now_ms: u64,
    sink: &mut dyn EventSink,
) {
    let elapsed_ms = now_ms.saturating_sub(state.speech_start_ms);

    match classify(config, volume) {
        Level::Mute => {
            sink.emit(SpeechEvent::Mute {
                volume,
                timestamp_ms: now_ms,
                duration_ms: elapsed_ms,
            });
            if state.mic_state != MicState::Mute {
                state.mic_state = MicState::Mute;
                sink.emit(SpeechEvent::MutedMic {
                    volume,
                    timestamp_ms: now_ms,
                });
            }
        }
        Level::Signal => {
            state.consecutive_silence_ticks = 0;
            state.consecutive_signal_ticks += 1;

            let opened = !state.speech_active;
            if opened {
                state.speech_active = true;
                state.speech_start_ms = now_ms;
                state.segment_volumes.clear();
                debug!(volume, timestamp_ms = now_ms, "speech segment opened");
            }
            state.segment_volumes.push(volume);

            sink.emit(SpeechEvent::Signal {
                volume,
                timestamp_ms: now_ms,
                duration_ms: if opened { 0 } else { elapsed_ms },
                items: state.consecutive_signal_ticks,
            });
            if opened {
                sink.emit(SpeechEvent::SpeechStart {
                    volume,
                    timestamp_ms: now_ms,
                    duration_ms: 0,
                    items: state.consecutive_signal_ticks,
                });
            }
            if state.mic_state == MicState::Mute {
                state.mic_state = MicState::Signal;
                sink.emit(SpeechEvent::UnmutedMic {
                    volume,
                    timestamp_ms: now_ms,
                });
            }
        }
        Level::Silence => {
            state.consecutive_signal_ticks = 0;
            state.consecutive_silence_ticks += 1;

            sink.emit(SpeechEvent::Silence {
                volume,
                timestamp_ms: now_ms,
                duration_ms: elapsed_ms,
                items: state.consecutive_silence_ticks,
            });
            if state.mic_state == MicState::Mute {
                state.mic_state = MicState::Silence;
                sink.emit(SpeechEvent::UnmutedMic {
                    volume,
                    timestamp_ms: now_ms,
                });
            }

            if state.speech_active && state.consecutive_silence_ticks == max_silence_ticks {
                state.speech_active = false;
                let event = resolve_segment(state, config, volume, now_ms, elapsed_ms);
                debug!(outcome = event.name(), duration_ms = elapsed_ms, "speech segment resolved");
                sink.emit(event);
            }
        }
    }
}

fn resolve_segment(
    state: &ClassificationState,
    config: &DetectorConfig,
    volume: f32,
    now_ms: u64,
    elapsed_ms: u64,
) -> SpeechEvent {
    let items = state.consecutive_silence_ticks;
    let signal_duration_ms = elapsed_ms as i64 - config.max_interspeech_silence_ms as i64;
    let average_volume = average(&state.segment_volumes);

    let abort = if signal_duration_ms < config.min_signal_duration_ms as i64 {
        Some(AbortReason::SignalTooShort {
            signal_duration_ms,
            min_signal_duration_ms: config.min_signal_duration_ms,
        })
    } else if average_volume < config.min_average_signal_volume {
        Some(AbortReason::VolumeTooLow {
            average_volume,
            min_average_signal_volume: config.min_average_signal_volume,
        })
    } else {
        None
    };

    match abort {
        Some(abort) => SpeechEvent::SpeechAbort {
            volume,
            timestamp_ms: now_ms,
            duration_ms: elapsed_ms,
            items,
            abort,
        },
        None => SpeechEvent::SpeechStop {
            volume,
            timestamp_ms: now_ms,
            duration_ms: elapsed_ms,
            items,
        },
    }
}

fn average(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Polls a `LiveMeter` once per tick and reports speech activity.
pub struct SpeechClassifier {
    config: DetectorConfig,
    max_silence_ticks: u64,
    meter: LiveMeter,
    clock: Arc<dyn Clock>,
    state: ClassificationState,
    heartbeat: PreSpeechHeartbeat,
}

impl SpeechClassifier {
    pub fn new(
        config: DetectorConfig,
        meter: LiveMeter,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_silence_ticks = config.max_silence_ticks();
        let heartbeat = PreSpeechHeartbeat::new(config.tick_interval_ms, config.prespeechstart_ms);
        let state = ClassificationState::new(clock.now_ms());
        Ok(Self {
            config,
            max_silence_ticks,
            meter,
            clock,
            state,
            heartbeat,
        })
    }

    /// Run one tick: classification (when recording is enabled), then the heartbeat.
    pub fn tick(&mut self, sink: &mut dyn EventSink) {
        let volume = self.meter.volume();
        let now_ms = self.clock.now_ms();
        if self.config.recording_enabled {
            classify_tick(
                &mut self.state,
                &self.config,
                self.max_silence_ticks,
                volume,
                now_ms,
                sink,
            );
        }
        self.heartbeat.on_tick(&mut self.state, volume, now_ms, sink);
    }

    pub fn state(&self) -> &ClassificationState {
        &self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn max_silence_ticks(&self) -> u64 {
        self.max_silence_ticks
    }

    pub fn meter(&self) -> &LiveMeter {
        &self.meter
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.config.tick_interval_ms
    }
}
