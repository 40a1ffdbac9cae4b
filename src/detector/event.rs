use serde::{Serialize, Serializer};
use std::fmt;

/// Everything the detector reports, one variant per event kind.
///
/// Serialized as a JSON object tagged by `"event"` with the lowercase kind name
/// (`"speechstart"`, `"mutedmic"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SpeechEvent {
    /// Loudness below the mute threshold on this tick.
    Mute {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
    },
    /// Microphone went quiet enough to be considered closed.
    MutedMic { volume: f32, timestamp_ms: u64 },
    /// Microphone came back from mute.
    UnmutedMic { volume: f32, timestamp_ms: u64 },
    /// Loudness above the speaking threshold on this tick.
    Signal {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
        items: u64,
    },
    /// Loudness in the hysteresis band on this tick.
    Silence {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
        items: u64,
    },
    SpeechStart {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
        items: u64,
    },
    /// A segment was accepted as speech.
    SpeechStop {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
        items: u64,
    },
    /// A segment was discarded as noise.
    SpeechAbort {
        volume: f32,
        timestamp_ms: u64,
        duration_ms: u64,
        items: u64,
        abort: AbortReason,
    },
    PreSpeechStart {
        volume: f32,
        timestamp_ms: u64,
        items: u64,
    },
}

impl SpeechEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SpeechEvent::Mute { .. } => "mute",
            SpeechEvent::MutedMic { .. } => "mutedmic",
            SpeechEvent::UnmutedMic { .. } => "unmutedmic",
            SpeechEvent::Signal { .. } => "signal",
            SpeechEvent::Silence { .. } => "silence",
            SpeechEvent::SpeechStart { .. } => "speechstart",
            SpeechEvent::SpeechStop { .. } => "speechstop",
            SpeechEvent::SpeechAbort { .. } => "speechabort",
            SpeechEvent::PreSpeechStart { .. } => "prespeechstart",
        }
    }

    pub fn volume(&self) -> f32 {
        match *self {
            SpeechEvent::Mute { volume, .. }
            | SpeechEvent::MutedMic { volume, .. }
            | SpeechEvent::UnmutedMic { volume, .. }
            | SpeechEvent::Signal { volume, .. }
            | SpeechEvent::Silence { volume, .. }
            | SpeechEvent::SpeechStart { volume, .. }
            | SpeechEvent::SpeechStop { volume, .. }
            | SpeechEvent::SpeechAbort { volume, .. }
            | SpeechEvent::PreSpeechStart { volume, .. } => volume,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match *self {
            SpeechEvent::Mute { timestamp_ms, .. }
            | SpeechEvent::MutedMic { timestamp_ms, .. }
            | SpeechEvent::UnmutedMic { timestamp_ms, .. }
            | SpeechEvent::Signal { timestamp_ms, .. }
            | SpeechEvent::Silence { timestamp_ms, .. }
            | SpeechEvent::SpeechStart { timestamp_ms, .. }
            | SpeechEvent::SpeechStop { timestamp_ms, .. }
            | SpeechEvent::SpeechAbort { timestamp_ms, .. }
            | SpeechEvent::PreSpeechStart { timestamp_ms, .. } => timestamp_ms,
        }
    }

    /// True for the per-tick level classifications (`mute`, `signal`, `silence`).
    pub fn is_level(&self) -> bool {
        matches!(
            self,
            SpeechEvent::Mute { .. } | SpeechEvent::Signal { .. } | SpeechEvent::Silence { .. }
        )
    }

    /// True for segment boundary events.
    pub fn is_segment_boundary(&self) -> bool {
        matches!(
            self,
            SpeechEvent::SpeechStart { .. }
                | SpeechEvent::SpeechStop { .. }
                | SpeechEvent::SpeechAbort { .. }
        )
    }
}

/// Why a finished segment was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    SignalTooShort {
        signal_duration_ms: i64,
        min_signal_duration_ms: u64,
    },
    VolumeTooLow {
        average_volume: f32,
        min_average_signal_volume: f32,
    },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::SignalTooShort {
                signal_duration_ms,
                min_signal_duration_ms,
            } => write!(
                f,
                "signal duration ({signal_duration_ms}) < MIN ({min_signal_duration_ms})"
            ),
            AbortReason::VolumeTooLow {
                average_volume,
                min_average_signal_volume,
            } => write!(
                f,
                "signal average volume ({average_volume}) < MIN ({min_average_signal_volume})"
            ),
        }
    }
}

impl Serialize for AbortReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_lowercase_tag() {
        let event = SpeechEvent::MutedMic {
            volume: 0.0,
            timestamp_ms: 42,
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(json["event"], "mutedmic");
        assert_eq!(json["timestamp_ms"], 42);
        assert_eq!(event.name(), "mutedmic");
    }

    #[test]
    fn abort_reason_serializes_as_message() {
        let event = SpeechEvent::SpeechAbort {
            volume: 0.02,
            timestamp_ms: 1200,
            duration_ms: 1100,
            items: 10,
            abort: AbortReason::SignalTooShort {
                signal_duration_ms: 100,
                min_signal_duration_ms: 300,
            },
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        assert_eq!(json["event"], "speechabort");
        assert_eq!(json["abort"], "signal duration (100) < MIN (300)");
    }

    #[test]
    fn volume_abort_message() {
        let reason = AbortReason::VolumeTooLow {
            average_volume: 0.25,
            min_average_signal_volume: 0.5,
        };
        assert_eq!(
            reason.to_string(),
            "signal average volume (0.25) < MIN (0.5)"
        );
    }

    #[test]
    fn silence_payload_has_no_abort_field() {
        let event = SpeechEvent::Silence {
            volume: 0.01,
            timestamp_ms: 5,
            duration_ms: 0,
            items: 1,
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        assert!(json.get("abort").is_none());
        assert!(event.is_level());
        assert!(!event.is_segment_boundary());
    }
}
