use super::classifier::ClassificationState;
use super::event::SpeechEvent;
use super::sink::EventSink;

/// Periodic "about to possibly record" signal, independent of classification.
///
/// The counter advances on every tick; once it covers `window_ms` it resets,
/// and `prespeechstart` is emitted only if no segment is active at that moment.
/// A window that is not a multiple of the tick fires on the first tick past it.
#[derive(Debug, Clone, Copy)]
pub struct PreSpeechHeartbeat {
    tick_interval_ms: u64,
    window_ms: u64,
}

impl PreSpeechHeartbeat {
    pub fn new(tick_interval_ms: u64, window_ms: u64) -> Self {
        Self {
            tick_interval_ms,
            window_ms,
        }
    }

    pub(crate) fn on_tick(
        &self,
        state: &mut ClassificationState,
        volume: f32,
        now_ms: u64,
        sink: &mut dyn EventSink,
    ) {
        state.pre_speech_tick_count += 1;
        if state.pre_speech_tick_count.saturating_mul(self.tick_interval_ms) < self.window_ms {
            return;
        }
        if !state.speech_active {
            sink.emit(SpeechEvent::PreSpeechStart {
                volume,
                timestamp_ms: now_ms,
                items: state.pre_speech_tick_count,
            });
        }
        state.pre_speech_tick_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(heartbeat: PreSpeechHeartbeat, state: &mut ClassificationState, ticks: u64) -> Vec<SpeechEvent> {
        let mut events: Vec<SpeechEvent> = Vec::new();
        for tick in 1..=ticks {
            heartbeat.on_tick(state, 0.0, tick * 100, &mut events);
        }
        events
    }

    #[test]
    fn fires_once_per_window() {
        let mut state = ClassificationState::new(0);
        let events = run(PreSpeechHeartbeat::new(100, 600), &mut state, 18);
        let stamps: Vec<u64> = events.iter().map(SpeechEvent::timestamp_ms).collect();
        assert_eq!(stamps, vec![600, 1200, 1800]);
        assert!(events
            .iter()
            .all(|e| matches!(e, SpeechEvent::PreSpeechStart { items: 6, .. })));
    }

    #[test]
    fn suppressed_while_speech_active_but_counter_still_resets() {
        let mut state = ClassificationState::new(0);
        state.speech_active = true;
        let events = run(PreSpeechHeartbeat::new(100, 300), &mut state, 7);
        assert!(events.is_empty());
        assert_eq!(state.pre_speech_tick_count, 1);
    }

    #[test]
    fn non_multiple_window_rounds_up_to_next_tick() {
        let mut state = ClassificationState::new(0);
        let events = run(PreSpeechHeartbeat::new(100, 250), &mut state, 6);
        let stamps: Vec<u64> = events.iter().map(SpeechEvent::timestamp_ms).collect();
        assert_eq!(stamps, vec![300, 600]);
    }
}
