use super::classifier::SpeechClassifier;
use super::event::SpeechEvent;
use crate::audio::AmplitudeEstimator;
use crate::clock::{Clock, ManualClock};
use crate::config::{ConfigError, DetectorConfig, EstimatorConfig};
use std::sync::Arc;

/// Run the estimator and classifier against buffered mono PCM.
///
/// Time is derived from the sample position: blocks are fed at their start
/// time and every tick boundary that has been reached runs before the next
/// block, so the classifier sees exactly what a live run would have seen.
/// A trailing partial block is never processed, as in the live dispatcher,
/// but ticks still run until the end of the buffer.
pub fn offline_detect_from_pcm(
    samples: &[f32],
    sample_rate: u32,
    detector: DetectorConfig,
    estimator: EstimatorConfig,
) -> Result<Vec<SpeechEvent>, ConfigError> {
    let clock = ManualClock::new(0);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let mut estimator = AmplitudeEstimator::new(estimator, shared.clone())?;
    let mut classifier = SpeechClassifier::new(detector, estimator.meter(), shared)?;

    let rate = u64::from(sample_rate.max(1));
    let tick_ms = classifier.tick_interval_ms();
    let block_size = estimator.block_size();
    let mut next_tick_ms = tick_ms;
    let mut events: Vec<SpeechEvent> = Vec::new();

    let mut position = 0u64;
    for block in samples.chunks_exact(block_size) {
        let block_start_ms = position * 1000 / rate;
        while next_tick_ms <= block_start_ms {
            clock.set_ms(next_tick_ms);
            classifier.tick(&mut events);
            next_tick_ms += tick_ms;
        }
        clock.set_ms(block_start_ms);
        estimator.process_block(block);
        position += block.len() as u64;
    }

    let end_ms = samples.len() as u64 * 1000 / rate;
    while next_tick_ms <= end_ms {
        clock.set_ms(next_tick_ms);
        classifier.tick(&mut events);
        next_tick_ms += tick_ms;
    }

    Ok(events)
}
