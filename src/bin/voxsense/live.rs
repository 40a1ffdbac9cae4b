//! Live microphone monitoring.

use crate::cli_utils::write_event;
use anyhow::Result;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use voxsense::audio::{AmplitudeEstimator, LiveMeter, Recorder};
use voxsense::clock::{Clock, SystemClock};
use voxsense::config::AppConfig;
use voxsense::detector::{spawn_tick_loop, ChannelSink, SpeechClassifier};

const CLIP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Logs transitions of the clip indicator.
struct ClipWatcher {
    meter: LiveMeter,
    clipping: bool,
}

impl ClipWatcher {
    fn poll(&mut self) {
        let clipping = self.meter.check_clipping();
        if clipping == self.clipping {
            return;
        }
        self.clipping = clipping;
        if clipping {
            warn!(volume = self.meter.volume(), "input is clipping");
        } else {
            info!("input clipping cleared");
        }
    }
}

pub(crate) fn run_live(config: &AppConfig) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let recorder = Recorder::new(config.input_device.as_deref())?;
    let estimator = AmplitudeEstimator::new(config.estimator_config(), clock.clone())?;
    let meter = estimator.meter();
    let classifier = SpeechClassifier::new(config.detector_config(), meter.clone(), clock)?;

    let stream = recorder.start_metering(estimator)?;
    info!(
        device = %recorder.device_name(),
        sample_rate = stream.sample_rate(),
        channels = stream.channels(),
        max_silence_ticks = classifier.max_silence_ticks(),
        "microphone metering started"
    );
    eprintln!(
        "Listening on {} for {}s...",
        recorder.device_name(),
        config.seconds
    );

    let (event_tx, event_rx) = bounded(config.event_channel_capacity);
    let handle = spawn_tick_loop(classifier, ChannelSink::new(event_tx));
    let mut clip = ClipWatcher {
        meter,
        clipping: false,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let deadline = Instant::now() + Duration::from_secs(config.seconds);
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match event_rx.recv_timeout((deadline - now).min(CLIP_POLL_INTERVAL)) {
            Ok(event) => write_event(&mut out, &event)?,
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        clip.poll();
    }

    let (classifier, sink) = handle.join()?;
    drop(stream);
    let dropped = sink.dropped();
    drop(sink);
    for event in event_rx.try_iter() {
        write_event(&mut out, &event)?;
    }
    out.flush()?;

    if dropped > 0 {
        warn!(dropped, "event channel was full; events were dropped");
    }
    info!(
        speech_active = classifier.state().speech_active,
        "monitoring finished"
    );
    Ok(())
}
