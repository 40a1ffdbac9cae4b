//! Fixed-delay tick loop for the classifier.
//!
//! Ticks run one after another on a dedicated thread. Stopping is cooperative:
//! `request_stop` prevents the next tick from being scheduled but never
//! interrupts a tick that is already running, so events may still arrive
//! after the request.

use super::classifier::SpeechClassifier;
use super::sink::EventSink;
use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Handle to a running tick loop. Dropping it stops the loop after the
/// current tick.
pub struct DetectorHandle<S> {
    stop_flag: Arc<AtomicBool>,
    wake: Sender<()>,
    handle: Option<thread::JoinHandle<(SpeechClassifier, S)>>,
}

impl<S> DetectorHandle<S> {
    /// Ask the loop not to schedule another tick.
    pub fn request_stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        let _ = self.wake.try_send(());
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }

    /// Stop the loop, wait for any in-flight tick, and hand back its parts.
    pub fn join(mut self) -> Result<(SpeechClassifier, S)> {
        self.request_stop();
        let handle = self
            .handle
            .take()
            .ok_or_else(|| anyhow!("tick loop already joined"))?;
        handle
            .join()
            .map_err(|_| anyhow!("tick loop thread panicked"))
    }
}

impl<S> Drop for DetectorHandle<S> {
    fn drop(&mut self) {
        self.request_stop();
    }
}

/// Start ticking `classifier` every `tick_interval_ms`, delivering events to `sink`.
///
/// The first tick runs one interval after the call.
pub fn spawn_tick_loop<S>(classifier: SpeechClassifier, sink: S) -> DetectorHandle<S>
where
    S: EventSink + Send + 'static,
{
    let stop_flag = Arc::new(AtomicBool::new(false));
    let (wake_tx, wake_rx) = bounded::<()>(1);
    let flag = stop_flag.clone();

    let handle = thread::spawn(move || run_tick_loop(classifier, sink, flag, wake_rx));

    DetectorHandle {
        stop_flag,
        wake: wake_tx,
        handle: Some(handle),
    }
}

fn run_tick_loop<S: EventSink>(
    mut classifier: SpeechClassifier,
    mut sink: S,
    stop_flag: Arc<AtomicBool>,
    wake: Receiver<()>,
) -> (SpeechClassifier, S) {
    let interval = Duration::from_millis(classifier.tick_interval_ms());
    let mut ticks = 0u64;
    loop {
        match wake.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if stop_flag.load(Ordering::Acquire) {
            break;
        }
        classifier.tick(&mut sink);
        ticks += 1;
        if stop_flag.load(Ordering::Acquire) {
            break;
        }
    }
    debug!(ticks, "tick loop stopped");
    (classifier, sink)
}
