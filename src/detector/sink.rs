//! Destinations for detector events.
//!
//! Delivery is synchronous and fire-and-forget: a sink never pushes back on
//! the tick that produced the event.

use super::event::SpeechEvent;
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait EventSink {
    fn emit(&mut self, event: SpeechEvent);
}

impl EventSink for Vec<SpeechEvent> {
    fn emit(&mut self, event: SpeechEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: SpeechEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: SpeechEvent) {
        (**self).emit(event);
    }
}

type Listener = Box<dyn FnMut(&SpeechEvent) + Send>;

/// Fan-out to registered callbacks, invoked in registration order.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SpeechEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl EventSink for Listeners {
    fn emit(&mut self, event: SpeechEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

/// Forwards events over a bounded channel, dropping (and counting) them when
/// the consumer falls behind.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<SpeechEvent>,
    dropped: Arc<AtomicUsize>,
}

impl ChannelSink {
    pub fn new(sender: Sender<SpeechEvent>) -> Self {
        Self {
            sender,
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: SpeechEvent) {
        match self.sender.try_send(event) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Mutex;

    fn sample_event(ts: u64) -> SpeechEvent {
        SpeechEvent::MutedMic {
            volume: 0.0,
            timestamp_ms: ts,
        }
    }

    #[test]
    fn listeners_see_every_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::new();
        for id in 0..2 {
            let seen = seen.clone();
            listeners.subscribe(move |event| {
                seen.lock().unwrap().push((id, event.timestamp_ms()));
            });
        }
        assert_eq!(listeners.len(), 2);

        listeners.emit(sample_event(1));
        listeners.emit(sample_event(2));
        assert_eq!(*seen.lock().unwrap(), vec![(0, 1), (1, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn empty_listeners_accept_events() {
        let mut listeners = Listeners::new();
        assert!(listeners.is_empty());
        listeners.emit(sample_event(1));
    }

    #[test]
    fn channel_sink_counts_drops_when_full() {
        let (tx, rx) = bounded(1);
        let mut sink = ChannelSink::new(tx);
        sink.emit(sample_event(1));
        sink.emit(sample_event(2));
        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().timestamp_ms(), 1);
    }

    #[test]
    fn channel_sink_ignores_disconnected_receiver() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.emit(sample_event(1));
        assert_eq!(sink.dropped(), 0);
    }
}
