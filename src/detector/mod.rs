//! Control-rate side of the detector: classification, heartbeat, and event delivery.

mod classifier;
mod event;
mod heartbeat;
mod offline;
mod scheduler;
mod sink;

pub use classifier::{ClassificationState, MicState, SpeechClassifier};
pub use event::{AbortReason, SpeechEvent};
pub use heartbeat::PreSpeechHeartbeat;
pub use offline::offline_detect_from_pcm;
pub use scheduler::{spawn_tick_loop, DetectorHandle};
pub use sink::{ChannelSink, EventSink, Listeners};
