pub mod audio;
pub mod clock;
pub mod config;
pub mod detector;
mod telemetry;

pub use detector::{SpeechClassifier, SpeechEvent};
pub use telemetry::{init_tracing, tracing_log_path};
