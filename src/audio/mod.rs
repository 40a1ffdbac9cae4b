//! Audio-rate side of the detector: block ingestion and loudness estimation.
//!
//! Samples arrive from CPAL on the host's callback thread, are downmixed to
//! mono, cut into fixed-size blocks, and folded into a smoothed loudness value
//! that the control-rate classifier reads through a `LiveMeter`.

mod calibrate;
mod dispatch;
mod meter;
mod recorder;

pub use calibrate::{recommend_thresholds, ThresholdRecommendation};
pub use dispatch::{downmix_to_mono, BlockDispatcher};
pub use meter::{db_to_volume, rms, volume_to_db, AmplitudeEstimator, LiveMeter};
pub use recorder::{MicStream, Recorder};
