//! Attack-fast/release-slow loudness estimation with a decaying clip indicator.
//!
//! `AmplitudeEstimator` runs on the audio thread and publishes its state into a
//! `LiveMeter`, which the control-rate classifier reads without locking.

use crate::clock::Clock;
use crate::config::{ConfigError, EstimatorConfig};
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

const SILENT_FLOOR_DB: f32 = -100.0;
const NEVER_CLIPPED: u64 = u64::MAX;

struct MeterCell {
    volume_bits: AtomicU32,
    last_clip_ms: AtomicU64,
    clip_lag_ms: u64,
    clock: Arc<dyn Clock>,
}

/// Read side of the loudness state, cheap to clone across threads.
#[derive(Clone)]
pub struct LiveMeter {
    cell: Arc<MeterCell>,
}

impl LiveMeter {
    pub fn new(clip_lag_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            cell: Arc::new(MeterCell {
                volume_bits: AtomicU32::new(0.0f32.to_bits()),
                last_clip_ms: AtomicU64::new(NEVER_CLIPPED),
                clip_lag_ms,
                clock,
            }),
        }
    }

    /// Latest smoothed loudness published by the estimator.
    pub fn volume(&self) -> f32 {
        f32::from_bits(self.cell.volume_bits.load(Ordering::Acquire))
    }

    /// Publish a loudness value. Negative and non-finite inputs are stored as 0.
    pub(crate) fn set_volume(&self, volume: f32) {
        let volume = if volume.is_finite() { volume.max(0.0) } else { 0.0 };
        self.cell
            .volume_bits
            .store(volume.to_bits(), Ordering::Release);
    }

    pub fn volume_db(&self) -> f32 {
        volume_to_db(self.volume())
    }

    /// Report whether a clipped sample was seen within the last `clip_lag_ms`.
    ///
    /// The indicator is derived from the last clip time alone, so the reader
    /// never writes and a clip recorded concurrently is never lost.
    pub fn check_clipping(&self) -> bool {
        let cell = &self.cell;
        let last = cell.last_clip_ms.load(Ordering::Acquire);
        last != NEVER_CLIPPED && cell.clock.now_ms() <= last.saturating_add(cell.clip_lag_ms)
    }

    fn mark_clip(&self, now_ms: u64) {
        self.cell.last_clip_ms.store(now_ms, Ordering::Release);
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.cell.clock.now_ms()
    }
}

impl fmt::Debug for LiveMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveMeter")
            .field("volume", &self.volume())
            .field("clipping", &self.check_clipping())
            .field("clip_lag_ms", &self.cell.clip_lag_ms)
            .finish()
    }
}

/// Turns fixed-size sample blocks into a smoothed loudness value.
///
/// `smoothed = max(rms, smoothed * averaging_factor)`: any louder block is
/// adopted immediately, quieter blocks only pull the value down by the decay
/// factor. `process_block` never allocates and never blocks.
pub struct AmplitudeEstimator {
    config: EstimatorConfig,
    smoothed: f32,
    meter: LiveMeter,
}

impl AmplitudeEstimator {
    pub fn new(config: EstimatorConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let meter = LiveMeter::new(config.clip_lag_ms, clock);
        Ok(Self {
            config,
            smoothed: 0.0,
            meter,
        })
    }

    pub fn process_block(&mut self, samples: &[f32]) {
        let mut sum_squares = 0.0f32;
        let mut clipped = false;
        for &x in samples {
            if x.abs() >= self.config.clip_level {
                clipped = true;
            }
            sum_squares += x * x;
        }
        if clipped {
            self.meter.mark_clip(self.meter.now_ms());
        }

        let rms = block_rms(sum_squares, samples.len());
        self.smoothed = rms.max(self.smoothed * self.config.averaging_factor);
        self.meter.set_volume(self.smoothed);
    }

    pub fn smoothed_volume(&self) -> f32 {
        self.smoothed
    }

    pub fn check_clipping(&self) -> bool {
        self.meter.check_clipping()
    }

    /// A reader handle for the control-rate side.
    pub fn meter(&self) -> LiveMeter {
        self.meter.clone()
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }
}

fn block_rms(sum_squares: f32, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    let rms = (sum_squares / len as f32).sqrt();
    if rms.is_finite() {
        rms
    } else {
        0.0
    }
}

/// Plain RMS over a buffer, 0 for an empty one.
pub fn rms(samples: &[f32]) -> f32 {
    block_rms(samples.iter().map(|s| s * s).sum(), samples.len())
}

pub fn volume_to_db(volume: f32) -> f32 {
    if volume <= 0.0 {
        return SILENT_FLOOR_DB;
    }
    (20.0 * volume.log10()).max(SILENT_FLOOR_DB)
}

pub fn db_to_volume(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}
