//! VoxSense entrypoint: watches a microphone (or replays a WAV file) and prints
//! speech activity events as JSON lines on stdout.
//!
//! # Threads
//!
//! - Audio callback: cuts input into blocks and updates the shared meter
//! - Tick loop: classifies the meter every tick and pushes events into a channel
//! - Main thread: prints events and watches the clip indicator until the run ends

mod calibrate;
mod cli_utils;
mod live;
#[cfg(feature = "wav-input")]
mod wav;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use voxsense::config::AppConfig;
use voxsense::{init_tracing, tracing_log_path};

use crate::cli_utils::list_input_devices;

fn main() -> Result<()> {
    let config = AppConfig::parse();
    if config.list_input_devices {
        list_input_devices()?;
        return Ok(());
    }

    config.validate()?;
    init_tracing(&config);
    info!(log_path = %tracing_log_path().display(), "voxsense started");

    if config.calibrate {
        return calibrate::run_calibration(&config);
    }
    if let Some(path) = config.wav.as_deref() {
        return replay_wav(&config, path);
    }
    live::run_live(&config)
}

#[cfg(feature = "wav-input")]
fn replay_wav(config: &AppConfig, path: &std::path::Path) -> Result<()> {
    wav::run_wav(config, path)
}

#[cfg(not(feature = "wav-input"))]
fn replay_wav(_config: &AppConfig, path: &std::path::Path) -> Result<()> {
    anyhow::bail!(
        "cannot replay '{}': voxsense was built without the wav-input feature",
        path.display()
    )
}
