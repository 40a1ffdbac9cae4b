//! `--calibrate`: measure the room, then the speaker, and suggest thresholds.

use anyhow::Result;
use std::io::{self, Write};
use std::time::Duration;
use voxsense::audio::{recommend_thresholds, rms, volume_to_db, Recorder};
use voxsense::config::AppConfig;

fn measure(recorder: &Recorder, duration_ms: u64) -> Result<f32> {
    let samples = recorder.record_for(Duration::from_millis(duration_ms))?;
    Ok(rms(&samples))
}

pub(crate) fn run_calibration(config: &AppConfig) -> Result<()> {
    let recorder = Recorder::new(config.input_device.as_deref())?;
    println!("Calibrating with input device: {}", recorder.device_name());

    println!(
        "Sampling ambient noise for {:.1}s... stay quiet.",
        config.calibrate_ambient_ms as f32 / 1000.0
    );
    io::stdout().flush().ok();
    let ambient = measure(&recorder, config.calibrate_ambient_ms)?;

    println!(
        "Sampling speech for {:.1}s... speak normally.",
        config.calibrate_speech_ms as f32 / 1000.0
    );
    io::stdout().flush().ok();
    let speech = measure(&recorder, config.calibrate_speech_ms)?;

    println!("\nResults (dBFS)");
    println!("Ambient: RMS {:.1} dB ({ambient:.5})", volume_to_db(ambient));
    println!("Speech:  RMS {:.1} dB ({speech:.5})", volume_to_db(speech));

    let suggestion = recommend_thresholds(ambient, speech);
    println!("\nSuggested thresholds:");
    println!("  --mute-volume {:.5}", suggestion.mute_volume);
    println!("  --speaking-min-volume {:.5}", suggestion.speaking_min_volume);
    println!(
        "  --min-average-signal-volume {:.5}",
        suggestion.min_average_signal_volume
    );
    if let Some(message) = suggestion.warning {
        println!("Note: {message}");
    }
    Ok(())
}
