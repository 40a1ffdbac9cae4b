use anyhow::Result;
use std::io::Write;
use voxsense::audio;
use voxsense::SpeechEvent;

pub(crate) fn list_input_devices() -> Result<()> {
    // VOXSENSE_TEST_DEVICES stands in for real hardware in tests.
    let devices = if let Ok(raw) = std::env::var("VOXSENSE_TEST_DEVICES") {
        raw.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    } else {
        audio::Recorder::list_devices().unwrap_or_else(|err| {
            eprintln!("Failed to list audio input devices: {err}");
            Vec::new()
        })
    };

    if devices.is_empty() {
        println!("No audio input devices detected.");
    } else {
        println!("Available audio input devices:");
        for name in devices {
            println!("  - {name}");
        }
    }
    Ok(())
}

/// Write one event as a single JSON line.
pub(crate) fn write_event<W: Write>(out: &mut W, event: &SpeechEvent) -> Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxsense::detector::AbortReason;

    #[test]
    fn write_event_emits_one_tagged_line() {
        let mut out = Vec::new();
        let event = SpeechEvent::SpeechAbort {
            volume: 0.2,
            timestamp_ms: 1200,
            duration_ms: 1100,
            items: 10,
            abort: AbortReason::SignalTooShort {
                signal_duration_ms: 100,
                min_signal_duration_ms: 300,
            },
        };
        write_event(&mut out, &event).expect("write event");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).expect("json");
        assert_eq!(value["event"], "speechabort");
        assert_eq!(value["abort"], "signal duration (100) < MIN (300)");
    }
}
