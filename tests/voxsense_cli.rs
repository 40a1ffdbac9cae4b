use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn voxsense_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_voxsense").expect("voxsense test binary not built")
}

#[test]
fn voxsense_help_mentions_name() {
    let output = Command::new(voxsense_bin())
        .arg("--help")
        .output()
        .expect("run voxsense --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("VoxSense"));
    assert!(combined.contains("--max-interspeech-silence-ms"));
}

#[test]
fn voxsense_list_input_devices_prints_message() {
    let output = Command::new(voxsense_bin())
        .arg("--list-input-devices")
        .output()
        .expect("run voxsense --list-input-devices");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(
        combined.contains("audio input devices")
            || combined.contains("Failed to list audio input devices")
    );
}

#[test]
fn voxsense_list_input_devices_uses_test_override() {
    let output = Command::new(voxsense_bin())
        .arg("--list-input-devices")
        .env("VOXSENSE_TEST_DEVICES", "Desk Mic, USB Headset")
        .output()
        .expect("run voxsense --list-input-devices");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  - Desk Mic"));
    assert!(stdout.contains("  - USB Headset"));
}

#[test]
fn voxsense_rejects_mute_above_speaking_threshold() {
    let output = Command::new(voxsense_bin())
        .args(["--mute-volume", "0.5", "--speaking-min-volume", "0.1"])
        .env("VOXSENSE_NO_LOGS", "true")
        .output()
        .expect("run voxsense with bad thresholds");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("must be below speaking min volume"));
}
