//! Integration tests for cverb-cli.
//!
//! Tests drive the built `cverb` binary end to end on temporary files.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Helper to get the path to the `cverb` binary built by cargo.
fn cverb_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cverb"))
}

fn write_mono(path: &Path, samples: &[i16], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn read_mono(path: &Path) -> (Vec<i16>, hound::WavSpec) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(Result::unwrap).collect();
    (samples, spec)
}

fn impulse(len: usize, at: usize, amplitude: i16) -> Vec<i16> {
    let mut samples = vec![0; len];
    samples[at] = amplitude;
    samples
}

// ---------------------------------------------------------------------------
// Basic invocation
// ---------------------------------------------------------------------------

#[test]
fn cli_help_works() {
    let output = cverb_bin().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["process", "info", "presets"] {
        assert!(stdout.contains(command), "help should list '{command}'");
    }
}

#[test]
fn cli_version_works() {
    let output = cverb_bin().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("cverb"));
}

// ---------------------------------------------------------------------------
// cverb process
// ---------------------------------------------------------------------------

#[test]
fn cli_process_golden_impulse() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("impulse.wav");
    let output = dir.path().join("out.wav");
    write_mono(&input, &impulse(8000, 1000, 10_000), 8000);

    let result = cverb_bin()
        .env_remove("RUST_LOG")
        .args(["process", "--quiet", "--delay-ms", "600", "-o"])
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let (samples, spec) = read_mono(&output);
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples.len(), 8000);
    assert_eq!(samples[1000], 6875);
    assert_eq!(samples[5800], 3250);
    assert_eq!(samples.iter().filter(|&&s| s != 0).count(), 2);

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("8000 in, 8000 out"), "got: {stdout}");
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("reverb applied"), "got: {stderr}");
}

#[test]
fn cli_process_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_mono(&input, &impulse(4410, 0, 8000), 44100);

    let result = cverb_bin()
        .current_dir(dir.path())
        .args(["process", "--quiet", "in.wav"])
        .output()
        .unwrap();
    assert!(result.status.success());

    let (samples, spec) = read_mono(&dir.path().join("cverb_out.wav"));
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(samples.len(), 4410);
}

#[test]
fn cli_process_preset_with_tail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_mono(&input, &impulse(800, 0, 8000), 8000);

    let result = cverb_bin()
        .args(["process", "--quiet", "--preset", "slapback", "--tail-ms", "500", "-o"])
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(result.status.success());

    let (samples, _) = read_mono(&output);
    assert_eq!(samples.len(), 800 + 4000);
    // 110 ms = 880 samples, past the end of the input
    assert_eq!(samples[880], 2800);
}

#[test]
fn cli_process_raw_pcm() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pcm");
    let output = dir.path().join("out.pcm");
    std::fs::write(&input, 10_000i16.to_le_bytes()).unwrap();

    let result = cverb_bin()
        .args(["process", "--quiet", "--raw", "--sample-rate", "8000", "-o"])
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(result.status.success());
    assert_eq!(std::fs::read(&output).unwrap(), 6875i16.to_le_bytes());
}

#[test]
fn cli_process_raw_requires_sample_rate() {
    let result = cverb_bin()
        .args(["process", "--raw", "in.pcm"])
        .output()
        .unwrap();
    assert!(!result.status.success());
}

#[test]
fn cli_process_nonexistent_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.wav");

    let result = cverb_bin()
        .args(["process", "--quiet", "-o"])
        .arg(&output)
        .arg(dir.path().join("missing.wav"))
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("cannot open"));
    assert!(!output.exists());
}

#[test]
fn cli_process_rejects_stereo() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("stereo.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&input, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let result = cverb_bin()
        .args(["process", "--quiet", "-o"])
        .arg(dir.path().join("out.wav"))
        .arg(&input)
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unsupported sample format"));
}

#[test]
fn cli_process_rejects_unstable_override() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_mono(&input, &[0; 100], 8000);

    let result = cverb_bin()
        .args(["process", "--quiet", "--comb-feedback", "0.5", "-o"])
        .arg(dir.path().join("out.wav"))
        .arg(&input)
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("not usable"));
}

#[test]
fn cli_process_fail_policy_aborts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("loud.wav");
    write_mono(&input, &[32_000, 32_000], 8000);

    // One-sample comb: the second output is 32000 + 0.5 * 32000.
    let output = dir.path().join("out.wav");
    let result = cverb_bin()
        .args(["process", "--quiet", "--overflow", "fail", "--allpasses", "0", "--combs", "1"])
        .args(["--comb-feedback", "0.5", "--delay-ms", "0.125", "-o"])
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("outside 16-bit range"));
    assert!(!output.exists());
}

#[test]
fn cli_process_bad_sample_rate_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.pcm");
    let output = dir.path().join("out.pcm");
    std::fs::write(&input, [0u8; 16]).unwrap();

    let result = cverb_bin()
        .args(["process", "--quiet", "--raw", "--sample-rate", "0", "-o"])
        .arg(&output)
        .arg(&input)
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("invalid sample rate"));
    assert!(!output.exists());
}

// ---------------------------------------------------------------------------
// cverb info
// ---------------------------------------------------------------------------

#[test]
fn cli_info_shows_header_fields() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tone.wav");
    write_mono(&input, &vec![0; 8000], 8000);

    let result = cverb_bin().arg("info").arg(&input).output().unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Format:          PCM"));
    assert!(stdout.contains("Channels:        1"));
    assert!(stdout.contains("Sample Rate:     8000 Hz"));
    assert!(stdout.contains("Byte Rate:       16000 B/s"));
    assert!(stdout.contains("Block Align:     2 B"));
    assert!(stdout.contains("Bits per Sample: 16"));
    assert!(stdout.contains("(8000 frames)"));
    assert!(stdout.contains("supported (256-sample delay"));
}

// ---------------------------------------------------------------------------
// cverb presets
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_list_factory() {
    let result = cverb_bin()
        .args(["presets", "list", "--factory"])
        .output()
        .unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    for name in ["Reference", "Room", "Hall", "Slapback"] {
        assert!(stdout.contains(name), "listing should contain '{name}'");
    }
}

#[test]
fn cli_presets_show() {
    let result = cverb_bin().args(["presets", "show", "hall"]).output().unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Preset: Hall"));
    assert!(stdout.contains("delay_ms = 47.0"));
    assert!(stdout.contains("comb delay:      2073 samples"));
}

#[test]
fn cli_presets_show_unknown_fails() {
    let result = cverb_bin()
        .args(["presets", "show", "cathedral_12345"])
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("preset not found"));
}

#[cfg(target_os = "linux")]
#[test]
fn cli_presets_copy_into_user_dir() {
    let home = TempDir::new().unwrap();
    let result = cverb_bin()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["presets", "copy", "room", "--name", "my_room"])
        .output()
        .unwrap();
    assert!(
        result.status.success(),
        "copy failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let copied = home.path().join("cverb").join("presets").join("my_room.toml");
    let content = std::fs::read_to_string(&copied).unwrap();
    assert!(content.contains("name = \"my_room\""));
    assert!(content.contains("delay_ms = 23.0"));

    let listed = cverb_bin()
        .env("XDG_CONFIG_HOME", home.path())
        .args(["presets", "list", "--user"])
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&listed.stdout).contains("my_room"));
}
