//! End-to-end tests for the reverb pipeline.
//!
//! The golden scenario is small enough to derive by hand: with a 600 ms delay
//! at 8 kHz (4800 samples) a single impulse produces exactly two non-zero
//! output samples within one second.

use cverb_core::{OverflowPolicy, Reverb, ReverbConfig, ReverbError};

const SAMPLE_RATE: u32 = 8000;
const IMPULSE_AT: usize = 1000;
const IMPULSE: i16 = 10_000;

fn reference_config() -> ReverbConfig {
    ReverbConfig {
        delay_ms: 600.0,
        ..ReverbConfig::default()
    }
}

/// One second of silence with a single impulse, as little-endian PCM bytes.
fn impulse_stream() -> Vec<u8> {
    (0..SAMPLE_RATE as usize)
        .flat_map(|i| {
            let s = if i == IMPULSE_AT { IMPULSE } else { 0 };
            s.to_le_bytes()
        })
        .collect()
}

fn process_bytes(reverb: &mut Reverb, bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(2)
        .flat_map(|pair| reverb.process_frame_bytes([pair[0], pair[1]]).unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Golden scenario
// ---------------------------------------------------------------------------

#[test]
fn golden_impulse_response() {
    let mut reverb = Reverb::new(&reference_config(), SAMPLE_RATE).unwrap();
    let output = process_bytes(&mut reverb, &impulse_stream());

    // At the impulse: comb 10000, all-pass stages -5000, 2500, -1250, 625.
    // One delay later: comb 2000, stages 6500, -7000, 5375, -3625.
    let mut expected = vec![0u8; 2 * SAMPLE_RATE as usize];
    expected[2 * IMPULSE_AT..2 * IMPULSE_AT + 2].copy_from_slice(&6875i16.to_le_bytes());
    let echo = IMPULSE_AT + 4800;
    expected[2 * echo..2 * echo + 2].copy_from_slice(&3250i16.to_le_bytes());

    assert_eq!(output.len(), expected.len());
    for (i, (got, want)) in output.chunks(2).zip(expected.chunks(2)).enumerate() {
        assert_eq!(got, want, "frame {i} differs");
    }
    assert_eq!(reverb.frames_processed(), u64::from(SAMPLE_RATE));
    assert_eq!(reverb.clipped_samples(), 0);
}

#[test]
fn golden_output_is_reproducible() {
    let input: Vec<u8> = (0..4000i32)
        .flat_map(|i| (((i * 7919) % 20_000 - 10_000) as i16).to_le_bytes())
        .collect();
    let config = ReverbConfig {
        delay_ms: 50.0,
        ..ReverbConfig::default()
    };

    let first = process_bytes(&mut Reverb::new(&config, SAMPLE_RATE).unwrap(), &input);
    let second = process_bytes(&mut Reverb::new(&config, SAMPLE_RATE).unwrap(), &input);
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Topology checks through the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn comb_only_pipeline_echoes_geometrically() {
    let config = ReverbConfig {
        comb_count: 1,
        allpass_count: 0,
        comb_feedback: 0.5,
        delay_ms: 1.0,
        ..ReverbConfig::default()
    };
    let mut reverb = Reverb::new(&config, SAMPLE_RATE).unwrap();

    let mut out = Vec::new();
    for n in 0..33 {
        let s: i16 = if n == 0 { 16_000 } else { 0 };
        out.push(reverb.process_frame(s.to_le_bytes()).unwrap());
    }

    // d = 8 samples at 8 kHz
    assert_eq!(out[0], 16_000);
    assert_eq!(out[8], 8000);
    assert_eq!(out[16], 4000);
    assert_eq!(out[24], 2000);
    assert_eq!(out[32], 1000);
    assert!(out.iter().enumerate().all(|(n, &s)| n % 8 == 0 || s == 0));
}

#[test]
fn per_stage_allpass_delays() {
    let config = ReverbConfig {
        comb_count: 1,
        comb_feedback: 0.0,
        allpass_count: 2,
        allpass_delays_ms: vec![1.0, 2.0],
        delay_ms: 1.0,
        ..ReverbConfig::default()
    };
    let mut reverb = Reverb::new(&config, SAMPLE_RATE).unwrap();
    let delays: Vec<usize> = reverb
        .allpass()
        .stages()
        .iter()
        .map(|s| s.delay_samples())
        .collect();
    assert_eq!(delays, vec![8, 16]);

    // 8000 in: comb 8000, stage 1 -4000, stage 2 2000.
    assert_eq!(reverb.process_frame(8000i16.to_le_bytes()).unwrap(), 6000);
}

// ---------------------------------------------------------------------------
// Overflow policies
// ---------------------------------------------------------------------------

fn hot_config(overflow: OverflowPolicy) -> ReverbConfig {
    ReverbConfig {
        comb_count: 1,
        allpass_count: 0,
        comb_feedforward: 2.0,
        comb_feedback: 0.0,
        overflow,
        ..ReverbConfig::default()
    }
}

#[test]
fn saturate_policy_clamps() {
    let mut reverb = Reverb::new(&hot_config(OverflowPolicy::Saturate), SAMPLE_RATE).unwrap();
    assert_eq!(reverb.process_frame(20_000i16.to_le_bytes()).unwrap(), i16::MAX);
    assert_eq!(reverb.process_frame((-20_000i16).to_le_bytes()).unwrap(), i16::MIN);
    assert_eq!(reverb.clipped_samples(), 2);
}

#[test]
fn wrap_policy_reproduces_truncating_cast() {
    let mut reverb = Reverb::new(&hot_config(OverflowPolicy::Wrap), SAMPLE_RATE).unwrap();
    // 40000 wraps to 40000 - 65536
    assert_eq!(reverb.process_frame(20_000i16.to_le_bytes()).unwrap(), -25_536);
}

#[test]
fn fail_policy_reports_value() {
    let mut reverb = Reverb::new(&hot_config(OverflowPolicy::Fail), SAMPLE_RATE).unwrap();
    assert_eq!(
        reverb.process_frame(20_000i16.to_le_bytes()),
        Err(ReverbError::SampleOutOfRange(40_000.0))
    );
}

// ---------------------------------------------------------------------------
// Independent pipelines
// ---------------------------------------------------------------------------

#[test]
fn pipelines_run_on_separate_threads() {
    let input = impulse_stream();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let input = input.clone();
            std::thread::spawn(move || {
                let mut reverb = Reverb::new(&reference_config(), SAMPLE_RATE).unwrap();
                process_bytes(&mut reverb, &input)
            })
        })
        .collect();

    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
