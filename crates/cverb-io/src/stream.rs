//! Sample sources, sinks, and the stream runner.
//!
//! The runner pulls one sample at a time from a [`SampleSource`], pushes it
//! through the pipeline as a raw frame, and writes the result to a
//! [`SampleSink`] before pulling the next one. End of source is normal
//! completion.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, Write};
use std::path::Path;

use cverb_core::sample::{self, Endianness};
use cverb_core::{Reverb, ReverbConfig};

use crate::wav::{WavSink, WavSource};
use crate::{Error, Result};

/// Frames between progress callbacks.
pub const PROGRESS_INTERVAL: u64 = 4096;

/// A stream of 16-bit samples.
pub trait SampleSource {
    /// Returns the next sample, or `None` once the stream is exhausted.
    fn read_sample(&mut self) -> Result<Option<i16>>;
}

/// A destination for 16-bit samples.
pub trait SampleSink {
    /// Appends one sample.
    fn write_sample(&mut self, sample: i16) -> Result<()>;

    /// Pushes buffered samples to the underlying stream.
    fn flush(&mut self) -> Result<()>;
}

/// Headerless 16-bit PCM read from a byte stream.
pub struct RawSource<R: Read> {
    reader: R,
    endianness: Endianness,
}

impl<R: Read> RawSource<R> {
    /// Reads frames from `reader` in the given byte order.
    pub fn new(reader: R, endianness: Endianness) -> Self {
        Self { reader, endianness }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> SampleSource for RawSource<R> {
    fn read_sample(&mut self) -> Result<Option<i16>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let Some(second) = self.read_byte()? else {
            tracing::warn!("raw input ends with an odd byte; dropping it");
            return Ok(None);
        };
        Ok(Some(sample::decode([first, second], self.endianness)))
    }
}

/// Headerless 16-bit PCM written to a byte stream.
pub struct RawSink<W: Write> {
    writer: W,
    endianness: Endianness,
}

impl<W: Write> RawSink<W> {
    /// Writes frames to `writer` in the given byte order.
    pub fn new(writer: W, endianness: Endianness) -> Self {
        Self { writer, endianness }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for RawSink<W> {
    fn write_sample(&mut self, sample: i16) -> Result<()> {
        self.writer
            .write_all(&sample::encode(sample, self.endianness))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Counters for one run of the stream runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Samples read from the source.
    pub frames_in: u64,
    /// Samples written to the sink, including any tail.
    pub frames_out: u64,
    /// Emitted samples that left the 16-bit range.
    pub clipped: u64,
    /// Largest emitted magnitude.
    pub peak: u16,
}

impl StreamStats {
    /// Peak level relative to full scale, in dBFS.
    pub fn peak_dbfs(&self) -> f64 {
        if self.peak == 0 {
            f64::NEG_INFINITY
        } else {
            20.0 * (f64::from(self.peak) / 32768.0).log10()
        }
    }
}

/// Number of silent frames needed to cover `tail_ms` at `sample_rate`.
pub fn tail_frames(tail_ms: f32, sample_rate: u32) -> usize {
    if !tail_ms.is_finite() || tail_ms <= 0.0 {
        return 0;
    }
    (f64::from(tail_ms) * f64::from(sample_rate) / 1000.0).round() as usize
}

/// Drives `reverb` from `source` to `sink`, then feeds `tail` silent frames.
pub fn run<S, K>(
    reverb: &mut Reverb,
    source: &mut S,
    sink: &mut K,
    tail: usize,
) -> Result<StreamStats>
where
    S: SampleSource + ?Sized,
    K: SampleSink + ?Sized,
{
    run_with_progress(reverb, source, sink, tail, |_| {})
}

/// Like [`run`], calling `progress` with the frames emitted so far every
/// [`PROGRESS_INTERVAL`] frames and once at the end.
pub fn run_with_progress<S, K, F>(
    reverb: &mut Reverb,
    source: &mut S,
    sink: &mut K,
    tail: usize,
    mut progress: F,
) -> Result<StreamStats>
where
    S: SampleSource + ?Sized,
    K: SampleSink + ?Sized,
    F: FnMut(u64),
{
    let endianness = reverb.endianness();
    let clipped_before = reverb.clipped_samples();
    let mut stats = StreamStats::default();

    let mut step = |reverb: &mut Reverb, input: i16, stats: &mut StreamStats| -> Result<()> {
        let out = reverb.process_frame(sample::encode(input, endianness))?;
        sink.write_sample(out)?;
        stats.frames_out += 1;
        stats.peak = stats.peak.max(out.unsigned_abs());
        if stats.frames_out % PROGRESS_INTERVAL == 0 {
            progress(stats.frames_out);
        }
        Ok(())
    };

    while let Some(input) = source.read_sample()? {
        stats.frames_in += 1;
        step(reverb, input, &mut stats)?;
    }
    for _ in 0..tail {
        step(reverb, 0, &mut stats)?;
    }

    sink.flush()?;
    progress(stats.frames_out);

    stats.clipped = reverb.clipped_samples() - clipped_before;
    if stats.clipped > 0 {
        tracing::warn!(clipped = stats.clipped, "output samples left the 16-bit range");
    }
    tracing::debug!(
        frames_in = stats.frames_in,
        frames_out = stats.frames_out,
        peak = stats.peak,
        "stream finished"
    );
    Ok(stats)
}

/// Hooks into [`process_wav_file_with`] and [`process_raw_file_with`].
///
/// Both methods default to doing nothing; `()` is the silent observer.
pub trait RunObserver {
    /// Called once the pipeline is built and the output exists, before the
    /// first frame. `input_frames` is the source length as far as it is known.
    fn started(&mut self, _reverb: &Reverb, _input_frames: u64, _tail_frames: u64) {}

    /// Called with the number of frames emitted so far.
    fn progress(&mut self, _frames_out: u64) {}
}

impl RunObserver for () {}

/// Applies reverb to a mono 16-bit WAV file.
///
/// The output header matches the input. `tail_ms` of silence is appended
/// after the input runs out.
pub fn process_wav_file<P, Q>(
    input: P,
    output: Q,
    config: &ReverbConfig,
    tail_ms: f32,
) -> Result<StreamStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_wav_file_with(input, output, config, tail_ms, &mut ())
}

/// [`process_wav_file`] reporting to `observer`.
///
/// The input is opened and the pipeline built before the output is created,
/// so an unreadable input or an unusable configuration leaves no file behind.
/// A run that fails part way removes its output.
pub fn process_wav_file_with<P, Q, O>(
    input: P,
    output: Q,
    config: &ReverbConfig,
    tail_ms: f32,
    observer: &mut O,
) -> Result<StreamStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: RunObserver + ?Sized,
{
    let output = output.as_ref();
    let mut source = WavSource::open(input)?;
    let sample_rate = source.info().sample_rate;
    let input_frames = source.info().num_frames;
    let mut reverb = Reverb::new(config, sample_rate)?;
    let tail = tail_frames(tail_ms, sample_rate);

    let sink = WavSink::create(output, sample_rate)?;
    observer.started(&reverb, input_frames, tail as u64);
    discard_on_error(
        drive_wav(&mut reverb, &mut source, sink, tail, observer),
        output,
    )
}

fn drive_wav<S, W, O>(
    reverb: &mut Reverb,
    source: &mut S,
    mut sink: WavSink<W>,
    tail: usize,
    observer: &mut O,
) -> Result<StreamStats>
where
    S: SampleSource + ?Sized,
    W: Write + Seek,
    O: RunObserver + ?Sized,
{
    let stats = run_with_progress(reverb, source, &mut sink, tail, |n| observer.progress(n))?;
    sink.finalize()?;
    Ok(stats)
}

/// Applies reverb to a headerless 16-bit PCM file at `sample_rate`.
///
/// Frames are read and written in `config.endianness`.
pub fn process_raw_file<P, Q>(
    input: P,
    output: Q,
    config: &ReverbConfig,
    sample_rate: u32,
    tail_ms: f32,
) -> Result<StreamStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_raw_file_with(input, output, config, sample_rate, tail_ms, &mut ())
}

/// [`process_raw_file`] reporting to `observer`, with the same ordering and
/// cleanup guarantees as [`process_wav_file_with`].
pub fn process_raw_file_with<P, Q, O>(
    input: P,
    output: Q,
    config: &ReverbConfig,
    sample_rate: u32,
    tail_ms: f32,
    observer: &mut O,
) -> Result<StreamStats>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: RunObserver + ?Sized,
{
    let input = input.as_ref();
    let output = output.as_ref();
    let reader = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let input_frames = reader.metadata()?.len() / 2;
    tracing::info!(path = %input.display(), sample_rate, "opened raw PCM input");

    let mut reverb = Reverb::new(config, sample_rate)?;
    let tail = tail_frames(tail_ms, sample_rate);

    let writer = File::create(output).map_err(|source| Error::Open {
        path: output.to_path_buf(),
        source,
    })?;
    let mut source = RawSource::new(BufReader::new(reader), config.endianness);
    let mut sink = RawSink::new(BufWriter::new(writer), config.endianness);
    observer.started(&reverb, input_frames, tail as u64);

    let result = run_with_progress(&mut reverb, &mut source, &mut sink, tail, |n| {
        observer.progress(n);
    });
    drop(sink);
    discard_on_error(result, output)
}

/// Removes a partially written `output` when the run failed.
fn discard_on_error<T>(result: Result<T>, output: &Path) -> Result<T> {
    if result.is_err()
        && let Err(e) = std::fs::remove_file(output)
    {
        tracing::warn!(path = %output.display(), error = %e, "could not remove partial output");
    }
    result
}
