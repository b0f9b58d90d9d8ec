//! WAV container adapter.
//!
//! The reverb core works on a bare stream of 16-bit samples. This module peels
//! that stream out of a RIFF/WAVE file, reports the header fields the pipeline
//! needs for sizing, and writes the processed stream back with the same
//! format header.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::stream::{SampleSink, SampleSource};
use crate::{Error, Result};

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl std::fmt::Display for WavFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pcm => write!(f, "PCM"),
            Self::IeeeFloat => write!(f, "IEEE float"),
        }
    }
}

/// WAV header fields, read without loading sample data.
#[derive(Debug, Clone, PartialEq)]
pub struct WavInfo {
    /// Audio encoding format.
    pub format: WavFormat,
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bytes per second of audio.
    pub byte_rate: u32,
    /// Bytes per frame across all channels.
    pub block_align: u16,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Size of the sample data in bytes.
    pub data_bytes: u64,
    /// Sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl WavInfo {
    fn from_reader<R: Read>(reader: &WavReader<R>) -> Self {
        let spec = reader.spec();
        let bytes_per_sample = u32::from(spec.bits_per_sample).div_ceil(8);
        let block_align = spec.channels.saturating_mul(bytes_per_sample as u16);
        let total_samples = u64::from(reader.len());
        let num_frames = u64::from(reader.duration());

        Self {
            format: match spec.sample_format {
                SampleFormat::Float => WavFormat::IeeeFloat,
                SampleFormat::Int => WavFormat::Pcm,
            },
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            byte_rate: spec.sample_rate.saturating_mul(u32::from(block_align)),
            block_align,
            bits_per_sample: spec.bits_per_sample,
            data_bytes: total_samples * u64::from(bytes_per_sample),
            num_frames,
            duration_secs: if spec.sample_rate == 0 {
                0.0
            } else {
                num_frames as f64 / f64::from(spec.sample_rate)
            },
        }
    }

    /// Rejects anything but mono 16-bit integer PCM.
    pub fn check_supported(&self) -> Result<()> {
        if self.format != WavFormat::Pcm {
            return Err(Error::UnsupportedFormat(format!(
                "{} samples (only integer PCM is supported)",
                self.format
            )));
        }
        if self.bits_per_sample != 16 {
            return Err(Error::UnsupportedFormat(format!(
                "{}-bit samples (only 16-bit is supported)",
                self.bits_per_sample
            )));
        }
        if self.channels != 1 {
            return Err(Error::UnsupportedFormat(format!(
                "{} channels (only mono is supported)",
                self.channels
            )));
        }
        Ok(())
    }

    fn log_header(&self) {
        tracing::debug!(format = %self.format, "wav header: format");
        tracing::debug!(channels = self.channels, "wav header: channels");
        tracing::debug!(sample_rate = self.sample_rate, "wav header: sample rate");
        tracing::debug!(byte_rate = self.byte_rate, "wav header: byte rate");
        tracing::debug!(block_align = self.block_align, "wav header: block align");
        tracing::debug!(bits = self.bits_per_sample, "wav header: bits per sample");
        tracing::debug!(data_bytes = self.data_bytes, "wav header: data size");
    }
}

/// Read WAV header fields without loading sample data.
///
/// Works for any format `hound` can parse, so unsupported files can still be
/// inspected.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::new(open_file(path.as_ref())?)?;
    let info = WavInfo::from_reader(&reader);
    info.log_header();
    Ok(info)
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn mono_pcm16(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Mono 16-bit PCM samples from a WAV container.
pub struct WavSource<R: Read> {
    reader: WavReader<R>,
    info: WavInfo,
}

impl WavSource<BufReader<File>> {
    /// Opens `path` and validates its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = Self::new(open_file(path)?)?;
        tracing::info!(
            path = %path.display(),
            sample_rate = source.info.sample_rate,
            bits = source.info.bits_per_sample,
            channels = source.info.channels,
            frames = source.info.num_frames,
            "opened WAV input"
        );
        Ok(source)
    }
}

impl<R: Read> WavSource<R> {
    /// Parses the header from `reader` and validates it.
    ///
    /// Fails with [`Error::UnsupportedFormat`] unless the data is mono 16-bit PCM.
    pub fn new(reader: R) -> Result<Self> {
        let reader = WavReader::new(reader)?;
        let info = WavInfo::from_reader(&reader);
        info.log_header();
        info.check_supported()?;
        Ok(Self { reader, info })
    }

    /// Header fields of the source.
    pub fn info(&self) -> &WavInfo {
        &self.info
    }
}

impl<R: Read> SampleSource for WavSource<R> {
    fn read_sample(&mut self) -> Result<Option<i16>> {
        match self.reader.samples::<i16>().next() {
            None => Ok(None),
            Some(Ok(sample)) => Ok(Some(sample)),
            // Header claims more data than the file holds: end the stream here.
            Some(Err(hound::Error::IoError(e))) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::warn!("WAV data ends before the size declared in its header");
                Ok(None)
            }
            Some(Err(e)) => Err(e.into()),
        }
    }
}

/// Mono 16-bit PCM sink writing a WAV container.
///
/// The header's data size is patched when the sink is finalized (or dropped).
pub struct WavSink<W: Write + Seek> {
    writer: WavWriter<W>,
}

impl WavSink<BufWriter<File>> {
    /// Creates `path` with a mono 16-bit PCM header at `sample_rate`.
    pub fn create<P: AsRef<Path>>(path: P, sample_rate: u32) -> Result<Self> {
        let path = path.as_ref();
        let sink = Self::new(create_file(path)?, sample_rate)?;
        tracing::info!(path = %path.display(), sample_rate, "created WAV output");
        Ok(sink)
    }
}

impl<W: Write + Seek> WavSink<W> {
    /// Writes a mono 16-bit PCM header at `sample_rate` to `writer`.
    pub fn new(writer: W, sample_rate: u32) -> Result<Self> {
        Ok(Self {
            writer: WavWriter::new(writer, mono_pcm16(sample_rate))?,
        })
    }

    /// Patches the header sizes and flushes the underlying writer.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

impl<W: Write + Seek> SampleSink for WavSink<W> {
    fn write_sample(&mut self, sample: i16) -> Result<()> {
        self.writer.write_sample(sample)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Read a mono 16-bit WAV file into memory.
pub fn read_wav_i16<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, WavInfo)> {
    let mut source = WavSource::open(path)?;
    let mut samples = Vec::with_capacity(usize::try_from(source.info.num_frames).unwrap_or(0));
    while let Some(sample) = source.read_sample()? {
        samples.push(sample);
    }
    Ok((samples, source.info))
}

/// Write samples to a mono 16-bit WAV file.
pub fn write_wav_i16<P: AsRef<Path>>(path: P, samples: &[i16], sample_rate: u32) -> Result<()> {
    let mut sink = WavSink::create(path, sample_rate)?;
    for &sample in samples {
        sink.write_sample(sample)?;
    }
    sink.finalize()
}
