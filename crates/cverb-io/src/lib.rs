//! Stream I/O for the cverb reverberator.
//!
//! This crate provides:
//!
//! - **WAV container adapter**: [`WavSource`] and [`WavSink`] read and write
//!   mono 16-bit PCM through `hound`, and [`read_wav_info`] exposes every
//!   header field without touching sample data
//! - **Raw PCM streams**: [`RawSource`] and [`RawSink`] over any
//!   [`Read`](std::io::Read) / [`Write`](std::io::Write) byte stream
//! - **Stream runner**: [`run`] drives a [`Reverb`](cverb_core::Reverb) from an
//!   open source to an open sink and returns [`StreamStats`]
//! - **File processing**: [`process_wav_file`] and [`process_raw_file`] build
//!   the pipeline before creating any output, and report progress through a
//!   [`RunObserver`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cverb_core::ReverbConfig;
//! use cverb_io::process_wav_file;
//!
//! let stats = process_wav_file("input.wav", "cverb_out.wav", &ReverbConfig::default(), 0.0)?;
//! println!("{} frames in, {} frames out", stats.frames_in, stats.frames_out);
//! # Ok::<(), cverb_io::Error>(())
//! ```

use std::path::PathBuf;

mod stream;
mod wav;

pub use stream::{
    PROGRESS_INTERVAL, RawSink, RawSource, RunObserver, SampleSink, SampleSource, StreamStats,
    process_raw_file, process_raw_file_with, process_wav_file, process_wav_file_with, run,
    run_with_progress, tail_frames,
};
pub use wav::{WavFormat, WavInfo, WavSink, WavSource, read_wav_i16, read_wav_info, write_wav_i16};

/// Error types for stream I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV container read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A source or sink could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not mono 16-bit integer PCM.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Pipeline construction or processing failed.
    #[error("Reverb error: {0}")]
    Reverb(#[from] cverb_core::ReverbError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for stream I/O.
pub type Result<T> = std::result::Result<T, Error>;
