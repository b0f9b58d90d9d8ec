//! Display WAV header fields.

use clap::Args;
use cverb_core::ReverbConfig;
use cverb_io::read_wav_info;

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;

    println!("File:            {}", args.file.display());
    println!("Format:          {}", info.format);
    println!("Channels:        {}", info.channels);
    println!("Sample Rate:     {} Hz", info.sample_rate);
    println!("Byte Rate:       {} B/s", info.byte_rate);
    println!("Block Align:     {} B", info.block_align);
    println!("Bits per Sample: {}", info.bits_per_sample);
    println!("Data Size:       {}", format_bytes(info.data_bytes));
    println!(
        "Duration:        {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:       {}", format_bytes(file_size));

    match info.check_supported() {
        Ok(()) => {
            let config = ReverbConfig::default();
            match (
                config.comb_delay_samples(info.sample_rate),
                config.history_capacity(info.sample_rate),
            ) {
                (Ok(delay), Ok(capacity)) => println!(
                    "Reverb:          supported ({delay}-sample delay, {capacity}-slot lines at defaults)"
                ),
                (Err(e), _) | (_, Err(e)) => println!("Reverb:          not supported ({e})"),
            }
        }
        Err(e) => println!("Reverb:          not supported ({e})"),
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(44), "44 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
