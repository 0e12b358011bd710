//! Utility functions for the CLI.

use bwtpack_codec::stats::{CompressionReport, format_size};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Extension given to compressed files.
pub const EXTENSION: &str = "bwp";

/// Create a byte-counting progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb
}

/// Default output path for `compress`: `<input>.bwp`.
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Default output path for `decompress`: the input with `.bwp` stripped,
/// or `<input>.out` when it has no such extension.
pub fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

/// Print a size/ratio/timing report.
pub fn print_report(report: &CompressionReport) {
    println!("Original size:      {}", format_size(report.original_size));
    println!("Compressed size:    {}", format_size(report.compressed_size));
    println!("Compression ratio:  {:.3}", report.ratio);
    println!("Space saving:       {:.2}%", report.space_saving_percent);
    println!("Elapsed time:       {:.3} s", report.elapsed_secs);
}
