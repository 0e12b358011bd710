//! Compress command implementation.

use crate::utils::{compressed_path, create_progress_bar, print_report};
use bwtpack_codec::stats::CompressionReport;
use bwtpack_codec::{CodecConfig, Encoder, compress_parallel};
use log::info;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

pub fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    config: &CodecConfig,
    parallel: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let output = output.map_or_else(|| compressed_path(input), Path::to_path_buf);
    info!(
        "compressing {} ({} bytes, block size {}, chunk size {})",
        input.display(),
        data.len(),
        config.block_size,
        config.chunk_size
    );

    let start = Instant::now();
    let written = if parallel {
        let stream = compress_parallel(&data, config)?;
        fs::write(&output, &stream)?;
        stream.len() as u64
    } else {
        let pb = create_progress_bar(data.len() as u64, progress);
        let writer = BufWriter::new(File::create(&output)?);
        let mut encoder = Encoder::new(writer, *config)?;
        for block in data.chunks(config.block_size) {
            encoder.write_block(block)?;
            pb.inc(block.len() as u64);
        }
        let written = encoder.bytes_out();
        encoder.finish()?;
        pb.finish_and_clear();
        written
    };

    let report = CompressionReport::new(data.len() as u64, written, start.elapsed());
    println!("{} -> {}", input.display(), output.display());
    print_report(&report);

    Ok(())
}
