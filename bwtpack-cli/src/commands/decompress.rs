//! Decompress command implementation.

use crate::utils::{create_progress_bar, decompressed_path};
use bwtpack_codec::stats::format_size;
use bwtpack_codec::{BlockAssembler, CodecConfig, Decoder, decompress_parallel};
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

pub fn cmd_decompress(
    input: &Path,
    output: Option<&Path>,
    config: &CodecConfig,
    parallel: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stream_len = fs::metadata(input)?.len();
    let output = output.map_or_else(|| decompressed_path(input), Path::to_path_buf);
    info!(
        "decompressing {} ({} bytes, chunk size {})",
        input.display(),
        stream_len,
        config.chunk_size
    );

    let start = Instant::now();
    let data = if parallel {
        decompress_parallel(&fs::read(input)?, config)?
    } else {
        let pb = create_progress_bar(stream_len, progress);
        let mut decoder = Decoder::new(BufReader::new(File::open(input)?), *config)?;
        let mut assembler = BlockAssembler::for_stream(stream_len);
        loop {
            let offset = decoder.position();
            let Some((block_number, block)) = decoder.read_block()? else {
                break;
            };
            debug!("block {}: {} bytes", block_number, block.len());
            assembler.insert(block_number, offset, block)?;
            pb.set_position(decoder.position());
        }
        pb.finish_and_clear();
        assembler.finish()?
    };
    fs::write(&output, &data)?;

    println!("{} -> {}", input.display(), output.display());
    println!("Restored size:      {}", format_size(data.len() as u64));
    println!("Elapsed time:       {:.3} s", start.elapsed().as_secs_f64());

    Ok(())
}
