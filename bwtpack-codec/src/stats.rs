//! Compression statistics.
//!
//! Helpers for the figures the command-line tool reports: Shannon entropy,
//! average Huffman code length, block-size sweeps and before/after size
//! comparisons.

use crate::huffman::{CodeTable, count_frequencies};
use crate::{bwt, mtf, rle};
use bwtpack_core::config::CodecConfig;
use bwtpack_core::error::Result;
use serde::Serialize;
use std::time::Duration;

/// Shannon entropy of `data` in bits per byte (0.0 for empty input).
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let total = data.len() as f64;
    count_frequencies(data)
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Average code length in bits per symbol of `data` under `table`.
pub fn average_code_length(table: &CodeTable, data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    table.encoded_bits(&count_frequencies(data)) as f64 / data.len() as f64
}

/// Average Huffman code length of each block's RLE stream, in bits per
/// symbol, under the table that block would be coded with.
pub fn block_code_lengths(data: &[u8], config: &CodecConfig) -> Result<Vec<f64>> {
    data.chunks(config.block_size.max(1))
        .map(|block| {
            let (transformed, _) = bwt::transform_block(block, config);
            let rle_data = rle::encode(&mtf::transform(&transformed));
            let table = CodeTable::build(&rle_data)?;
            Ok(average_code_length(&table, &rle_data))
        })
        .collect()
}

/// Sizes and timing of one compression run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionReport {
    /// Input size in bytes.
    pub original_size: u64,
    /// Record stream size in bytes.
    pub compressed_size: u64,
    /// Original size divided by compressed size (0.0 when nothing was
    /// written).
    pub ratio: f64,
    /// Percentage of space saved; negative when the stream grew.
    pub space_saving_percent: f64,
    /// Wall-clock time spent.
    pub elapsed_secs: f64,
}

impl CompressionReport {
    /// Build a report from sizes and elapsed time.
    pub fn new(original_size: u64, compressed_size: u64, elapsed: Duration) -> Self {
        let ratio = if compressed_size > 0 {
            original_size as f64 / compressed_size as f64
        } else {
            0.0
        };
        let space_saving_percent = if original_size > 0 {
            (1.0 - compressed_size as f64 / original_size as f64) * 100.0
        } else {
            0.0
        };
        Self {
            original_size,
            compressed_size,
            ratio,
            space_saving_percent,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }
}

/// Entropy before and after BWT + MTF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyReport {
    /// Entropy of the whole input.
    pub input_entropy: f64,
    /// Entropy of each block after BWT + MTF.
    pub block_entropies: Vec<f64>,
    /// Mean of `block_entropies` (0.0 with no blocks).
    pub mean_transformed_entropy: f64,
}

/// Measure how much BWT + MTF lowers the per-block entropy.
pub fn analyze_entropy(data: &[u8], config: &CodecConfig) -> EntropyReport {
    let block_entropies: Vec<f64> = data
        .chunks(config.block_size.max(1))
        .map(|block| {
            let (transformed, _) = bwt::transform_block(block, config);
            shannon_entropy(&mtf::transform(&transformed))
        })
        .collect();

    let mean_transformed_entropy = if block_entropies.is_empty() {
        0.0
    } else {
        block_entropies.iter().sum::<f64>() / block_entropies.len() as f64
    };

    EntropyReport {
        input_entropy: shannon_entropy(data),
        block_entropies,
        mean_transformed_entropy,
    }
}

/// Smallest block size tried by [`sweep_block_sizes`] by default.
pub const SWEEP_MIN_BLOCK_SIZE: usize = 1024;

/// Largest block size tried by [`sweep_block_sizes`] by default.
pub const SWEEP_MAX_BLOCK_SIZE: usize = 1024 * 1024;

/// Powers of two from [`SWEEP_MIN_BLOCK_SIZE`] to [`SWEEP_MAX_BLOCK_SIZE`].
pub fn default_sweep_sizes() -> Vec<usize> {
    std::iter::successors(Some(SWEEP_MIN_BLOCK_SIZE), |&size| size.checked_mul(2))
        .take_while(|&size| size <= SWEEP_MAX_BLOCK_SIZE)
        .collect()
}

/// Mean BWT + MTF entropy at one block size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepEntry {
    /// Block size tried.
    pub block_size: usize,
    /// Mean entropy of the blocks after BWT + MTF, in bits per byte.
    pub mean_transformed_entropy: f64,
}

/// Entropy across a range of block sizes at a fixed chunk size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSizeSweep {
    /// Chunk size held fixed across the sweep.
    pub chunk_size: usize,
    /// One entry per block size, in the order tried.
    pub entries: Vec<SweepEntry>,
    /// Block size with the lowest mean entropy; the smaller size wins a tie.
    pub optimal_block_size: Option<usize>,
}

/// Run [`analyze_entropy`] at each of `sizes` and pick the best block size.
pub fn sweep_block_sizes(
    data: &[u8],
    chunk_size: usize,
    sizes: &[usize],
) -> Result<BlockSizeSweep> {
    let entries = sizes
        .iter()
        .map(|&block_size| {
            let config = CodecConfig::new(block_size, chunk_size)?;
            Ok(SweepEntry {
                block_size,
                mean_transformed_entropy: analyze_entropy(data, &config).mean_transformed_entropy,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let optimal_block_size = entries
        .iter()
        .min_by(|a, b| a.mean_transformed_entropy.total_cmp(&b.mean_transformed_entropy))
        .map(|entry| entry.block_size);

    Ok(BlockSizeSweep {
        chunk_size,
        entries,
        optimal_block_size,
    })
}

/// Format a byte count the way the report prints it.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} bytes ({:.1} MiB)", bytes, bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{} bytes ({:.1} KiB)", bytes, bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}
