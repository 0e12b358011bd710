//! Entropy command implementation.

use bwtpack_codec::CodecConfig;
use bwtpack_codec::stats::{analyze_entropy, default_sweep_sizes, format_size, sweep_block_sizes};
use std::fs;
use std::path::Path;

pub fn cmd_entropy(
    input: &Path,
    config: &CodecConfig,
    sweep: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    if sweep {
        return print_sweep(input, &data, config.chunk_size, json);
    }

    let report = analyze_entropy(&data, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {}", input.display());
    println!("Input entropy:        {:.4} bits/byte", report.input_entropy);
    for (block, entropy) in report.block_entropies.iter().enumerate() {
        println!("  block {:>5}:         {:.4} bits/byte", block, entropy);
    }
    println!(
        "BWT + MTF (mean):     {:.4} bits/byte",
        report.mean_transformed_entropy
    );
    if report.input_entropy > 0.0 {
        println!(
            "Reduction:            {:.2}%",
            (1.0 - report.mean_transformed_entropy / report.input_entropy) * 100.0
        );
    }

    Ok(())
}

fn print_sweep(
    input: &Path,
    data: &[u8],
    chunk_size: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sweep = sweep_block_sizes(data, chunk_size, &default_sweep_sizes())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sweep)?);
        return Ok(());
    }

    println!("File: {}  (chunk size {})", input.display(), chunk_size);
    println!("{:>12}  {:>14}", "Block size", "Mean bits/byte");
    for entry in &sweep.entries {
        println!(
            "{:>12}  {:>14.4}",
            entry.block_size, entry.mean_transformed_entropy
        );
    }
    if let Some(size) = sweep.optimal_block_size {
        println!("Optimal block size: {}", format_size(size as u64));
    }

    Ok(())
}
