//! Info command implementation.

use bwtpack_codec::inspect;
use bwtpack_codec::stats::format_size;
use std::fs;
use std::path::Path;

pub fn cmd_info(archive: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stream = fs::read(archive)?;
    let records = inspect(&stream)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("File: {}", archive.display());
    println!("Size: {}", format_size(stream.len() as u64));
    println!("Records: {}", records.len());
    println!();
    println!(
        "{:>6} {:>10} {:>7} {:>8} {:>7} {:>8} {:>10}",
        "Block", "Offset", "Chunks", "Symbols", "MaxLen", "Table", "Payload"
    );
    println!("{}", "-".repeat(62));

    for record in &records {
        println!(
            "{:>6} {:>10} {:>7} {:>8} {:>7} {:>8} {:>10}",
            record.block_number,
            record.offset,
            record.chunks,
            record.table_symbols,
            record.max_code_len,
            record.table_bytes,
            record.payload_bytes
        );
    }

    let table_total: usize = records.iter().map(|r| r.table_bytes).sum();
    let payload_total: usize = records.iter().map(|r| r.payload_bytes).sum();
    println!("{}", "-".repeat(62));
    println!("{:>51} {:>10}", table_total, payload_total);

    Ok(())
}
