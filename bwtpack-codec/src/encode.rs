//! Stream encoder.

use crate::block::{BlockCodec, BlockRecord};
use bwtpack_core::config::CodecConfig;
use bwtpack_core::error::{BwtPackError, Result};
use bwtpack_core::record::FieldWriter;
use log::debug;
use std::io::Write;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Writes one record per block to an underlying writer.
pub struct Encoder<W: Write> {
    writer: W,
    codec: BlockCodec,
    next_block: u32,
    bytes_in: u64,
    bytes_out: u64,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder.
    pub fn new(writer: W, config: CodecConfig) -> Result<Self> {
        Ok(Self {
            writer,
            codec: BlockCodec::new(config)?,
            next_block: 0,
            bytes_in: 0,
            bytes_out: 0,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &CodecConfig {
        self.codec.config()
    }

    /// Number of the next block to be written.
    pub fn next_block_number(&self) -> u32 {
        self.next_block
    }

    /// Total input bytes consumed so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Total record bytes written so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    /// Encode and write one block, assigning it the next block number.
    ///
    /// The block may not exceed the configured block size. Returns the size
    /// of the written record.
    pub fn write_block(&mut self, data: &[u8]) -> Result<usize> {
        let block_size = self.codec.config().block_size;
        if data.len() > block_size {
            return Err(BwtPackError::invalid_config(format!(
                "block of {} bytes exceeds block size {}",
                data.len(),
                block_size
            )));
        }

        let record = self.codec.encode(self.next_block, data)?;
        self.bytes_in += data.len() as u64;
        self.write_record(&record)
    }

    /// Split `data` into blocks and write each of them.
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        for block in data.chunks(self.codec.config().block_size) {
            self.write_block(block)?;
        }
        Ok(())
    }

    /// Write an already encoded record.
    ///
    /// Records must carry consecutive block numbers starting at the
    /// encoder's next block number.
    pub fn write_record(&mut self, record: &BlockRecord) -> Result<usize> {
        if record.block_number != self.next_block {
            return Err(BwtPackError::invalid_config(format!(
                "record {} written where block {} was expected",
                record.block_number, self.next_block
            )));
        }

        let mut fields = FieldWriter::with_capacity(record.encoded_len());
        record.write_fields(&mut fields)?;
        let bytes = fields.into_inner();
        self.writer.write_all(&bytes)?;

        self.next_block = self.next_block.checked_add(1).ok_or_else(|| {
            BwtPackError::invalid_config("block number space exhausted")
        })?;
        self.bytes_out += bytes.len() as u64;
        Ok(bytes.len())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        debug!(
            "encoded {} blocks: {} -> {} bytes",
            self.next_block, self.bytes_in, self.bytes_out
        );
        Ok(self.writer)
    }
}

/// Compress `data` into a record stream.
///
/// Empty input produces an empty stream.
pub fn compress(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(Vec::with_capacity(data.len() / 2 + 64), *config)?;
    encoder.write_all(data)?;
    encoder.finish()
}

/// Compress `data` into `writer`, returning the number of bytes written.
pub fn compress_to_writer<W: Write>(data: &[u8], writer: W, config: &CodecConfig) -> Result<u64> {
    let mut encoder = Encoder::new(writer, *config)?;
    encoder.write_all(data)?;
    let written = encoder.bytes_out();
    encoder.finish()?;
    Ok(written)
}

/// Compress using parallel block encoding (requires `parallel` feature).
///
/// Blocks are encoded independently on the rayon pool and written in
/// block-number order, so the output is identical to [`compress`].
#[cfg(feature = "parallel")]
pub fn compress_parallel(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let codec = BlockCodec::new(*config)?;
    let blocks: Vec<&[u8]> = data.chunks(config.block_size).collect();

    let records: Vec<Result<BlockRecord>> = blocks
        .par_iter()
        .enumerate()
        .map(|(index, block)| {
            let block_number = u32::try_from(index)
                .map_err(|_| BwtPackError::invalid_config("block number space exhausted"))?;
            codec.encode(block_number, block)
        })
        .collect();

    let mut encoder = Encoder::new(Vec::with_capacity(data.len() / 2 + 64), *config)?;
    for record in records {
        encoder.write_record(&record?)?;
    }
    encoder.bytes_in = data.len() as u64;
    encoder.finish()
}
