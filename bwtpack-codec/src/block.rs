//! Block records and the per-block pipeline.
//!
//! A block is encoded as BWT (per chunk) → MTF → RLE → Huffman and stored as
//! one record:
//!
//! ```text
//! u32 block number
//! u32 chunk count, then count × u32 permutation index
//! u32 table length, then the serialized code table
//! u32 payload length, then the Huffman payload
//! ```
//!
//! All integers are big-endian.

use crate::huffman::{self, CodeTable};
use crate::{bwt, mtf, rle};
use bwtpack_core::config::CodecConfig;
use bwtpack_core::error::{BwtPackError, Result, Stage};
use bwtpack_core::record::{FieldReader, FieldWriter};
use log::{debug, trace};
use std::io::Read;

/// Smallest possible record: four empty length-prefixed fields.
pub const MIN_RECORD_SIZE: usize = 16;

/// One compressed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// 0-based position of the block in the original input.
    pub block_number: u32,
    /// BWT permutation index of each chunk, in chunk order.
    pub chunk_indices: Vec<u32>,
    /// Serialized Huffman code table.
    pub table: Vec<u8>,
    /// Huffman payload (pad byte + packed codes).
    pub payload: Vec<u8>,
}

impl BlockRecord {
    /// Size of the record once serialized.
    pub fn encoded_len(&self) -> usize {
        MIN_RECORD_SIZE + 4 * self.chunk_indices.len() + self.table.len() + self.payload.len()
    }

    /// Serialize the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::with_capacity(self.encoded_len());
        self.write_fields(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Append the record to `writer`.
    pub fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        let count = u32::try_from(self.chunk_indices.len()).map_err(|_| {
            BwtPackError::malformed(writer.len() as u64, "too many chunk indices")
        })?;

        writer.put_u32(self.block_number);
        writer.put_u32(count);
        for &index in &self.chunk_indices {
            writer.put_u32(index);
        }
        writer.put_prefixed(&self.table, "code table")?;
        writer.put_prefixed(&self.payload, "payload")?;
        Ok(())
    }

    /// Read the next record from `reader`, or `None` at a clean end of stream.
    ///
    /// Once the block number is known, field errors are wrapped with it and
    /// [`Stage::Record`].
    pub fn read_from<R: Read>(reader: &mut FieldReader<R>) -> Result<Option<Self>> {
        let Some(block_number) = reader.read_u32_or_eof("block number")? else {
            return Ok(None);
        };
        Self::read_body(block_number, reader)
            .map(Some)
            .map_err(|e| e.in_block(block_number, Stage::Record))
    }

    fn read_body<R: Read>(block_number: u32, reader: &mut FieldReader<R>) -> Result<Self> {
        let count_offset = reader.position();
        let count = reader.read_u32("chunk count")? as usize;
        let index_len = count.checked_mul(4).ok_or_else(|| {
            BwtPackError::malformed(count_offset, format!("chunk count {} overflows", count))
        })?;

        // Grows with the bytes present, not with the claimed count
        let chunk_indices = reader
            .read_bytes(index_len, "chunk indices")?
            .chunks_exact(4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        let table = reader.read_prefixed("code table")?;
        let payload = reader.read_prefixed("payload")?;

        Ok(Self {
            block_number,
            chunk_indices,
            table,
            payload,
        })
    }

    /// Parse a single record that must span all of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(data);
        let record = Self::read_from(&mut reader)?
            .ok_or_else(|| BwtPackError::malformed(0, "empty record"))?;
        let end = reader.position();
        if end != data.len() as u64 {
            return Err(BwtPackError::malformed(
                end,
                format!("{} trailing bytes after record", data.len() as u64 - end),
            ));
        }
        Ok(record)
    }
}

/// Runs the four-stage pipeline for single blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCodec {
    config: CodecConfig,
}

impl BlockCodec {
    /// Create a block codec for `config`.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode one block.
    pub fn encode(&self, block_number: u32, data: &[u8]) -> Result<BlockRecord> {
        let (bwt_data, chunk_indices) = bwt::transform_block(data, &self.config);
        trace!(
            "block {}: bwt produced {} chunks",
            block_number,
            chunk_indices.len()
        );

        let mtf_data = mtf::transform(&bwt_data);
        let rle_data = rle::encode(&mtf_data);
        trace!(
            "block {}: rle {} -> {} bytes",
            block_number,
            mtf_data.len(),
            rle_data.len()
        );

        let (table, payload) = huffman::compress(&rle_data)?;
        let record = BlockRecord {
            block_number,
            chunk_indices,
            table: table.serialize(),
            payload,
        };

        debug!(
            "block {}: {} bytes -> {} byte record ({} symbols)",
            block_number,
            data.len(),
            record.encoded_len(),
            table.len()
        );

        Ok(record)
    }

    /// Decode one record.
    ///
    /// Errors are wrapped with the block number and the failing stage.
    pub fn decode(&self, record: &BlockRecord) -> Result<Vec<u8>> {
        let block = record.block_number;

        let table =
            CodeTable::deserialize(&record.table).map_err(|e| e.in_block(block, Stage::Huffman))?;
        let rle_data =
            huffman::decode(&record.payload, &table).map_err(|e| e.in_block(block, Stage::Huffman))?;
        let mtf_data = rle::decode(&rle_data).map_err(|e| e.in_block(block, Stage::Rle))?;
        let bwt_data = mtf::inverse_transform(&mtf_data);

        let data = bwt::inverse_block(&bwt_data, &record.chunk_indices, &self.config)
            .map_err(|e| e.in_block(block, Stage::Bwt))?;

        debug!("block {}: decoded {} bytes", block, data.len());
        Ok(data)
    }
}
