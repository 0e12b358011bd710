//! Stream decoder.

use crate::assemble::BlockAssembler;
use crate::block::{BlockCodec, BlockRecord};
use crate::huffman::CodeTable;
use bwtpack_core::config::CodecConfig;
use bwtpack_core::error::{Result, Stage};
use bwtpack_core::record::FieldReader;
use log::debug;
use serde::Serialize;
use std::io::Read;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Reads records from any byte source and decodes them.
pub struct Decoder<R> {
    reader: FieldReader<R>,
    codec: BlockCodec,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder reading records from `reader`.
    pub fn new(reader: R, config: CodecConfig) -> Result<Self> {
        Ok(Self {
            reader: FieldReader::new(reader),
            codec: BlockCodec::new(config)?,
        })
    }

    /// Byte offset of the next record.
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    /// Read the next record without decoding it.
    pub fn read_record(&mut self) -> Result<Option<BlockRecord>> {
        BlockRecord::read_from(&mut self.reader)
    }

    /// Read and decode the next record.
    /// Returns the block number together with the decoded bytes.
    pub fn read_block(&mut self) -> Result<Option<(u32, Vec<u8>)>> {
        match self.read_record()? {
            Some(record) => {
                let data = self.codec.decode(&record)?;
                Ok(Some((record.block_number, data)))
            }
            None => Ok(None),
        }
    }

    /// Return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

/// Decompress a record stream produced by [`crate::compress`].
///
/// Records may appear in any order; blocks are joined by block number.
pub fn decompress(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(data, *config)?;
    let mut assembler = BlockAssembler::for_stream(data.len() as u64);

    loop {
        let offset = decoder.position();
        let Some((block_number, block)) = decoder.read_block()? else {
            break;
        };
        assembler.insert(block_number, offset, block)?;
    }

    debug!("decoded {} blocks from {} bytes", assembler.len(), data.len());
    assembler.finish()
}

/// Read a whole record stream from `reader` and decompress it.
///
/// The stream length bounds the block numbers, so the input is buffered
/// before any record is decoded.
pub fn decompress_from_reader<R: Read>(mut reader: R, config: &CodecConfig) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decompress(&data, config)
}

/// Decompress using parallel block decoding (requires `parallel` feature).
///
/// Records are parsed sequentially, decoded on the rayon pool and then
/// reassembled exactly as [`decompress`] does.
#[cfg(feature = "parallel")]
pub fn decompress_parallel(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(data, *config)?;
    let mut records = Vec::new();
    loop {
        let offset = decoder.position();
        let Some(record) = decoder.read_record()? else {
            break;
        };
        records.push((offset, record));
    }

    let codec = BlockCodec::new(*config)?;
    let blocks: Vec<Result<Vec<u8>>> = records
        .par_iter()
        .map(|(_, record)| codec.decode(record))
        .collect();

    let mut assembler = BlockAssembler::for_stream(data.len() as u64);
    for ((offset, record), block) in records.iter().zip(blocks) {
        assembler.insert(record.block_number, *offset, block?)?;
    }
    assembler.finish()
}

/// Summary of one record, without decoding its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    /// Byte offset of the record in the stream.
    pub offset: u64,
    /// Block number stored in the record.
    pub block_number: u32,
    /// Number of BWT chunks.
    pub chunks: usize,
    /// Number of symbols in the code table.
    pub table_symbols: usize,
    /// Longest code length in the table.
    pub max_code_len: u8,
    /// Serialized table size in bytes.
    pub table_bytes: usize,
    /// Huffman payload size in bytes.
    pub payload_bytes: usize,
    /// Whole record size in bytes.
    pub record_bytes: usize,
}

/// List the records of a stream.
///
/// Code tables are parsed (and therefore validated); payloads are not
/// decoded.
pub fn inspect(data: &[u8]) -> Result<Vec<RecordSummary>> {
    let mut reader = FieldReader::new(data);
    let mut summaries = Vec::new();

    loop {
        let offset = reader.position();
        let Some(record) = BlockRecord::read_from(&mut reader)? else {
            break;
        };
        let table = CodeTable::deserialize(&record.table)
            .map_err(|e| e.in_block(record.block_number, Stage::Huffman))?;
        summaries.push(RecordSummary {
            offset,
            block_number: record.block_number,
            chunks: record.chunk_indices.len(),
            table_symbols: table.len(),
            max_code_len: table.max_len(),
            table_bytes: record.table.len(),
            payload_bytes: record.payload.len(),
            record_bytes: (reader.position() - offset) as usize,
        });
    }

    Ok(summaries)
}
