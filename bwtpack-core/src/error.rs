//! Error types for bwtpack operations.
//!
//! Every decoding stage reports its own error kind. When a stage fails while
//! a block is being decoded, the block codec wraps the stage error in
//! [`BwtPackError::Block`] so callers can see which block and which stage
//! failed.

use std::fmt;
use std::io;
use thiserror::Error;

/// Pipeline stage that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parsing the length-prefixed block record.
    Record,
    /// Huffman decoding of the payload.
    Huffman,
    /// Run-length token decoding.
    Rle,
    /// Inverse Burrows-Wheeler Transform.
    Bwt,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Record => "record",
            Stage::Huffman => "huffman",
            Stage::Rle => "rle",
            Stage::Bwt => "bwt",
        };
        f.write_str(name)
    }
}

/// The main error type for bwtpack operations.
#[derive(Debug, Error)]
pub enum BwtPackError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A length-prefixed record field is truncated or inconsistent.
    #[error("Malformed record at offset {offset}: {message}")]
    MalformedRecord {
        /// Byte offset in the stream where the problem was detected.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// A run-length token declares more bytes than remain.
    #[error("Invalid RLE token at offset {offset}: {message}")]
    InvalidRleToken {
        /// Offset of the control byte within the token stream.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// The Huffman payload or code table cannot be decoded.
    #[error("Invalid Huffman stream at bit {bit_position}: {message}")]
    InvalidHuffmanStream {
        /// Bit position where decoding stopped.
        bit_position: u64,
        /// Description of the problem.
        message: String,
    },

    /// A BWT permutation index lies outside its chunk.
    #[error("Invalid BWT index {index} for chunk of {chunk_len} bytes")]
    InvalidBwtIndex {
        /// The stored permutation index.
        index: u32,
        /// Length of the chunk it refers to.
        chunk_len: usize,
    },

    /// The same block number appeared twice in one stream.
    #[error("Duplicate block number {block}")]
    DuplicateBlockNumber {
        /// The repeated block number.
        block: u32,
    },

    /// A block number below the highest one seen never appeared.
    #[error("Missing block number {block}")]
    MissingBlock {
        /// The absent block number.
        block: u32,
    },

    /// Codec configuration is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// A stage failed while decoding a specific block.
    #[error("Block {block} failed in {stage} stage: {source}")]
    Block {
        /// Block number of the failing record.
        block: u32,
        /// Stage that failed.
        stage: Stage,
        /// The underlying stage error.
        #[source]
        source: Box<BwtPackError>,
    },
}

/// Result type alias for bwtpack operations.
pub type Result<T> = std::result::Result<T, BwtPackError>;

impl BwtPackError {
    /// Create a malformed record error.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid RLE token error.
    pub fn invalid_rle(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidRleToken {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid Huffman stream error.
    pub fn invalid_huffman(bit_position: u64, message: impl Into<String>) -> Self {
        Self::InvalidHuffmanStream {
            bit_position,
            message: message.into(),
        }
    }

    /// Create an invalid BWT index error.
    pub fn invalid_bwt_index(index: u32, chunk_len: usize) -> Self {
        Self::InvalidBwtIndex { index, chunk_len }
    }

    /// Create a duplicate block number error.
    pub fn duplicate_block(block: u32) -> Self {
        Self::DuplicateBlockNumber { block }
    }

    /// Create a missing block error.
    pub fn missing_block(block: u32) -> Self {
        Self::MissingBlock { block }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Attach block number and stage to a stage error.
    pub fn in_block(self, block: u32, stage: Stage) -> Self {
        Self::Block {
            block,
            stage,
            source: Box::new(self),
        }
    }

    /// The error with any block/stage context removed.
    pub fn root(&self) -> &BwtPackError {
        match self {
            Self::Block { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage that failed, if this error carries block context.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Block { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
