//! Codec configuration.
//!
//! All tunables are carried in an explicit [`CodecConfig`] value that is
//! passed into the encoder and decoder. The stream itself does not record the
//! chunk size, so both sides must agree on it.

use crate::error::{BwtPackError, Result};
use serde::{Deserialize, Serialize};

/// Default block size (200 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 200 * 1024;

/// Default BWT chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Largest accepted block size (64 MiB).
pub const MAX_BLOCK_SIZE: usize = 64 * 1024 * 1024;

/// Largest accepted chunk size (1 MiB).
///
/// The forward BWT sorts full rotations, so chunks far beyond a few KiB are
/// slow; this bound only keeps the index field and sort cost sane.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Block and chunk sizes used by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum number of input bytes per block.
    pub block_size: usize,
    /// Maximum number of bytes per BWT chunk.
    pub chunk_size: usize,
}

impl CodecConfig {
    /// Create a configuration, validating both sizes.
    pub fn new(block_size: usize, chunk_size: usize) -> Result<Self> {
        let config = Self {
            block_size,
            chunk_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Return a copy with a different block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Return a copy with a different chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Check that both sizes are in range.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(BwtPackError::invalid_config(format!(
                "block size {} outside 1..={}",
                self.block_size, MAX_BLOCK_SIZE
            )));
        }
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(BwtPackError::invalid_config(format!(
                "chunk size {} outside 1..={}",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        Ok(())
    }

    /// Number of BWT chunks a block of `len` bytes splits into.
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size.max(1))
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
