//! Reassembly of decoded blocks by block number.

use crate::block::MIN_RECORD_SIZE;
use bwtpack_core::error::{BwtPackError, Result};

/// Indexed container of decoded blocks.
///
/// Blocks may arrive in any order. A block number seen twice is an error,
/// as is any gap left once the stream is exhausted.
#[derive(Debug, Default)]
pub struct BlockAssembler {
    slots: Vec<Option<Vec<u8>>>,
    max_blocks: usize,
    filled: usize,
}

impl BlockAssembler {
    /// Create an assembler that accepts block numbers below `max_blocks`.
    ///
    /// A stream of `n` bytes holds at most `n / MIN_RECORD_SIZE` records, so
    /// decoders pass that bound to reject absurd block numbers before
    /// allocating slots for them.
    pub fn new(max_blocks: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_blocks,
            filled: 0,
        }
    }

    /// Create an assembler bounded by a record stream of `len` bytes.
    pub fn for_stream(len: u64) -> Self {
        Self::new((len / MIN_RECORD_SIZE as u64) as usize)
    }

    /// Number of blocks inserted so far.
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Whether no block has been inserted.
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Store the decoded bytes of `block_number`, read from the record at
    /// stream offset `offset`.
    pub fn insert(&mut self, block_number: u32, offset: u64, data: Vec<u8>) -> Result<()> {
        let index = block_number as usize;
        if index >= self.max_blocks {
            return Err(BwtPackError::malformed(
                offset,
                format!(
                    "block number {} out of range for a stream of at most {} records",
                    block_number, self.max_blocks
                ),
            ));
        }

        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }

        let slot = &mut self.slots[index];
        if slot.is_some() {
            return Err(BwtPackError::duplicate_block(block_number));
        }
        *slot = Some(data);
        self.filled += 1;
        Ok(())
    }

    /// Concatenate all blocks in ascending block-number order.
    pub fn finish(self) -> Result<Vec<u8>> {
        let total: usize = self.slots.iter().flatten().map(Vec::len).sum();
        let mut output = Vec::with_capacity(total);

        for (index, slot) in self.slots.into_iter().enumerate() {
            match slot {
                Some(data) => output.extend_from_slice(&data),
                None => return Err(BwtPackError::missing_block(index as u32)),
            }
        }

        Ok(output)
    }
}
