//! Bit-level I/O for the Huffman stage.
//!
//! This module provides `BitWriter` and `BitReader` for packing and unpacking
//! variable-length codes.
//!
//! # Bit Ordering
//!
//! Codes are packed MSB-first: the first bit written lands in the most
//! significant bit of the first byte. The final partial byte is padded with
//! zero bits, and the number of padding bits is reported so it can be stored
//! alongside the data.
//!
//! # Example
//!
//! ```
//! use bwtpack_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b1100, 4).unwrap();
//! let (output, pad) = writer.finish().unwrap();
//! assert_eq!(output, vec![0b1011_1000]);
//! assert_eq!(pad, 1);
//!
//! let mut reader = BitReader::new(&output, 7);
//! let bits: Vec<bool> = std::iter::from_fn(|| reader.read_bit()).collect();
//! assert_eq!(bits, [true, false, true, true, true, false, false]);
//! ```

use crate::error::Result;
use std::io::Write;

/// A bit-level writer that wraps any `Write` implementation.
///
/// Bits accumulate in a 64-bit buffer and complete bytes are written through
/// to the underlying writer. Call [`BitWriter::finish`] to emit the final
/// zero-padded byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Bit buffer, filled from the least significant end.
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Write complete bytes from the buffer to the writer.
    #[inline]
    fn flush_bytes(&mut self) -> Result<()> {
        while self.bits_in_buffer >= 8 {
            let shift = self.bits_in_buffer - 8;
            let byte = (self.buffer >> shift) as u8;
            self.writer.write_all(&[byte])?;
            self.bits_in_buffer -= 8;
            self.buffer &= (1u64 << self.bits_in_buffer).wrapping_sub(1);
        }
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write, right-aligned
    /// * `count` - Number of bits to write (0-56)
    #[inline]
    pub fn write_bits(&mut self, value: u64, count: u8) -> Result<()> {
        debug_assert!(count <= 56, "Cannot write more than 56 bits at once");

        if count == 0 {
            return Ok(());
        }

        let value = value & (1u64 << count).wrapping_sub(1);
        self.buffer = (self.buffer << count) | value;
        self.bits_in_buffer += count;

        self.flush_bytes()
    }

    /// Write a code of up to 64 bits, splitting it when it is too wide for
    /// a single buffered write.
    pub fn write_code(&mut self, value: u64, count: u8) -> Result<()> {
        if count > 32 {
            let low = count - 32;
            self.write_bits(value >> low, 32)?;
            self.write_bits(value, low)
        } else {
            self.write_bits(value, count)
        }
    }

    /// Number of zero bits [`finish`](Self::finish) will append.
    pub fn pending_pad(&self) -> u8 {
        (8 - self.bits_in_buffer % 8) % 8
    }

    /// Pad the last byte with zero bits, write it, and return the writer
    /// together with the number of padding bits (0-7).
    pub fn finish(mut self) -> Result<(W, u8)> {
        let pad = self.pending_pad();
        if pad > 0 {
            self.buffer <<= pad;
            self.bits_in_buffer += pad;
            self.flush_bytes()?;
        }
        self.writer.flush()?;
        Ok((self.writer, pad))
    }
}

/// A bit-level reader over an in-memory byte slice.
///
/// Reading stops after `bit_len` bits, which lets the caller exclude the
/// padding bits of the final byte.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_len: u64,
    position: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_len` bits of `data`.
    ///
    /// `bit_len` is clamped to the number of bits actually present.
    pub fn new(data: &'a [u8], bit_len: u64) -> Self {
        Self {
            data,
            bit_len: bit_len.min(data.len() as u64 * 8),
            position: 0,
        }
    }

    /// Current bit position (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.position
    }

    /// Whether every bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.position >= self.bit_len
    }

    /// Read a single bit, or `None` at the end of the stream.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        let byte = self.data[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1;
        self.position += 1;
        Some(bit == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(reader: &mut BitReader<'_>) -> Vec<u8> {
        std::iter::from_fn(|| reader.read_bit())
            .map(|bit| bit as u8)
            .collect()
    }

    #[test]
    fn test_write_msb_first() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(0, 6).unwrap();
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(0b11, 2).unwrap();
        assert_eq!(writer.pending_pad(), 6);

        let (output, pad) = writer.finish().unwrap();
        assert_eq!(output, vec![0b1000_0001, 0b1100_0000]);
        assert_eq!(pad, 6);
    }

    #[test]
    fn test_aligned_output_has_no_pad() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(0xABCD, 16).unwrap();
        let (output, pad) = writer.finish().unwrap();
        assert_eq!(output, vec![0xAB, 0xCD]);
        assert_eq!(pad, 0);
    }

    #[test]
    fn test_wide_code() {
        let value = 0x8000_0000_0000_0001u64;
        let mut writer = BitWriter::new(Vec::new());
        writer.write_code(value, 64).unwrap();
        let (output, _) = writer.finish().unwrap();
        assert_eq!(output, value.to_be_bytes().to_vec());

        let mut reader = BitReader::new(&output, 64);
        let bits = read_all(&mut reader);
        assert_eq!(bits.len(), 64);
        assert_eq!(bits[0], 1);
        assert_eq!(bits[63], 1);
        assert_eq!(bits.iter().map(|&b| b as u32).sum::<u32>(), 2);
    }

    #[test]
    fn test_reader_respects_bit_len() {
        let data = [0b1010_0000];
        let mut reader = BitReader::new(&data, 3);
        assert_eq!(read_all(&mut reader), vec![1, 0, 1]);
        assert!(reader.is_empty());
        assert_eq!(reader.bit_position(), 3);
    }

    #[test]
    fn test_reader_clamps_bit_len() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data, 100);
        assert_eq!(read_all(&mut reader).len(), 8);
    }
}
