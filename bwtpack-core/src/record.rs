//! Big-endian field access for length-prefixed records.
//!
//! [`FieldReader`] pulls fields from any [`Read`] source and turns every short
//! read into a [`BwtPackError::MalformedRecord`] that names the field and the
//! absolute stream offset. [`FieldWriter`] is the matching append-only writer.

use crate::error::{BwtPackError, Result};
use std::io::Read;

/// Cursor over a record stream.
#[derive(Debug)]
pub struct FieldReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> FieldReader<R> {
    /// Create a reader positioned at the start of `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Current byte offset.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Return the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read up to `len` bytes; fewer only at end of stream.
    ///
    /// The buffer grows with the bytes actually present, so a corrupt length
    /// never causes a large allocation on its own.
    fn fill(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn short_read(&self, field: &str, len: usize, got: usize) -> BwtPackError {
        BwtPackError::malformed(
            self.pos,
            format!("{} needs {} bytes, only {} remain", field, len, got),
        )
    }

    /// Read exactly `len` bytes for the named field.
    pub fn read_bytes(&mut self, len: usize, field: &str) -> Result<Vec<u8>> {
        let buf = self.fill(len)?;
        if buf.len() < len {
            return Err(self.short_read(field, len, buf.len()));
        }
        self.pos += len as u64;
        Ok(buf)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self, field: &str) -> Result<u32> {
        let bytes = self.read_bytes(4, field)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a big-endian `u32`, or `None` if the stream ends cleanly first.
    pub fn read_u32_or_eof(&mut self, field: &str) -> Result<Option<u32>> {
        let bytes = self.fill(4)?;
        match bytes.len() {
            0 => Ok(None),
            4 => {
                self.pos += 4;
                Ok(Some(u32::from_be_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3],
                ])))
            }
            got => Err(self.short_read(field, 4, got)),
        }
    }

    /// Read a big-endian `u32` length followed by that many bytes.
    pub fn read_prefixed(&mut self, field: &str) -> Result<Vec<u8>> {
        let len = self.read_u32(field)? as usize;
        self.read_bytes(len, field)
    }
}

/// Append-only big-endian writer.
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append a big-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a big-endian `u32` length followed by `bytes`.
    ///
    /// Fails if `bytes` is longer than a `u32` can describe.
    pub fn put_prefixed(&mut self, bytes: &[u8], field: &str) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            BwtPackError::malformed(
                self.buf.len() as u64,
                format!("{} of {} bytes exceeds u32 length prefix", field, bytes.len()),
            )
        })?;
        self.put_u32(len);
        self.put_bytes(bytes);
        Ok(())
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
