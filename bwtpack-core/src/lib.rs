//! # bwtpack core
//!
//! Core components shared by the bwtpack codec and command-line tool.
//!
//! - [`bitstream`]: MSB-first bit I/O for Huffman codes
//! - [`record`]: big-endian, length-prefixed record fields
//! - [`config`]: block and chunk size configuration
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ CLI: compress / decompress / test / info / entropy      │
//! ├─────────────────────────────────────────────────────────┤
//! │ File codec: blocks, records, reassembly by block number │
//! ├─────────────────────────────────────────────────────────┤
//! │ Block codec: BWT (per chunk) → MTF → RLE → Huffman      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate): bit I/O, record fields, config       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bwtpack_core::config::CodecConfig;
//! use bwtpack_core::record::{FieldReader, FieldWriter};
//!
//! let config = CodecConfig::new(64 * 1024, 1024).unwrap();
//! assert_eq!(config.chunk_count(2500), 3);
//!
//! let mut writer = FieldWriter::new();
//! writer.put_u32(7);
//! let bytes = writer.into_inner();
//! assert_eq!(FieldReader::new(&bytes[..]).read_u32("block number").unwrap(), 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod config;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use config::CodecConfig;
pub use error::{BwtPackError, Result, Stage};
pub use record::{FieldReader, FieldWriter};

