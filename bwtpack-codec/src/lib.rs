//! Block-sorting compression for bwtpack.
//!
//! Each block of input passes through a pipeline of four invertible
//! transformations:
//! 1. Burrows-Wheeler Transform (BWT) - applied per fixed-size chunk
//! 2. Move-to-Front Transform (MTF) - one alphabet per block
//! 3. Run-Length Encoding (RLE) - repeat and literal tokens
//! 4. Huffman Coding - one transmitted code table per block
//!
//! Every block becomes a self-contained, length-prefixed record carrying its
//! block number, so records can be decoded independently and reassembled in
//! block-number order.
//!
//! ```
//! use bwtpack_codec::{CodecConfig, compress, decompress};
//!
//! let config = CodecConfig::default();
//! let data = b"banana bandana banana bandana";
//! let stream = compress(data, &config).unwrap();
//! assert_eq!(decompress(&stream, &config).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod block;
/// Burrows-Wheeler Transform implementation.
pub mod bwt;
mod decode;
mod encode;
pub mod huffman;
pub mod mtf;
pub mod rle;
pub mod stats;

pub use assemble::BlockAssembler;
pub use block::{BlockCodec, BlockRecord};
pub use bwtpack_core::config::{CodecConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE};
pub use bwtpack_core::error::{BwtPackError, Result, Stage};
pub use decode::{Decoder, RecordSummary, decompress, decompress_from_reader, inspect};
pub use encode::{Encoder, compress, compress_to_writer};

#[cfg(feature = "parallel")]
pub use decode::decompress_parallel;
#[cfg(feature = "parallel")]
pub use encode::compress_parallel;
