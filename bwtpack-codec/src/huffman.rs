//! Huffman coding of the RLE token stream.
//!
//! One code table is built per block from the byte frequencies of that
//! block's RLE output. The table is transmitted with the block, so the
//! decoder never rebuilds the tree and tie-breaking while merging nodes has
//! no effect on decoding.
//!
//! Payload layout: one byte holding the number of zero padding bits (0-7),
//! followed by the codes packed MSB-first. An empty input gives an empty
//! payload.
//!
//! Table layout, repeated per symbol in ascending symbol order: symbol byte,
//! code length in bits, packed length in bytes, then the code value as a
//! right-aligned big-endian integer.

use bwtpack_core::bitstream::{BitReader, BitWriter};
use bwtpack_core::error::{BwtPackError, Result};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Longest code this implementation can represent.
pub const MAX_CODE_LEN: u8 = 64;

/// A single prefix code: the low `len` bits of `bits`, MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    /// Code value, right-aligned.
    pub bits: u64,
    /// Number of significant bits.
    pub len: u8,
}

impl Code {
    /// Number of bytes needed to store the code value.
    pub fn packed_len(&self) -> usize {
        (self.len as usize).div_ceil(8)
    }

    /// Code value as `packed_len()` big-endian bytes.
    pub fn packed_bytes(&self) -> Vec<u8> {
        let bytes = self.bits.to_be_bytes();
        bytes[8 - self.packed_len()..].to_vec()
    }

    /// Whether `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && shr(other.bits, other.len - self.len) == self.bits
    }

    fn child(&self, bit: u64) -> Code {
        Code {
            bits: (self.bits << 1) | bit,
            len: self.len + 1,
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in (0..self.len).rev() {
            let bit = (self.bits >> i) & 1;
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

#[inline]
fn shr(value: u64, shift: u8) -> u64 {
    if shift >= 64 { 0 } else { value >> shift }
}

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf(u8),
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    freq: u64,
    kind: NodeKind,
}

/// Count occurrences of every byte value.
pub fn count_frequencies(data: &[u8]) -> [u64; 256] {
    let mut freqs = [0u64; 256];
    for &byte in data {
        freqs[byte as usize] += 1;
    }
    freqs
}

/// Mapping from byte value to prefix code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl Default for CodeTable {
    fn default() -> Self {
        Self {
            codes: vec![None; 256],
        }
    }
}

impl CodeTable {
    /// An empty table (no symbols).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table for `data`.
    pub fn build(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&count_frequencies(data))
    }

    /// Build a table from byte frequencies.
    ///
    /// Nodes live in an arena; the two lowest-frequency nodes are merged
    /// with the first one removed as the left child. A single symbol gets
    /// the one-bit code `0`.
    pub fn from_frequencies(freqs: &[u64; 256]) -> Result<Self> {
        let mut arena: Vec<Node> = Vec::with_capacity(511);
        let mut heap = BinaryHeap::new();

        for (symbol, &freq) in freqs.iter().enumerate() {
            if freq > 0 {
                heap.push(Reverse((freq, arena.len())));
                arena.push(Node {
                    freq,
                    kind: NodeKind::Leaf(symbol as u8),
                });
            }
        }

        let mut table = Self::new();
        if arena.is_empty() {
            return Ok(table);
        }

        while let (Some(Reverse((_, left))), Some(Reverse((_, right)))) = (heap.pop(), heap.pop())
        {
            let freq = arena[left].freq + arena[right].freq;
            heap.push(Reverse((freq, arena.len())));
            arena.push(Node {
                freq,
                kind: NodeKind::Internal { left, right },
            });
        }

        // The last node pushed is the root
        let root = arena.len() - 1;
        let mut stack = vec![(root, Code { bits: 0, len: 0 })];

        while let Some((index, code)) = stack.pop() {
            match arena[index].kind {
                NodeKind::Leaf(symbol) => {
                    let code = if code.len == 0 {
                        Code { bits: 0, len: 1 }
                    } else {
                        code
                    };
                    table.codes[symbol as usize] = Some(code);
                }
                NodeKind::Internal { left, right } => {
                    if code.len >= MAX_CODE_LEN {
                        return Err(BwtPackError::invalid_huffman(
                            0,
                            format!("code length exceeds {} bits", MAX_CODE_LEN),
                        ));
                    }
                    stack.push((right, code.child(1)));
                    stack.push((left, code.child(0)));
                }
            }
        }

        Ok(table)
    }

    /// Code for `symbol`, if present.
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Whether the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Iterate `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|c| (symbol as u8, c)))
    }

    /// Longest code length in the table.
    pub fn max_len(&self) -> u8 {
        self.iter().map(|(_, c)| c.len).max().unwrap_or(0)
    }

    /// Serialize as `symbol, bit length, byte length, packed bytes` entries.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (symbol, code) in self.iter() {
            out.push(symbol);
            out.push(code.len);
            out.push(code.packed_len() as u8);
            out.extend_from_slice(&code.packed_bytes());
        }
        out
    }

    /// Parse and validate a serialized table.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut table = Self::new();
        let mut i = 0;

        while i < data.len() {
            let bit_pos = (i as u64) * 8;
            if i + 3 > data.len() {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    "code table entry header truncated",
                ));
            }
            let symbol = data[i];
            let len = data[i + 1];
            let byte_len = data[i + 2] as usize;
            i += 3;

            if len == 0 || len > MAX_CODE_LEN {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    format!("symbol {} has unsupported code length {}", symbol, len),
                ));
            }
            if byte_len != (len as usize).div_ceil(8) {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    format!(
                        "symbol {} stores {} bytes for a {}-bit code",
                        symbol, byte_len, len
                    ),
                ));
            }
            if i + byte_len > data.len() {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    "code table entry truncated",
                ));
            }

            let bits = data[i..i + byte_len]
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64);
            i += byte_len;

            if len < 64 && bits >> len != 0 {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    format!("symbol {} code value does not fit {} bits", symbol, len),
                ));
            }
            if table.codes[symbol as usize].is_some() {
                return Err(BwtPackError::invalid_huffman(
                    bit_pos,
                    format!("symbol {} appears twice", symbol),
                ));
            }
            table.codes[symbol as usize] = Some(Code { bits, len });
        }

        table.check_prefix_free()?;
        Ok(table)
    }

    /// Fail if any code is a prefix of another.
    pub fn check_prefix_free(&self) -> Result<()> {
        let entries: Vec<(u8, Code)> = self.iter().collect();
        for (a, (sym_a, code_a)) in entries.iter().enumerate() {
            for (sym_b, code_b) in &entries[a + 1..] {
                if code_a.is_prefix_of(code_b) || code_b.is_prefix_of(code_a) {
                    return Err(BwtPackError::invalid_huffman(
                        0,
                        format!(
                            "codes for symbols {} and {} are not prefix-free",
                            sym_a, sym_b
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Total number of payload bits needed for the given frequencies.
    pub fn encoded_bits(&self, freqs: &[u64; 256]) -> u64 {
        self.iter()
            .map(|(symbol, code)| freqs[symbol as usize] * code.len as u64)
            .sum()
    }
}

/// Pack `data` with `table`.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = BitWriter::new(vec![0u8]);
    for (pos, &byte) in data.iter().enumerate() {
        let code = table.get(byte).ok_or_else(|| {
            BwtPackError::invalid_huffman(
                pos as u64,
                format!("no code for symbol {}", byte),
            )
        })?;
        writer.write_code(code.bits, code.len)?;
    }

    let (mut output, pad) = writer.finish()?;
    output[0] = pad;
    Ok(output)
}

/// Unpack a payload produced by [`encode`].
pub fn decode(payload: &[u8], table: &CodeTable) -> Result<Vec<u8>> {
    let Some((&pad, body)) = payload.split_first() else {
        return Ok(Vec::new());
    };

    if pad > 7 {
        return Err(BwtPackError::invalid_huffman(
            0,
            format!("pad length {} exceeds 7", pad),
        ));
    }
    if body.is_empty() {
        return Err(BwtPackError::invalid_huffman(
            0,
            "pad byte with no data bytes",
        ));
    }

    let bit_len = body.len() as u64 * 8 - pad as u64;
    if let Some(&last) = body.last() {
        let pad_mask = (1u16 << pad) as u8 - 1;
        if last & pad_mask != 0 {
            return Err(BwtPackError::invalid_huffman(
                bit_len,
                "padding bits are not zero",
            ));
        }
    }

    let lookup: HashMap<Code, u8> = table.iter().map(|(symbol, code)| (code, symbol)).collect();
    let max_len = table.max_len();
    let mut reader = BitReader::new(body, bit_len);
    let mut output = Vec::with_capacity(body.len() * 2);
    let mut current = Code { bits: 0, len: 0 };

    while let Some(bit) = reader.read_bit() {
        current = current.child(bit as u64);
        if let Some(&symbol) = lookup.get(&current) {
            output.push(symbol);
            current = Code { bits: 0, len: 0 };
        } else if current.len >= max_len {
            return Err(BwtPackError::invalid_huffman(
                reader.bit_position(),
                "bit sequence matches no code",
            ));
        }
    }

    if current.len > 0 {
        return Err(BwtPackError::invalid_huffman(
            reader.bit_position(),
            format!("stream ends inside a {}-bit partial code", current.len),
        ));
    }

    Ok(output)
}

/// Build a table for `data` and pack it.
pub fn compress(data: &[u8]) -> Result<(CodeTable, Vec<u8>)> {
    let table = CodeTable::build(data)?;
    let payload = encode(data, &table)?;
    Ok((table, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(data: &[u8]) {
        let (table, payload) = compress(data).unwrap();
        let serialized = table.serialize();
        let parsed = CodeTable::deserialize(&serialized).unwrap();
        assert_eq!(parsed, table);
        assert_eq!(decode(&payload, &parsed).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let (table, payload) = compress(b"").unwrap();
        assert!(table.is_empty());
        assert!(payload.is_empty());
        assert!(table.serialize().is_empty());
        assert!(decode(&payload, &table).unwrap().is_empty());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let (table, payload) = compress(&[42; 10]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(42), Some(Code { bits: 0, len: 1 }));
        // 10 zero bits padded to 16
        assert_eq!(payload, vec![6, 0, 0]);
        assert_eq!(decode(&payload, &table).unwrap(), vec![42; 10]);
    }

    #[test]
    fn test_single_occurrence_single_symbol() {
        assert_roundtrip(&[7]);
    }

    #[test]
    fn test_two_symbols() {
        let data = b"abbb";
        let (table, payload) = compress(data).unwrap();
        // 'a' is removed first and becomes the left child
        assert_eq!(table.get(b'a'), Some(Code { bits: 0, len: 1 }));
        assert_eq!(table.get(b'b'), Some(Code { bits: 1, len: 1 }));
        assert_eq!(payload, vec![4, 0b0111_0000]);
        assert_eq!(decode(&payload, &table).unwrap(), data);
    }

    #[test]
    fn test_frequent_symbols_get_short_codes() {
        let mut data = vec![0u8; 100];
        data.extend_from_slice(&[1; 50]);
        data.extend_from_slice(&[2; 25]);
        data.extend_from_slice(&[3; 10]);
        let table = CodeTable::build(&data).unwrap();
        let len = |s| table.get(s).unwrap().len;
        assert!(len(0) <= len(1));
        assert!(len(1) <= len(2));
        assert!(len(2) <= len(3));
        assert!(table.check_prefix_free().is_ok());
    }

    #[test]
    fn test_roundtrip_text_and_all_bytes() {
        assert_roundtrip(b"the quick brown fox jumps over the lazy dog");
        let all: Vec<u8> = (0..=255u8).collect();
        assert_roundtrip(&all);
    }

    #[test]
    fn test_skewed_frequencies_long_codes() {
        // Fibonacci weights give the deepest possible tree
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat_n(symbol, a));
            (a, b) = (b, a + b);
        }
        let table = CodeTable::build(&data).unwrap();
        assert_eq!(table.max_len(), 19);
        assert_roundtrip(&data);
    }

    #[test]
    fn test_code_display_and_packing() {
        let code = Code {
            bits: 0b1_0000_0001,
            len: 9,
        };
        assert_eq!(code.to_string(), "100000001");
        assert_eq!(code.packed_bytes(), vec![0x01, 0x01]);
        assert!(Code { bits: 0b10, len: 2 }.is_prefix_of(&Code { bits: 0b101, len: 3 }));
        assert!(!Code { bits: 0b11, len: 2 }.is_prefix_of(&Code { bits: 0b101, len: 3 }));
    }

    #[test]
    fn test_rejects_bad_pad() {
        let table = CodeTable::build(b"ab").unwrap();
        assert!(matches!(
            decode(&[8, 0], &table).unwrap_err(),
            BwtPackError::InvalidHuffmanStream { .. }
        ));
        assert!(decode(&[3], &table).is_err());
        // A pad byte alone never comes out of the encoder
        assert!(matches!(
            decode(&[0], &table).unwrap_err(),
            BwtPackError::InvalidHuffmanStream { bit_position: 0, .. }
        ));
        // Nonzero padding bits
        assert!(decode(&[1, 0b0000_0001], &table).is_err());
    }

    #[test]
    fn test_rejects_unmatched_bits() {
        // Codes "0" and "10"; nothing starts with "11"
        let table = CodeTable::deserialize(&[1, 1, 1, 0, 2, 2, 1, 0b10]).unwrap();
        let err = decode(&[6, 0b1100_0000], &table).unwrap_err();
        assert!(matches!(
            err,
            BwtPackError::InvalidHuffmanStream { bit_position: 2, .. }
        ));

        // Stream ends after the first bit of "10"
        assert!(decode(&[7, 0b1000_0000], &table).is_err());
        assert_eq!(decode(&[5, 0b0100_0000], &table).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_empty_table_rejects_data() {
        assert!(decode(&[0, 0xFF], &CodeTable::new()).is_err());
    }

    #[test]
    fn test_deserialize_rejects_malformed_tables() {
        // Truncated header
        assert!(CodeTable::deserialize(&[1, 1]).is_err());
        // Zero-length code
        assert!(CodeTable::deserialize(&[1, 0, 0]).is_err());
        // Byte length disagrees with bit length
        assert!(CodeTable::deserialize(&[1, 3, 2, 0, 1]).is_err());
        // Value wider than its bit length
        assert!(CodeTable::deserialize(&[1, 1, 1, 2]).is_err());
        // Duplicate symbol
        assert!(CodeTable::deserialize(&[1, 1, 1, 0, 1, 1, 1, 1]).is_err());
        // "0" is a prefix of "01"
        assert!(CodeTable::deserialize(&[1, 1, 1, 0, 2, 2, 1, 1]).is_err());
        // Well-formed two-symbol table
        let table = CodeTable::deserialize(&[1, 1, 1, 0, 2, 1, 1, 1]).unwrap();
        assert_eq!(table.len(), 2);
    }
}
