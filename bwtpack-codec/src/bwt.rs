//! Burrows-Wheeler Transform over fixed-size chunks.
//!
//! Each block is cut into chunks of at most `chunk_size` bytes and every chunk
//! is transformed on its own. A chunk's permutation index is the sorted rank
//! of the rotation equal to the chunk itself; when several rotations are equal
//! (periodic chunks) the lowest such rank is stored.

use bwtpack_core::config::CodecConfig;
use bwtpack_core::error::{BwtPackError, Result};
use std::cmp::Ordering;

/// Compare rotations `a` and `b` of `data` over their full length.
fn compare_rotations(data: &[u8], a: usize, b: usize) -> Ordering {
    let n = data.len();
    for i in 0..n {
        let byte_a = data[(a + i) % n];
        let byte_b = data[(b + i) % n];
        match byte_a.cmp(&byte_b) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Transform one chunk.
/// Returns the transformed bytes and the permutation index.
pub fn transform(data: &[u8]) -> (Vec<u8>, u32) {
    if data.is_empty() {
        return (Vec::new(), 0);
    }

    let n = data.len();
    let mut indices: Vec<usize> = (0..n).collect();

    if n > 8 {
        // Presort on the first 4 bytes of each rotation, fall back to the
        // full rotation only when the keys collide
        let key_len = n.min(4);
        let keys: Vec<u32> = (0..n)
            .map(|i| (0..key_len).fold(0u32, |key, j| (key << 8) | data[(i + j) % n] as u32))
            .collect();

        indices.sort_by(|&a, &b| match keys[a].cmp(&keys[b]) {
            Ordering::Equal => compare_rotations(data, a, b),
            other => other,
        });
    } else {
        indices.sort_by(|&a, &b| compare_rotations(data, a, b));
    }

    // sort_by is stable, so rotation 0 precedes every rotation equal to it
    let mut orig_ptr = 0u32;
    let mut transformed = Vec::with_capacity(n);
    for (rank, &i) in indices.iter().enumerate() {
        if i == 0 {
            orig_ptr = rank as u32;
        }
        transformed.push(data[(i + n - 1) % n]);
    }

    (transformed, orig_ptr)
}

/// Invert one chunk.
///
/// Pairs each transformed byte with its position, orders the pairs by
/// (byte, position) and follows the positions starting from `orig_ptr`.
pub fn inverse_transform(data: &[u8], orig_ptr: u32) -> Result<Vec<u8>> {
    let n = data.len();
    if orig_ptr as usize >= n {
        return Err(BwtPackError::invalid_bwt_index(orig_ptr, n));
    }

    // Counting sort by byte value keeps equal bytes in ascending position
    let mut counts = [0usize; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let mut starts = [0usize; 256];
    let mut total = 0;
    for (start, &count) in starts.iter_mut().zip(counts.iter()) {
        *start = total;
        total += count;
    }

    // next[row] is the position column of sorted row `row`
    let mut next = vec![0usize; n];
    for (i, &byte) in data.iter().enumerate() {
        next[starts[byte as usize]] = i;
        starts[byte as usize] += 1;
    }

    let mut result = Vec::with_capacity(n);
    let mut row = orig_ptr as usize;
    for _ in 0..n {
        let pos = next[row];
        result.push(data[pos]);
        row = pos;
    }

    Ok(result)
}

/// Transform every chunk of a block.
/// Returns the concatenated transformed chunks and their indices in order.
pub fn transform_block(block: &[u8], config: &CodecConfig) -> (Vec<u8>, Vec<u32>) {
    let mut output = Vec::with_capacity(block.len());
    let mut indices = Vec::with_capacity(config.chunk_count(block.len()));

    for chunk in block.chunks(config.chunk_size.max(1)) {
        let (transformed, orig_ptr) = transform(chunk);
        output.extend_from_slice(&transformed);
        indices.push(orig_ptr);
    }

    (output, indices)
}

/// Invert every chunk of a block, re-splitting `data` by the configured
/// chunk size.
pub fn inverse_block(data: &[u8], indices: &[u32], config: &CodecConfig) -> Result<Vec<u8>> {
    let expected = config.chunk_count(data.len());
    if indices.len() != expected {
        return Err(BwtPackError::malformed(
            0,
            format!(
                "{} chunk indices for {} bytes at chunk size {} (expected {})",
                indices.len(),
                data.len(),
                config.chunk_size,
                expected
            ),
        ));
    }

    let mut output = Vec::with_capacity(data.len());
    for (chunk, &orig_ptr) in data.chunks(config.chunk_size.max(1)).zip(indices) {
        output.extend_from_slice(&inverse_transform(chunk, orig_ptr)?);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(chunk_size: usize) -> CodecConfig {
        CodecConfig::new(1 << 16, chunk_size).unwrap()
    }

    #[test]
    fn test_bwt_empty() {
        let (transformed, ptr) = transform(b"");
        assert!(transformed.is_empty());
        assert_eq!(ptr, 0);
    }

    #[test]
    fn test_bwt_single() {
        let (transformed, ptr) = transform(b"a");
        assert_eq!(transformed, b"a");
        assert_eq!(ptr, 0);
        assert_eq!(inverse_transform(&transformed, ptr).unwrap(), b"a");
    }

    #[test]
    fn test_bwt_banana() {
        // Sorted rotations: abanan, anaban, ananab, banana, nabana, nanaba
        let (transformed, ptr) = transform(b"banana");
        assert_eq!(transformed, b"nnbaaa");
        assert_eq!(ptr, 3);
        assert_eq!(inverse_transform(&transformed, ptr).unwrap(), b"banana");
    }

    #[test]
    fn test_chunks_are_transformed_independently() {
        // Two chunks of "banana" each get their own index and output
        let config = chunked(6);
        let (transformed, indices) = transform_block(b"bananabanana", &config);
        assert_eq!(transformed, b"nnbaaannbaaa");
        assert_eq!(indices, vec![3, 3]);
        assert_eq!(
            inverse_block(&transformed, &indices, &config).unwrap(),
            b"bananabanana"
        );
    }

    #[test]
    fn test_one_byte_chunks_are_identity() {
        let config = chunked(1);
        let (transformed, indices) = transform_block(b"mississippi", &config);
        assert_eq!(transformed, b"mississippi");
        assert_eq!(indices, vec![0; 11]);
    }

    #[test]
    fn test_periodic_chunk_uses_lowest_rank() {
        // Rotations 0, 2 and 4 are all "ABABAB" and sort to ranks 0..3
        let (transformed, ptr) = transform(b"ABABAB");
        assert_eq!(ptr, 0);
        assert_eq!(transformed, b"BBBAAA");
        assert_eq!(inverse_transform(&transformed, ptr).unwrap(), b"ABABAB");

        // Any tied rank reconstructs the same chunk
        for tied in 0..3 {
            assert_eq!(inverse_transform(&transformed, tied).unwrap(), b"ABABAB");
        }
    }

    #[test]
    fn test_long_periodic_chunk() {
        let data: Vec<u8> = b"xyz".iter().cycle().take(300).copied().collect();
        let (transformed, ptr) = transform(&data);
        assert_eq!(ptr, 0);
        assert_eq!(inverse_transform(&transformed, ptr).unwrap(), data);
    }

    #[test]
    fn test_invalid_index() {
        let err = inverse_transform(b"abc", 3).unwrap_err();
        assert!(matches!(
            err,
            BwtPackError::InvalidBwtIndex {
                index: 3,
                chunk_len: 3
            }
        ));
        assert!(inverse_transform(b"", 0).is_err());
    }

    #[test]
    fn test_block_roundtrip_with_short_last_chunk() {
        let block: Vec<u8> = (0..2500u32).map(|i| (i * 7 % 251) as u8).collect();
        let config = chunked(1024);
        let (transformed, indices) = transform_block(&block, &config);
        assert_eq!(transformed.len(), block.len());
        assert_eq!(indices.len(), 3);
        assert_eq!(inverse_block(&transformed, &indices, &config).unwrap(), block);
    }

    #[test]
    fn test_empty_block_has_no_chunks() {
        let config = chunked(1024);
        let (transformed, indices) = transform_block(b"", &config);
        assert!(transformed.is_empty());
        assert!(indices.is_empty());
        assert!(inverse_block(b"", &[], &config).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_count_mismatch() {
        let config = chunked(4);
        let (transformed, mut indices) = transform_block(b"abcdefgh", &config);
        indices.push(0);
        let err = inverse_block(&transformed, &indices, &config).unwrap_err();
        assert!(matches!(err, BwtPackError::MalformedRecord { .. }));
    }

    #[test]
    fn test_grouping_stops_at_chunk_edges() {
        let (whole, _) = transform_block(b"abababab", &chunked(8));
        assert_eq!(whole, b"bbbbaaaa");

        // Each 4-byte chunk groups only its own bytes
        let (split, indices) = transform_block(b"abababab", &chunked(4));
        assert_eq!(split, b"bbaabbaa");
        assert_eq!(indices, vec![0, 0]);
    }
}
