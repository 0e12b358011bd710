//! Move-to-Front Transform.
//!
//! MTF replaces each byte with its position in a recency-ordered alphabet and
//! then moves that byte to the front. After the BWT has grouped equal bytes,
//! this turns local clusters into runs of small ranks.
//!
//! The alphabet is reset once per block and carries across every chunk of the
//! block.

/// Recency-ordered alphabet of all 256 byte values.
#[derive(Debug, Clone)]
pub struct MtfState {
    list: [u8; 256],
}

impl MtfState {
    /// Create a state in ascending numeric order.
    pub fn new() -> Self {
        let mut list = [0u8; 256];
        for (slot, value) in list.iter_mut().zip(0u8..=255) {
            *slot = value;
        }
        Self { list }
    }

    /// Move the byte at `pos` to the front, shifting the ones before it.
    #[inline]
    fn promote(&mut self, pos: usize) {
        if pos > 0 {
            let byte = self.list[pos];
            self.list.copy_within(0..pos, 1);
            self.list[0] = byte;
        }
    }

    /// Encode one byte as its current rank.
    #[inline]
    pub fn encode(&mut self, byte: u8) -> u8 {
        // Every value 0-255 is present, so the scan always finds it
        let pos = self.list.iter().position(|&b| b == byte).unwrap_or(0);
        self.promote(pos);
        pos as u8
    }

    /// Decode one rank back to its byte.
    #[inline]
    pub fn decode(&mut self, rank: u8) -> u8 {
        let byte = self.list[rank as usize];
        self.promote(rank as usize);
        byte
    }

    /// Current alphabet order, front first.
    pub fn order(&self) -> &[u8; 256] {
        &self.list
    }
}

impl Default for MtfState {
    fn default() -> Self {
        Self::new()
    }
}

/// Perform Move-to-Front transform over one block.
pub fn transform(data: &[u8]) -> Vec<u8> {
    let mut state = MtfState::new();
    data.iter().map(|&byte| state.encode(byte)).collect()
}

/// Perform inverse Move-to-Front transform over one block.
pub fn inverse_transform(data: &[u8]) -> Vec<u8> {
    let mut state = MtfState::new();
    data.iter().map(|&rank| state.decode(rank)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_in_byte_order() {
        let state = MtfState::new();
        assert!(state.order().iter().enumerate().all(|(i, &b)| i == b as usize));
        assert!(transform(b"").is_empty());
    }

    #[test]
    fn test_each_block_starts_fresh() {
        assert_eq!(transform(b"qq"), vec![b'q', 0]);
        // A new block must not see the 'q' promoted by the previous one
        assert_eq!(transform(b"q"), vec![b'q']);
        assert_eq!(inverse_transform(&[b'q']), b"q");
    }

    #[test]
    fn test_state_carries_across_chunks() {
        let mut state = MtfState::new();
        let mut ranks: Vec<u8> = b"abab".iter().map(|&b| state.encode(b)).collect();
        ranks.extend(b"ba".iter().map(|&b| state.encode(b)));

        assert_eq!(ranks, vec![97, 98, 1, 1, 0, 1]);
        assert_eq!(transform(b"ababba"), ranks);
    }

    #[test]
    fn test_mtf_known_sequence() {
        // 'b' at 98 then front, 'a' shifted to 98 then front, 'b' now at 1
        assert_eq!(transform(b"bab"), vec![98, 98, 1]);
    }

    #[test]
    fn test_inverts_multi_chunk_bwt_output() {
        let config = bwtpack_core::config::CodecConfig::new(4096, 8).unwrap();
        let block = b"to be or not to be, that is the question";
        let (bwt_data, _) = crate::bwt::transform_block(block, &config);
        let ranks = transform(&bwt_data);
        assert_eq!(inverse_transform(&ranks), bwt_data);
    }

    #[test]
    fn test_mtf_all_byte_values() {
        let data: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        assert_eq!(inverse_transform(&transform(&data)), data);
    }

    #[test]
    fn test_state_updates_match() {
        let mut encoder = MtfState::new();
        let mut decoder = MtfState::new();
        for &byte in b"state must stay in lockstep" {
            let rank = encoder.encode(byte);
            assert_eq!(decoder.decode(rank), byte);
            assert_eq!(encoder.order(), decoder.order());
        }
    }

    #[test]
    fn test_ranks_stay_low_after_bwt() {
        let config = bwtpack_core::config::CodecConfig::new(4096, 512).unwrap();
        let block = b"one fish two fish red fish blue fish ".repeat(8);
        let (bwt_data, _) = crate::bwt::transform_block(&block, &config);

        let ranks = transform(&bwt_data);
        let zeros = ranks.iter().filter(|&&r| r == 0).count();
        assert!(zeros > ranks.len() / 2, "{} zeros of {}", zeros, ranks.len());
        assert!(zeros > transform(&block).iter().filter(|&&r| r == 0).count());
    }
}
