//! Run-Length Encoding of the MTF rank stream.
//!
//! Every token starts with a control byte:
//! - High bit set: the low 7 bits are a repeat count (2-127), followed by the
//!   byte to repeat.
//! - High bit clear: the value is the exact number (0-127) of literal bytes
//!   that follow.
//!
//! The stream is self-delimiting; no length table is needed.

use bwtpack_core::error::{BwtPackError, Result};

/// Flag marking a repeat token.
pub const REPEAT_FLAG: u8 = 0x80;

/// Longest run or literal span a single token can carry.
pub const MAX_RUN: usize = 127;

/// Length of the run of identical bytes starting at `pos`, capped at
/// [`MAX_RUN`].
#[inline]
fn run_length(data: &[u8], pos: usize) -> usize {
    let byte = data[pos];
    let mut len = 1;
    while pos + len < data.len() && len < MAX_RUN && data[pos + len] == byte {
        len += 1;
    }
    len
}

/// Encode data into repeat and literal tokens.
///
/// Runs of two or more identical bytes always become repeat tokens; a
/// literal span stops as soon as the next two unconsumed bytes are equal.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len() + data.len() / MAX_RUN + 1);
    let n = data.len();
    let mut i = 0;

    while i < n {
        let run = run_length(data, i);
        if run >= 2 {
            result.push(REPEAT_FLAG | run as u8);
            result.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        i += 1;
        while i < n && i - start < MAX_RUN && (i + 1 >= n || data[i] != data[i + 1]) {
            i += 1;
        }

        result.push((i - start) as u8);
        result.extend_from_slice(&data[start..i]);
    }

    result
}

/// Decode a token stream produced by [`encode`].
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(data.len() * 2);
    let n = data.len();
    let mut i = 0;

    while i < n {
        let control = data[i];
        let token_start = i;
        i += 1;

        if control & REPEAT_FLAG != 0 {
            let count = (control & !REPEAT_FLAG) as usize;
            if count < 2 {
                return Err(BwtPackError::invalid_rle(
                    token_start,
                    format!("repeat count {} below 2", count),
                ));
            }
            let Some(&byte) = data.get(i) else {
                return Err(BwtPackError::invalid_rle(
                    token_start,
                    "repeat token missing its payload byte",
                ));
            };
            i += 1;
            result.resize(result.len() + count, byte);
        } else {
            let len = control as usize;
            if i + len > n {
                return Err(BwtPackError::invalid_rle(
                    token_start,
                    format!("literal of {} bytes but only {} remain", len, n - i),
                ));
            }
            result.extend_from_slice(&data[i..i + len]);
            i += len;
        }
    }

    Ok(result)
}

/// Number of repeat tokens in an encoded stream.
///
/// Walks the token structure; a malformed stream yields `None`.
pub fn count_repeat_tokens(encoded: &[u8]) -> Option<usize> {
    let mut count = 0;
    let mut i = 0;
    while i < encoded.len() {
        let control = encoded[i];
        if control & REPEAT_FLAG != 0 {
            count += 1;
            i += 2;
        } else {
            i += 1 + control as usize;
        }
    }
    (i == encoded.len()).then_some(count)
}
