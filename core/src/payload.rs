//! Byte ⇄ bit framing of the payload
//!
//! Bytes are padded to an even length, followed by the terminator and
//! expanded most significant bit first. Every payload is therefore a whole
//! number of 16-bit groups.

use crate::{TERMINATOR, TERMINATOR_BITS};

/// Expand `data` into the payload bit sequence handed to the encoder.
pub fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bytes = data.to_vec();
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    bytes.extend_from_slice(&TERMINATOR);

    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    bits
}

/// Reassemble decoded bits into bytes.
///
/// The last 16 bits are dropped as the terminator without looking at them,
/// and an incomplete trailing byte is ignored. The zero byte added to odd
/// payloads is not removed.
pub fn from_bits(bits: &[u8]) -> Vec<u8> {
    let data_bits = bits.len().saturating_sub(TERMINATOR_BITS);
    bits[..data_bits]
        .chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | (bit & 1)))
        .collect()
}
