// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Computes the proof-of-work score of a sequence of bytes.

use crypto::hashes::{blake2b::Blake2b256, Digest};

/// Computes the proof-of-work score of `bytes`, where `bytes` is expected to already include the
/// trailing nonce.
///
/// The score is `3^zeros / len(bytes)`, where `zeros` is the number of trailing zero bits in the
/// BLAKE2b-256 hash of `bytes`. Reaching a target score requires searching for a nonce whose hash
/// has enough trailing zero bits; shorter messages are weighted to be proportionally harder so
/// that PoW cost is not cheapened by keeping messages small.
pub fn compute_pow_score(bytes: &[u8]) -> f64 {
    let zeros = trailing_zeros(&Blake2b256::digest(bytes));

    3f64.powi(zeros as i32) / bytes.len() as f64
}

/// Counts the number of trailing zero bits in `bytes`, scanning from the last byte backwards.
pub(crate) fn trailing_zeros(bytes: &[u8]) -> usize {
    let mut zeros = 0;

    for &byte in bytes.iter().rev() {
        if byte == 0 {
            zeros += 8;
        } else {
            zeros += byte.trailing_zeros() as usize;
            break;
        }
    }

    zeros
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_hash_counts_every_bit() {
        assert_eq!(trailing_zeros(&[0u8; 32]), 256);
    }

    #[test]
    fn single_set_bit_at_the_end() {
        let mut hash = [0u8; 32];
        hash[31] = 0b1000_0000;
        assert_eq!(trailing_zeros(&hash), 7);
    }

    #[test]
    fn score_formula_halves_when_length_doubles() {
        let zeros = 10;
        let short_score = 3f64.powi(zeros) / 8.0;
        let long_score = 3f64.powi(zeros) / 16.0;
        assert!((short_score - 2.0 * long_score).abs() < 1e-9);
    }
}
