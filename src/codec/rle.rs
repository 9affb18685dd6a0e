// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Run-length coding of the zigzag-scanned coefficient sequence.
//!
//! The encoded form is a flat `(value, count)` pair stream; every maximal
//! run of equal adjacent values produces one pair, runs of length 1
//! included. The pair stream is therefore always of even length, and the
//! container header records that length so the decoder can validate it.

use super::error::{CodecError, Result};

/// Encode `input` as a flat (value, count) pair stream.
pub fn encode_rle(input: &[i32]) -> Vec<i32> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < input.len() {
        let value = input[i];
        let mut count = 1i32;
        while i + 1 < input.len() && input[i + 1] == value {
            count += 1;
            i += 1;
        }
        out.push(value);
        out.push(count);
        i += 1;
    }
    out
}

/// Expand a (value, count) pair stream back into the original sequence.
///
/// `expected_len` is the pair-stream element count recorded in the container
/// header; it must be even and match `pairs.len()`. `max_output` caps the
/// total expansion: run counts are attacker-controlled in a malformed
/// container, so the caller passes the exact number of coefficients its grid
/// consumes and anything beyond that is rejected before it is allocated.
///
/// # Errors
/// `InvalidRle` if the pair stream is empty or of odd length, if
/// `expected_len` is odd or disagrees with the stream, if a run count is
/// not positive, or if the expansion would exceed `max_output` elements.
pub fn decode_rle(pairs: &[i32], expected_len: usize, max_output: usize) -> Result<Vec<i32>> {
    if pairs.is_empty() {
        return Err(CodecError::InvalidRle("empty pair stream"));
    }
    if pairs.len() % 2 != 0 {
        return Err(CodecError::InvalidRle("odd pair stream length"));
    }
    if expected_len % 2 != 0 {
        return Err(CodecError::InvalidRle("odd expected length"));
    }
    if pairs.len() != expected_len {
        return Err(CodecError::InvalidRle("pair stream length mismatch"));
    }

    let mut out = Vec::new();
    for pair in pairs.chunks_exact(2) {
        let (value, count) = (pair[0], pair[1]);
        if count <= 0 {
            return Err(CodecError::InvalidRle("nonpositive run count"));
        }
        let count = count as usize;
        if count > max_output - out.len() {
            return Err(CodecError::InvalidRle("run exceeds output bound"));
        }
        for _ in 0..count {
            out.push(value);
        }
    }
    Ok(out)
}
