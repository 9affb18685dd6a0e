// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Zigzag scan order for 8×8 coefficient blocks.

use super::block::Block;

/// Maps zigzag position → natural (row-major) position.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27,
    20, 13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58,
    59, 52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Maps natural (row-major) position → zigzag position.
pub const NATURAL_TO_ZIGZAG: [usize; 64] = build_inverse();

const fn build_inverse() -> [usize; 64] {
    let mut inv = [0usize; 64];
    let mut zz = 0;
    while zz < 64 {
        inv[ZIGZAG_TO_NATURAL[zz]] = zz;
        zz += 1;
    }
    inv
}

/// Append the 64 coefficients of `block` to `out` in zigzag order.
pub fn zigzag_block(block: &Block, out: &mut Vec<i32>) {
    for &nat in ZIGZAG_TO_NATURAL.iter() {
        out.push(block[nat / 8][nat % 8]);
    }
}

/// Rebuild a block from `seq[start..start + 64]` in zigzag order.
///
/// A sequence shorter than `start + 64` is not an error: positions past the
/// end of the sequence are left at zero.
pub fn dezigzag_block(seq: &[i32], start: usize) -> Block {
    let mut block = [[0i32; 8]; 8];
    for (zz, &nat) in ZIGZAG_TO_NATURAL.iter().enumerate() {
        match seq.get(start + zz) {
            Some(&v) => block[nat / 8][nat % 8] = v,
            None => break,
        }
    }
    block
}
