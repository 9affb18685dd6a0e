// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Quality-scaled scalar quantization.
//!
//! The two base tables are the standard JPEG Annex K luminance and
//! chrominance tables. The scale law must match the decoder exactly: the
//! container records only the quality value, and the decoder regenerates
//! the same tables from it.

use super::block::{Block, Channel};

pub const BASE_LUMINANCE: [[i32; 8]; 8] = [
    [16, 11, 10, 16, 24, 40, 51, 61],
    [12, 12, 14, 19, 26, 58, 60, 55],
    [14, 13, 16, 24, 40, 57, 69, 56],
    [14, 17, 22, 29, 51, 87, 80, 62],
    [18, 22, 37, 56, 68, 109, 103, 77],
    [24, 35, 55, 64, 81, 104, 113, 92],
    [49, 64, 78, 87, 103, 121, 120, 101],
    [72, 92, 95, 98, 112, 100, 103, 99],
];

pub const BASE_CHROMINANCE: [[i32; 8]; 8] = [
    [17, 18, 24, 47, 99, 99, 99, 99],
    [18, 21, 26, 66, 99, 99, 99, 99],
    [24, 26, 56, 99, 99, 99, 99, 99],
    [47, 66, 99, 99, 99, 99, 99, 99],
    [99, 99, 99, 99, 99, 99, 99, 99],
    [99, 99, 99, 99, 99, 99, 99, 99],
    [99, 99, 99, 99, 99, 99, 99, 99],
    [99, 99, 99, 99, 99, 99, 99, 99],
];

/// Quality-scaled quantization tables for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantTables {
    pub luminance: [[i32; 8]; 8],
    pub chrominance: [[i32; 8]; 8],
}

impl QuantTables {
    /// Generate tables for a quality in [1,100]. Out-of-range values are
    /// clamped with a warning. Every generated entry is at least 1.
    pub fn for_quality(quality: i32) -> Self {
        let q = quality.clamp(1, 100);
        if q != quality {
            log::warn!("quality {quality} out of [1,100], clamped to {q}");
        }
        let s = if q == 100 {
            1.0
        } else if q < 50 {
            5000.0 / q as f64
        } else {
            (200 - 2 * q) as f64
        };

        let scale = |base: &[[i32; 8]; 8]| {
            let mut table = [[0i32; 8]; 8];
            for i in 0..8 {
                for j in 0..8 {
                    table[i][j] = (((s * base[i][j] as f64 + 50.0) / 100.0) as i32).max(1);
                }
            }
            table
        };

        Self {
            luminance: scale(&BASE_LUMINANCE),
            chrominance: scale(&BASE_CHROMINANCE),
        }
    }

    /// The table used for a given channel (Y → luminance, Cb/Cr → chrominance).
    pub fn table(&self, ch: Channel) -> &[[i32; 8]; 8] {
        match ch {
            Channel::Y => &self.luminance,
            Channel::Cb | Channel::Cr => &self.chrominance,
        }
    }
}

/// Divide each coefficient by its table entry, rounding to nearest.
pub fn quantize(block: &mut Block, table: &[[i32; 8]; 8]) {
    for i in 0..8 {
        for j in 0..8 {
            block[i][j] = (block[i][j] as f64 / table[i][j] as f64).round() as i32;
        }
    }
}

/// Multiply each coefficient back by its table entry.
pub fn dequantize(block: &mut Block, table: &[[i32; 8]; 8]) {
    for i in 0..8 {
        for j in 0..8 {
            block[i][j] *= table[i][j];
        }
    }
}
