// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Coefficient-domain LSB embedding.
//!
//! The carrier is the quantized coefficient grid, traversed blocks in
//! raster order, channels Y,Cb,Cr within each block, positions row-major
//! within each 8×8 grid. Two kinds of position are never touched:
//!
//! - the DC term (0,0) of every channel, since perturbing it shifts the
//!   whole tile visibly;
//! - coefficients currently valued 0 or 1: flipping their LSB would
//!   produce the other reserved value and the extractor could not tell
//!   carrier from non-carrier.
//!
//! An LSB flip on any eligible value yields another eligible value
//! (2↔3, -1↔-2, ...), so the set of carrier positions is identical for
//! embedder and extractor, and capacity can be computed exactly up front.

use crate::codec::block::{BlockGrid, Channel};
use crate::stego::error::StegoError;
use crate::stego::pixel::message_bits;
use crate::stego::TERMINATOR_BITS;

fn is_carrier(value: i32) -> bool {
    value != 0 && value != 1
}

/// Number of coefficient slots available for embedding.
pub fn carrier_capacity(grid: &BlockGrid) -> usize {
    let mut count = 0;
    for block in grid.blocks() {
        for ch in Channel::ALL {
            let b = block.channel(ch);
            for i in 0..8 {
                for j in 0..8 {
                    if (i != 0 || j != 0) && is_carrier(b[i][j]) {
                        count += 1;
                    }
                }
            }
        }
    }
    count
}

/// Embed `message` into the coefficient LSBs of `grid`.
///
/// Capacity is checked up front; on failure the grid is left unmodified and
/// the caller must mark the pipeline as not successfully encoded.
///
/// # Errors
/// `MessageTooLarge` if the message plus terminator exceeds the carrier
/// capacity.
pub fn embed_message(grid: &mut BlockGrid, message: &[u8]) -> Result<(), StegoError> {
    let capacity = carrier_capacity(grid);
    let needed = message.len() * 8 + TERMINATOR_BITS;
    if needed > capacity {
        log::warn!("coefficient embed: {needed} bits needed, {capacity} available");
        return Err(StegoError::MessageTooLarge);
    }

    let mut bits = message_bits(message);
    let mut next = bits.next();
    'grid: for block in grid.blocks_mut() {
        for ch in Channel::ALL {
            let b = block.channel_mut(ch);
            for i in 0..8 {
                for j in 0..8 {
                    let Some(bit) = next else { break 'grid };
                    if i == 0 && j == 0 {
                        continue;
                    }
                    if !is_carrier(b[i][j]) {
                        continue;
                    }
                    b[i][j] = (b[i][j] & !1) | bit as i32;
                    next = bits.next();
                }
            }
        }
    }
    Ok(())
}

/// Extract a message from the coefficient LSBs of `grid`.
///
/// Bits are accumulated MSB-first; the first all-zero byte terminates the
/// message. If the carriers run out first, whatever was assembled so far is
/// returned.
pub fn extract_message(grid: &BlockGrid) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc = 0u8;
    let mut nbits = 0;
    for block in grid.blocks() {
        for ch in Channel::ALL {
            let b = block.channel(ch);
            for i in 0..8 {
                for j in 0..8 {
                    if i == 0 && j == 0 {
                        continue;
                    }
                    if !is_carrier(b[i][j]) {
                        continue;
                    }
                    acc = (acc << 1) | (b[i][j] & 1) as u8;
                    nbits += 1;
                    if nbits == 8 {
                        if acc == 0 {
                            return out;
                        }
                        out.push(acc);
                        acc = 0;
                        nbits = 0;
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A grid whose AC coefficients all hold `value`.
    fn uniform_grid(blocks: usize, value: i32) -> BlockGrid {
        let mut grid = BlockGrid::new(blocks, 1);
        for block in grid.blocks_mut() {
            for ch in Channel::ALL {
                let b = block.channel_mut(ch);
                for i in 0..8 {
                    for j in 0..8 {
                        b[i][j] = if i == 0 && j == 0 { 100 } else { value };
                    }
                }
            }
        }
        grid
    }

    #[test]
    fn capacity_counts_only_usable_positions() {
        // 63 AC positions x 3 channels, all eligible.
        assert_eq!(carrier_capacity(&uniform_grid(1, 5)), 63 * 3);
        // 0 and 1 are reserved.
        assert_eq!(carrier_capacity(&uniform_grid(1, 0)), 0);
        assert_eq!(carrier_capacity(&uniform_grid(1, 1)), 0);
        // Negative values carry.
        assert_eq!(carrier_capacity(&uniform_grid(1, -1)), 63 * 3);
    }

    #[test]
    fn round_trip_through_eligible_coefficients() {
        let mut grid = uniform_grid(2, 4);
        embed_message(&mut grid, b"test").unwrap();
        assert_eq!(extract_message(&grid), b"test");
    }

    #[test]
    fn dc_terms_are_never_touched() {
        let mut grid = uniform_grid(1, 7);
        embed_message(&mut grid, b"x").unwrap();
        for block in grid.blocks() {
            for ch in Channel::ALL {
                assert_eq!(block.channel(ch)[0][0], 100);
            }
        }
    }

    #[test]
    fn reserved_values_are_skipped_on_both_sides() {
        let mut grid = uniform_grid(1, 2);
        // Sprinkle reserved values between carriers.
        let b = grid.blocks_mut()[0].channel_mut(Channel::Y);
        b[0][1] = 0;
        b[0][2] = 1;
        b[0][3] = 1;
        embed_message(&mut grid, b"ab").unwrap();
        let b = grid.blocks()[0].channel(Channel::Y);
        assert_eq!(b[0][1], 0);
        assert_eq!(b[0][2], 1);
        assert_eq!(b[0][3], 1);
        assert_eq!(extract_message(&grid), b"ab");
    }

    #[test]
    fn all_reserved_acs_reject_any_message() {
        let mut grid = uniform_grid(1, 1);
        let before = grid.clone();
        assert!(matches!(
            embed_message(&mut grid, b"a"),
            Err(StegoError::MessageTooLarge)
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn embedding_preserves_carrier_eligibility() {
        for value in [-5i32, -2, -1, 2, 3, 9] {
            let mut grid = uniform_grid(1, value);
            let capacity = carrier_capacity(&grid);
            embed_message(&mut grid, b"abcdefgh").unwrap();
            assert_eq!(carrier_capacity(&grid), capacity, "value {value}");
        }
    }

    #[test]
    fn capacity_boundary_is_exact() {
        // 189 carriers: 22 bytes need 184 bits, 23 bytes need 192.
        let mut grid = uniform_grid(1, 3);
        assert!(embed_message(&mut grid, &[b'a'; 22]).is_ok());
        let mut grid = uniform_grid(1, 3);
        assert!(matches!(
            embed_message(&mut grid, &[b'a'; 23]),
            Err(StegoError::MessageTooLarge)
        ));
    }
}
