// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Feature vectors for external steganalysis.
//!
//! A statistical classifier (out of scope here) consumes the raw bit-level
//! data of an image to estimate whether a payload is embedded. This module
//! produces its input vectors in the layout that classifier expects:
//! quantized coefficients interleaved per position, and pixel channel LSBs
//! flattened row-major.

use crate::codec::block::BlockGrid;
use crate::codec::pixels::RgbImage;

/// Coefficients per block in a feature vector: 64 positions × 3 channels.
pub const BLOCK_FEATURE_LEN: usize = 64 * 3;

/// Flatten a quantized grid: blocks in raster order, positions row-major
/// within each block, channels interleaved Y,Cb,Cr per position.
pub fn coefficient_feature_vector(grid: &BlockGrid) -> Vec<i32> {
    let mut out = Vec::with_capacity(grid.len() * BLOCK_FEATURE_LEN);
    for block in grid.blocks() {
        push_block_features(block, &mut out);
    }
    out
}

/// Per-block feature vectors, one of length [`BLOCK_FEATURE_LEN`] per
/// spatial block.
pub fn block_feature_vectors(grid: &BlockGrid) -> Vec<Vec<i32>> {
    grid.blocks()
        .iter()
        .map(|block| {
            let mut v = Vec::with_capacity(BLOCK_FEATURE_LEN);
            push_block_features(block, &mut v);
            v
        })
        .collect()
}

fn push_block_features(block: &crate::codec::block::CoeffBlock, out: &mut Vec<i32>) {
    for i in 0..8 {
        for j in 0..8 {
            out.push(block.y[i][j]);
            out.push(block.cb[i][j]);
            out.push(block.cr[i][j]);
        }
    }
}

/// Channel LSBs of every pixel, row-major, R,G,B per pixel.
pub fn pixel_lsb_vector(img: &RgbImage) -> Vec<u8> {
    img.data().iter().map(|&c| c & 1).collect()
}

/// Channel LSBs per non-overlapping `window`×`window` tile, tiles in raster
/// order. Partial tiles at the right and bottom edges are skipped.
pub fn pixel_lsb_windows(img: &RgbImage, window: usize) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    if window == 0 {
        return out;
    }
    let mut y0 = 0;
    while y0 + window <= img.height() {
        let mut x0 = 0;
        while x0 + window <= img.width() {
            let mut tile = Vec::with_capacity(window * window * 3);
            for y in y0..y0 + window {
                for x in x0..x0 + window {
                    let (r, g, b) = img.get(x, y);
                    tile.push(r & 1);
                    tile.push(g & 1);
                    tile.push(b & 1);
                }
            }
            out.push(tile);
            x0 += window;
        }
        y0 += window;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::block::Channel;

    #[test]
    fn coefficient_vector_is_interleaved() {
        let mut grid = BlockGrid::new(2, 1);
        for (n, block) in grid.blocks_mut().iter_mut().enumerate() {
            block.y[0][0] = 10 + n as i32;
            block.cb[0][0] = 20 + n as i32;
            block.cr[0][0] = 30 + n as i32;
            block.y[0][1] = -1;
        }
        let v = coefficient_feature_vector(&grid);
        assert_eq!(v.len(), 2 * BLOCK_FEATURE_LEN);
        // Block 0, position (0,0): Y, Cb, Cr.
        assert_eq!(&v[..3], &[10, 20, 30]);
        // Position (0,1) follows immediately.
        assert_eq!(&v[3..6], &[-1, 0, 0]);
        // Block 1 starts after 192 values.
        assert_eq!(&v[BLOCK_FEATURE_LEN..BLOCK_FEATURE_LEN + 3], &[11, 21, 31]);
    }

    #[test]
    fn per_block_vectors_match_the_flat_vector() {
        let mut grid = BlockGrid::new(3, 2);
        for (n, block) in grid.blocks_mut().iter_mut().enumerate() {
            for ch in Channel::ALL {
                block.channel_mut(ch)[1][1] = n as i32;
            }
        }
        let flat = coefficient_feature_vector(&grid);
        let per_block = block_feature_vectors(&grid);
        assert_eq!(per_block.len(), 6);
        let rejoined: Vec<i32> = per_block.into_iter().flatten().collect();
        assert_eq!(rejoined, flat);
    }

    #[test]
    fn pixel_lsb_vector_tracks_channel_parity() {
        let mut img = RgbImage::new(2, 1);
        img.set(0, 0, (2, 3, 4));
        img.set(1, 0, (255, 0, 1));
        assert_eq!(pixel_lsb_vector(&img), vec![0, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn windows_tile_the_image_and_skip_partial_edges() {
        let img = RgbImage::new(70, 33);
        let windows = pixel_lsb_windows(&img, 32);
        // 2 columns x 1 row of full 32x32 tiles.
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.len() == 32 * 32 * 3));
    }

    #[test]
    fn window_contents_come_from_the_right_tile() {
        let mut img = RgbImage::new(4, 2);
        img.set(2, 0, (1, 1, 1)); // first pixel of the second 2x2 tile
        let windows = pixel_lsb_windows(&img, 2);
        assert_eq!(windows.len(), 2);
        assert_eq!(&windows[1][..3], &[1, 1, 1]);
        assert!(windows[0].iter().all(|&b| b == 0));
    }
}
