// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! 8×8 coefficient block storage.
//!
//! A [`CoeffBlock`] bundles one 8×8 grid per channel (Y, Cb, Cr) and is the
//! unit moved through the DCT, quantization, and zigzag stages. A
//! [`BlockGrid`] holds all blocks of an image in raster order.

use super::pixels::YcbcrImage;

/// One 8×8 grid of signed coefficients (or samples, before the transform).
pub type Block = [[i32; 8]; 8];

/// The three color channels, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Y,
    Cb,
    Cr,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Y, Channel::Cb, Channel::Cr];
}

/// Reconstruction clamp range for YCbCr samples.
///
/// Asymmetric with the forward transform's [0,255] on purpose: the source
/// system floors reconstructed samples at 16.
pub const SAMPLE_MIN: i32 = 16;
pub const SAMPLE_MAX: i32 = 255;

/// Y, Cb, and Cr blocks for one spatial 8×8 tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoeffBlock {
    pub y: Block,
    pub cb: Block,
    pub cr: Block,
}

impl CoeffBlock {
    pub fn zero() -> Self {
        Self {
            y: [[0; 8]; 8],
            cb: [[0; 8]; 8],
            cr: [[0; 8]; 8],
        }
    }

    pub fn channel(&self, ch: Channel) -> &Block {
        match ch {
            Channel::Y => &self.y,
            Channel::Cb => &self.cb,
            Channel::Cr => &self.cr,
        }
    }

    pub fn channel_mut(&mut self, ch: Channel) -> &mut Block {
        match ch {
            Channel::Y => &mut self.y,
            Channel::Cb => &mut self.cb,
            Channel::Cr => &mut self.cr,
        }
    }
}

/// All coefficient blocks of an image, blocks in raster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGrid {
    blocks_wide: usize,
    blocks_tall: usize,
    blocks: Vec<CoeffBlock>,
}

impl BlockGrid {
    pub fn new(blocks_wide: usize, blocks_tall: usize) -> Self {
        Self {
            blocks_wide,
            blocks_tall,
            blocks: vec![CoeffBlock::zero(); blocks_wide * blocks_tall],
        }
    }

    pub fn blocks_wide(&self) -> usize {
        self.blocks_wide
    }

    pub fn blocks_tall(&self) -> usize {
        self.blocks_tall
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[CoeffBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [CoeffBlock] {
        &mut self.blocks
    }

    /// Split a YCbCr buffer into 8×8 blocks. Dimensions must already be
    /// multiples of 8.
    pub fn split_samples(img: &YcbcrImage) -> Self {
        debug_assert!(img.width() % 8 == 0 && img.height() % 8 == 0);
        let blocks_wide = img.width() / 8;
        let blocks_tall = img.height() / 8;
        let mut grid = Self::new(blocks_wide, blocks_tall);
        for br in 0..blocks_tall {
            for bc in 0..blocks_wide {
                let block = &mut grid.blocks[br * blocks_wide + bc];
                for i in 0..8 {
                    for j in 0..8 {
                        let (y, cb, cr) = img.get(bc * 8 + j, br * 8 + i);
                        block.y[i][j] = y as i32;
                        block.cb[i][j] = cb as i32;
                        block.cr[i][j] = cr as i32;
                    }
                }
            }
        }
        grid
    }

    /// Merge blocks back into a YCbCr buffer, clamping every sample into
    /// [[`SAMPLE_MIN`], [`SAMPLE_MAX`]].
    pub fn merge_samples(&self) -> YcbcrImage {
        let mut img = YcbcrImage::new(self.blocks_wide * 8, self.blocks_tall * 8);
        for br in 0..self.blocks_tall {
            for bc in 0..self.blocks_wide {
                let block = &self.blocks[br * self.blocks_wide + bc];
                for i in 0..8 {
                    for j in 0..8 {
                        let y = block.y[i][j].clamp(SAMPLE_MIN, SAMPLE_MAX) as u8;
                        let cb = block.cb[i][j].clamp(SAMPLE_MIN, SAMPLE_MAX) as u8;
                        let cr = block.cr[i][j].clamp(SAMPLE_MIN, SAMPLE_MAX) as u8;
                        img.set(bc * 8 + j, br * 8 + i, (y, cb, cr));
                    }
                }
            }
        }
        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_merge_preserves_midrange_samples() {
        let mut img = YcbcrImage::new(16, 8);
        for y in 0..8 {
            for x in 0..16 {
                let v = (40 + x * 8 + y) as u8;
                img.set(x, y, (v, 128, 128));
            }
        }
        let grid = BlockGrid::split_samples(&img);
        assert_eq!(grid.blocks_wide(), 2);
        assert_eq!(grid.blocks_tall(), 1);
        assert_eq!(grid.len(), 2);
        // Block raster order: (row 0, col 1) starts at x = 8.
        assert_eq!(grid.blocks()[1].y[0][0], 40 + 8 * 8);
        assert_eq!(grid.merge_samples(), img);
    }

    #[test]
    fn merge_clamps_to_reconstruction_range() {
        let mut grid = BlockGrid::new(1, 1);
        grid.blocks_mut()[0].y[0][0] = -50;
        grid.blocks_mut()[0].y[0][1] = 3;
        grid.blocks_mut()[0].y[0][2] = 300;
        let img = grid.merge_samples();
        assert_eq!(img.get(0, 0).0, 16);
        assert_eq!(img.get(1, 0).0, 16);
        assert_eq!(img.get(2, 0).0, 255);
    }

    #[test]
    fn channel_accessors() {
        let mut block = CoeffBlock::zero();
        for ch in Channel::ALL {
            block.channel_mut(ch)[3][4] = 9;
        }
        assert_eq!(block.y[3][4], 9);
        assert_eq!(block.cb[3][4], 9);
        assert_eq!(block.cr[3][4], 9);
        assert_eq!(block.channel(Channel::Cr)[3][4], 9);
    }
}
