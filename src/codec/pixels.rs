// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Raw pixel buffers and PNG boundary I/O.
//!
//! Both buffer types store samples as a flat interleaved `Vec<u8>`
//! (3 bytes per pixel, row-major). PNG is the only external image format;
//! everything past this boundary is the private container format.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::error::{CodecError, Result};

/// An 8-bit RGB image, interleaved row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage {
    /// All-zero image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Wrap an existing interleaved buffer.
    ///
    /// # Errors
    /// `NoImageData` if `data` does not hold exactly `width * height` pixels.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(CodecError::NoImageData);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Decode a PNG byte buffer into an RGB image (alpha is dropped).
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);
        Self::from_raw(width, height, decoded.into_raw())
    }

    /// Encode this image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            &self.data,
            self.width as u32,
            self.height as u32,
            ExtendedColorType::Rgb8,
        )?;
        Ok(out)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn set(&mut self, x: usize, y: usize, (r, g, b): (u8, u8, u8)) {
        let i = (y * self.width + x) * 3;
        self.data[i] = r;
        self.data[i + 1] = g;
        self.data[i + 2] = b;
    }

    /// Interleaved channel bytes, row-major, R,G,B per pixel.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy with width and height truncated down to multiples of 8.
    /// Trailing rows and columns are silently dropped; block processing
    /// assumes 8-aligned dimensions throughout.
    pub fn truncate_to_blocks(&self) -> RgbImage {
        let width = self.width - self.width % 8;
        let height = self.height - self.height % 8;
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = RgbImage::new(width, height);
        for y in 0..height {
            let src = (y * self.width) * 3;
            let dst = (y * width) * 3;
            out.data[dst..dst + width * 3].copy_from_slice(&self.data[src..src + width * 3]);
        }
        out
    }
}

/// An 8-bit YCbCr image, interleaved row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YcbcrImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl YcbcrImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 3;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    pub fn set(&mut self, x: usize, y: usize, (y_s, cb, cr): (u8, u8, u8)) {
        let i = (y * self.width + x) * 3;
        self.data[i] = y_s;
        self.data[i + 1] = cb;
        self.data[i + 2] = cr;
    }
}
