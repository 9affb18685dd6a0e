// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! RGB ↔ YCbCr color transform (BT.601 coefficients).
//!
//! Per-pixel linear formulas, round-to-nearest, every output channel
//! clamped to [0,255] independently. The round trip is lossy by at most
//! one step per channel; that bound is what downstream stages rely on.

use super::pixels::{RgbImage, YcbcrImage};

fn clamp_u8(v: f64) -> u8 {
    (v.round() as i32).clamp(0, 255) as u8
}

/// Convert one RGB pixel to YCbCr.
pub fn pixel_to_ycbcr((r, g, b): (u8, u8, u8)) -> (u8, u8, u8) {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
    (clamp_u8(y), clamp_u8(cb), clamp_u8(cr))
}

/// Convert one YCbCr sample to RGB.
pub fn pixel_to_rgb((y, cb, cr): (u8, u8, u8)) -> (u8, u8, u8) {
    let (y, cb, cr) = (y as f64, cb as f64, cr as f64);
    let r = y + 1.402 * (cr - 128.0);
    let g = y - 0.344136 * (cb - 128.0) - 0.714136 * (cr - 128.0);
    let b = y + 1.772 * (cb - 128.0);
    (clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

/// Convert a whole RGB buffer to YCbCr.
pub fn rgb_to_ycbcr(img: &RgbImage) -> YcbcrImage {
    let mut out = YcbcrImage::new(img.width(), img.height());
    for y in 0..img.height() {
        for x in 0..img.width() {
            out.set(x, y, pixel_to_ycbcr(img.get(x, y)));
        }
    }
    out
}

/// Convert a whole YCbCr buffer to RGB.
pub fn ycbcr_to_rgb(img: &YcbcrImage) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    for y in 0..img.height() {
        for x in 0..img.width() {
            out.set(x, y, pixel_to_rgb(img.get(x, y)));
        }
    }
    out
}
