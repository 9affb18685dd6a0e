// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Steganographic embedding over the codec pipeline.
//!
//! Two carriers are supported:
//!
//! - **pixel domain**: message bits in the channel LSBs of a PNG's raw RGB
//!   data; the output is a PNG again ([`pixel_encode`]/[`pixel_decode`]).
//! - **coefficient domain**: message bits in the LSBs of quantized DCT
//!   coefficients, surviving the full entropy-coding round trip inside the
//!   private container format ([`coeff_encode`]/[`coeff_decode`]).
//!
//! Messages are terminated by one all-zero byte in both carriers. Because
//! the terminator is in-band, messages containing a zero byte are rejected
//! up front rather than silently truncated on extraction.

pub mod analysis;
pub mod coeff;
pub mod error;
pub mod pixel;

pub use error::StegoError;

use crate::codec::pixels::RgbImage;
use crate::codec::CodecImage;

/// Bit length of the all-zero terminator byte.
pub const TERMINATOR_BITS: usize = 8;

fn check_message(message: &str) -> Result<(), StegoError> {
    if message.bytes().any(|b| b == 0) {
        return Err(StegoError::MessageContainsNul);
    }
    Ok(())
}

fn message_from_bytes(bytes: Vec<u8>) -> Result<String, StegoError> {
    String::from_utf8(bytes).map_err(|_| StegoError::InvalidUtf8)
}

/// Embed `message` into the pixel LSBs of a PNG; returns the stego PNG.
///
/// # Errors
/// - `InvalidCodec` if the PNG cannot be decoded or re-encoded.
/// - `MessageContainsNul` / `MessageTooLarge` from the embedder.
pub fn pixel_encode(png_bytes: &[u8], message: &str) -> Result<Vec<u8>, StegoError> {
    check_message(message)?;
    let mut img = RgbImage::from_png_bytes(png_bytes).map_err(StegoError::from)?;
    pixel::embed_message(&mut img, message.as_bytes())?;
    img.to_png_bytes().map_err(StegoError::from)
}

/// Extract a message from the pixel LSBs of a stego PNG.
///
/// # Errors
/// `InvalidCodec` if the PNG cannot be decoded; `InvalidUtf8` if the
/// payload is not valid UTF-8.
pub fn pixel_decode(png_bytes: &[u8]) -> Result<String, StegoError> {
    let img = RgbImage::from_png_bytes(png_bytes).map_err(StegoError::from)?;
    message_from_bytes(pixel::extract_message(&img))
}

/// Compress a PNG at `quality` with `message` embedded in the quantized
/// coefficients; returns the container bytes.
///
/// On a capacity failure the pipeline is marked not successfully encoded
/// and no container is produced.
///
/// # Errors
/// - `InvalidCodec` for PNG or container failures.
/// - `MessageContainsNul` / `MessageTooLarge` from the embedder.
pub fn coeff_encode(png_bytes: &[u8], message: &str, quality: i32) -> Result<Vec<u8>, StegoError> {
    check_message(message)?;
    let mut img = CodecImage::from_png_bytes(png_bytes, quality)?;
    img.rgb_to_ycbcr();
    img.generate_dct_blocks();
    img.quantize_blocks();

    let grid = img.quantized_mut().ok_or(StegoError::NoImageData)?;
    if let Err(e) = coeff::embed_message(grid, message.as_bytes()) {
        img.mark_embed_failed();
        return Err(e);
    }
    img.mark_embedded();

    img.encode_to_vec().map_err(StegoError::from)
}

/// Extract a message from a container's quantized coefficients without
/// reconstructing the image.
///
/// # Errors
/// `InvalidCodec` for malformed containers; `InvalidUtf8` if the payload is
/// not valid UTF-8.
pub fn coeff_decode(container: &[u8]) -> Result<String, StegoError> {
    let mut img = CodecImage::decode_from_slice(container)?;
    let grid = img.quantized().ok_or(StegoError::NoImageData)?;
    let bytes = coeff::extract_message(grid);
    img.mark_payload_extracted();
    message_from_bytes(bytes)
}

/// Fully reconstruct a container back into a PNG.
///
/// # Errors
/// `InvalidCodec` for malformed containers or PNG encoding failures.
pub fn container_to_png(container: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut img = CodecImage::decode_from_slice(container)?;
    let rgb = img.reconstruct_rgb()?;
    rgb.to_png_bytes().map_err(StegoError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_bytes_are_rejected() {
        assert!(matches!(
            check_message("a\0b"),
            Err(StegoError::MessageContainsNul)
        ));
        assert!(check_message("plain").is_ok());
    }

    #[test]
    fn invalid_utf8_is_reported() {
        assert!(matches!(
            message_from_bytes(vec![0xFF, 0xFE]),
            Err(StegoError::InvalidUtf8)
        ));
        assert_eq!(message_from_bytes(b"ok".to_vec()).unwrap(), "ok");
    }

    #[test]
    fn garbage_container_is_rejected() {
        assert!(coeff_decode(&[1, 2, 3]).is_err());
        assert!(container_to_png(&[]).is_err());
    }

    #[test]
    fn garbage_png_is_rejected() {
        assert!(pixel_encode(b"not a png", "msg").is_err());
        assert!(pixel_decode(b"not a png").is_err());
        assert!(coeff_encode(b"not a png", "msg", 50).is_err());
    }
}
