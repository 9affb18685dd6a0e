// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Pixel-domain LSB embedding.
//!
//! One message bit per channel LSB, pixels in row-major order, channels
//! R,G,B within each pixel. The message is followed by one all-zero
//! terminator byte; extraction stops at the first zero byte it assembles.

use crate::codec::pixels::RgbImage;
use crate::stego::error::StegoError;
use crate::stego::TERMINATOR_BITS;

/// Embed `message` into the channel LSBs of `img`.
///
/// Capacity is checked up front: on failure the image is left unmodified.
/// Channels past the terminator keep their original values.
///
/// # Errors
/// `MessageTooLarge` if `message` plus the terminator needs more bits than
/// the image has channels (this also covers images with fewer than 8
/// channel slots, which cannot hold even a terminator).
pub fn embed_message(img: &mut RgbImage, message: &[u8]) -> Result<(), StegoError> {
    let capacity = img.width() * img.height() * 3;
    let needed = message.len() * 8 + TERMINATOR_BITS;
    if needed > capacity {
        log::warn!("pixel embed: {needed} bits needed, {capacity} available");
        return Err(StegoError::MessageTooLarge);
    }

    let mut bits = message_bits(message);
    let data = img.data_mut();
    for (slot, bit) in data.iter_mut().zip(&mut bits) {
        *slot = (*slot & !1) | bit;
    }
    Ok(())
}

/// Extract a message from the channel LSBs of `img`.
///
/// Bits are accumulated MSB-first; the first all-zero byte terminates the
/// message and is not part of the result. If the channels run out before a
/// terminator appears, whatever was assembled so far is returned.
pub fn extract_message(img: &RgbImage) -> Vec<u8> {
    let mut out = Vec::new();
    let mut acc = 0u8;
    let mut nbits = 0;
    for &slot in img.data() {
        acc = (acc << 1) | (slot & 1);
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
    out
}

/// Message bits MSB-first, followed by the 8-zero-bit terminator.
pub(crate) fn message_bits(message: &[u8]) -> impl Iterator<Item = u8> + '_ {
    message
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |k| (byte >> k) & 1))
        .chain(std::iter::repeat(0).take(TERMINATOR_BITS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_and_extracts_hi_in_4x4() {
        // 4x4 image: 48 channel slots; "HI" + terminator needs 24 bits.
        let mut img = RgbImage::new(4, 4);
        embed_message(&mut img, b"HI").unwrap();
        assert_eq!(extract_message(&img), b"HI");
    }

    #[test]
    fn bits_land_msb_first_in_channel_order() {
        let mut img = RgbImage::new(4, 4);
        embed_message(&mut img, &[0b1010_0001]).unwrap();
        let lsbs: Vec<u8> = img.data()[..8].iter().map(|&c| c & 1).collect();
        assert_eq!(lsbs, [1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn oversized_message_leaves_image_unmodified() {
        let mut img = RgbImage::new(4, 4);
        for (i, c) in img.data_mut().iter_mut().enumerate() {
            *c = (i % 251) as u8;
        }
        let before = img.clone();
        // 48 slots; 6 bytes need 48 + 8 bits.
        let result = embed_message(&mut img, b"toobig");
        assert!(matches!(result, Err(StegoError::MessageTooLarge)));
        assert_eq!(img, before);
    }

    #[test]
    fn terminator_needs_eight_slots() {
        // 1x2 image: 6 slots, not even a terminator fits.
        let mut img = RgbImage::new(1, 2);
        assert!(matches!(
            embed_message(&mut img, b""),
            Err(StegoError::MessageTooLarge)
        ));
    }

    #[test]
    fn extraction_ignores_data_past_terminator() {
        let mut img = RgbImage::new(8, 8);
        for c in img.data_mut().iter_mut() {
            *c = 255; // all LSBs set; would read as 0xFF bytes forever
        }
        embed_message(&mut img, b"ok").unwrap();
        assert_eq!(extract_message(&img), b"ok");
    }

    #[test]
    fn missing_terminator_returns_partial_bytes() {
        let mut img = RgbImage::new(2, 2);
        for c in img.data_mut().iter_mut() {
            *c = 1;
        }
        // 12 slots of 1-bits, no zero byte: one full byte assembled.
        assert_eq!(extract_message(&img), vec![0xFF]);
    }

    #[test]
    fn empty_message_round_trips() {
        let mut img = RgbImage::new(4, 4);
        for c in img.data_mut().iter_mut() {
            *c = 9;
        }
        embed_message(&mut img, b"").unwrap();
        assert_eq!(extract_message(&img), b"");
    }
}
