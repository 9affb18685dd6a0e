// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! # stegopress
//!
//! A from-scratch JPEG-like image codec with LSB steganography in both the
//! pixel and the quantized-coefficient domain.
//!
//! The codec pipeline is color transform → 8×8 DCT → quantization → zigzag
//! → run-length coding → dynamic Huffman coding → a private binary
//! container. It is deliberately **not** a standards-compliant JPEG: the
//! container is readable only by this crate's own decoder. Payloads embed
//! either into raw PNG pixel LSBs (output stays a PNG) or into the
//! quantized DCT coefficients before entropy coding (output is a
//! container), and both use a single all-zero terminator byte.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stegopress::{coeff_encode, coeff_decode};
//!
//! let cover_png = std::fs::read("photo.png").unwrap();
//! let container = coeff_encode(&cover_png, "secret message", 50).unwrap();
//! let decoded = coeff_decode(&container).unwrap();
//! assert_eq!(decoded, "secret message");
//! ```

pub mod codec;
pub mod stego;

pub use codec::error::{CodecError, Result as CodecResult};
pub use codec::pixels::RgbImage;
pub use codec::quant::QuantTables;
pub use codec::{CodecImage, Stage};
pub use stego::{
    coeff_decode, coeff_encode, container_to_png, pixel_decode, pixel_encode, StegoError,
    TERMINATOR_BITS,
};
pub use stego::analysis::{
    block_feature_vectors, coefficient_feature_vector, pixel_lsb_vector, pixel_lsb_windows,
};
