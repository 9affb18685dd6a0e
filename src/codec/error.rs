// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for codec encoding, decoding, and container parsing.

use std::fmt;

/// Errors that can occur while encoding or decoding a container.
#[derive(Debug)]
pub enum CodecError {
    /// File read/write failure.
    Io(std::io::Error),
    /// PNG decode/encode failure at the pipeline boundary.
    Image(image::ImageError),
    /// Container data is too short or truncated.
    UnexpectedEof,
    /// A container header field is invalid or inconsistent.
    InvalidHeader(&'static str),
    /// The RLE pair stream is malformed.
    InvalidRle(&'static str),
    /// The entropy-coded bit stream ended before the expected symbol count.
    TruncatedBitstream,
    /// A symbol to encode has no Huffman code (frequency table mismatch).
    MissingHuffmanCode(i32),
    /// A Huffman tree cannot be built from an empty frequency table.
    EmptyFrequencyTable,
    /// The pipeline holds no image data for the requested operation.
    NoImageData,
    /// A payload embed failed; serialization of the image is refused.
    EmbedFailed,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Image(e) => write!(f, "image error: {e}"),
            Self::UnexpectedEof => write!(f, "unexpected end of container data"),
            Self::InvalidHeader(msg) => write!(f, "invalid container header: {msg}"),
            Self::InvalidRle(msg) => write!(f, "invalid RLE data: {msg}"),
            Self::TruncatedBitstream => write!(f, "entropy bit stream is truncated"),
            Self::MissingHuffmanCode(sym) => write!(f, "no Huffman code for symbol {sym}"),
            Self::EmptyFrequencyTable => write!(f, "empty frequency table"),
            Self::NoImageData => write!(f, "no image data loaded"),
            Self::EmbedFailed => write!(f, "embed failed; refusing to serialize"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for CodecError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
