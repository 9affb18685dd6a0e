// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the steganography surface.

use std::fmt;

use crate::codec::error::CodecError;

/// Errors that can occur during payload embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// The underlying codec or container operation failed.
    InvalidCodec(CodecError),
    /// The message does not fit the carrier's capacity (terminator included).
    MessageTooLarge,
    /// The message contains a zero byte, which would collide with the
    /// end-of-message terminator on extraction.
    MessageContainsNul,
    /// The extracted payload is not valid UTF-8.
    InvalidUtf8,
    /// The pipeline holds no carrier data to embed into or extract from.
    NoImageData,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCodec(e) => write!(f, "codec error: {e}"),
            Self::MessageTooLarge => write!(f, "message too large for this carrier"),
            Self::MessageContainsNul => write!(f, "message contains a zero byte"),
            Self::InvalidUtf8 => write!(f, "extracted payload is not valid UTF-8"),
            Self::NoImageData => write!(f, "no carrier data available"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCodec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for StegoError {
    fn from(e: CodecError) -> Self {
        Self::InvalidCodec(e)
    }
}
