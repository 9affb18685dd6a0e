// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! The private container format.
//!
//! Byte layout, written in this order, all integers fixed-width in native
//! byte order:
//!
//! 1. `quality`: i32
//! 2. `height`, `width`: i32 each (post 8-alignment-truncation values)
//! 3. `frequency table size`: u32 (N)
//! 4. N × (`symbol`: i32, `count`: i32)
//! 5. `encoded byte length`: i32 (packed entropy payload length in bytes)
//! 6. `rle sequence length`: i32 (element count of the RLE pair stream)
//! 7. the entropy-coded payload bytes
//!
//! This is not a JPEG bitstream and no third-party reader decodes it; the
//! only compatibility requirement is with this crate's own decoder.

use std::collections::BTreeMap;

use super::error::{CodecError, Result};

/// Parsed (or to-be-written) container header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub quality: i32,
    pub height: i32,
    pub width: i32,
    pub frequencies: BTreeMap<i32, u32>,
    /// Packed byte length of the entropy payload that follows the header.
    pub encoded_len: i32,
    /// Element count of the RLE pair stream (always even).
    pub rle_len: i32,
}

impl ContainerHeader {
    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.quality.to_ne_bytes());
        out.extend_from_slice(&self.height.to_ne_bytes());
        out.extend_from_slice(&self.width.to_ne_bytes());
        out.extend_from_slice(&(self.frequencies.len() as u32).to_ne_bytes());
        for (&symbol, &count) in &self.frequencies {
            out.extend_from_slice(&symbol.to_ne_bytes());
            out.extend_from_slice(&(count as i32).to_ne_bytes());
        }
        out.extend_from_slice(&self.encoded_len.to_ne_bytes());
        out.extend_from_slice(&self.rle_len.to_ne_bytes());
    }

    /// Parse a header from the front of `data`.
    ///
    /// Returns the header and the byte offset where the entropy payload
    /// starts (the number of header bytes consumed).
    ///
    /// # Errors
    /// `UnexpectedEof` if `data` is shorter than the declared layout;
    /// `InvalidHeader` if a field is out of its valid range.
    pub fn read_from(data: &[u8]) -> Result<(Self, usize)> {
        let mut off = 0usize;

        let quality = read_i32(data, &mut off)?;
        let height = read_i32(data, &mut off)?;
        let width = read_i32(data, &mut off)?;
        if height < 0 || width < 0 {
            return Err(CodecError::InvalidHeader("negative dimensions"));
        }
        if height % 8 != 0 || width % 8 != 0 {
            return Err(CodecError::InvalidHeader("dimensions not 8-aligned"));
        }

        let freq_size = read_u32(data, &mut off)? as usize;
        // Each entry takes 8 bytes; reject sizes the data cannot hold before
        // allocating anything.
        let freq_bytes = freq_size
            .checked_mul(8)
            .ok_or(CodecError::UnexpectedEof)?;
        if data.len().saturating_sub(off) < freq_bytes {
            return Err(CodecError::UnexpectedEof);
        }
        let mut frequencies = BTreeMap::new();
        for _ in 0..freq_size {
            let symbol = read_i32(data, &mut off)?;
            let count = read_i32(data, &mut off)?;
            if count <= 0 {
                return Err(CodecError::InvalidHeader("nonpositive symbol count"));
            }
            frequencies.insert(symbol, count as u32);
        }

        let encoded_len = read_i32(data, &mut off)?;
        if encoded_len < 0 {
            return Err(CodecError::InvalidHeader("negative payload length"));
        }
        let rle_len = read_i32(data, &mut off)?;
        if rle_len < 0 || rle_len % 2 != 0 {
            return Err(CodecError::InvalidHeader("invalid RLE sequence length"));
        }
        // Every Huffman symbol consumes at least one payload bit, so a
        // symbol count beyond encoded_len * 8 cannot be honest. Checking
        // here keeps the decoder from preallocating for it.
        if rle_len as i64 > encoded_len as i64 * 8 {
            return Err(CodecError::InvalidHeader("RLE length exceeds payload bits"));
        }

        Ok((
            Self {
                quality,
                height,
                width,
                frequencies,
                encoded_len,
                rle_len,
            },
            off,
        ))
    }
}

fn read_i32(data: &[u8], off: &mut usize) -> Result<i32> {
    let slice = data
        .get(*off..*off + 4)
        .ok_or(CodecError::UnexpectedEof)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    *off += 4;
    Ok(i32::from_ne_bytes(bytes))
}

fn read_u32(data: &[u8], off: &mut usize) -> Result<u32> {
    Ok(read_i32(data, off)? as u32)
}
