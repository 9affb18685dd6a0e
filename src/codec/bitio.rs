// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! MSB-first bit packing for the entropy-coded payload.
//!
//! The container format has no byte-stuffing: bits are packed densely and
//! the final partial byte is padded with zero bits. The pad bits are never
//! decoded; the reader is always bounded by a symbol count from the header.

use super::error::{CodecError, Result};

/// Packs bits MSB-first into a byte vector.
pub struct BitWriter {
    out: Vec<u8>,
    buf: u8,
    bits_used: u8,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            buf: 0,
            bits_used: 0,
            bit_len: 0,
        }
    }

    /// Write a single bit (any nonzero `bit` counts as 1).
    pub fn write_bit(&mut self, bit: u8) {
        self.buf = (self.buf << 1) | (bit & 1);
        self.bits_used += 1;
        self.bit_len += 1;
        if self.bits_used == 8 {
            self.out.push(self.buf);
            self.buf = 0;
            self.bits_used = 0;
        }
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Flush the final partial byte (zero-padded) and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_used > 0 {
            self.out.push(self.buf << (8 - self.bits_used));
        }
        self.out
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte slice.
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Read the next bit, or `UnexpectedEof` past the end of the data.
    pub fn read_bit(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.byte_pos)
            .ok_or(CodecError::UnexpectedEof)?;
        let bit = (byte >> (7 - self.bit_pos)) & 1;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        Ok(bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read_bits() {
        let mut w = BitWriter::new();
        let pattern = [1u8, 0, 1, 1, 0, 0, 1, 0, 1, 1, 1];
        for &b in &pattern {
            w.write_bit(b);
        }
        assert_eq!(w.bit_len(), 11);
        let bytes = w.finish();
        assert_eq!(bytes.len(), 2);
        // 10110010 111_00000
        assert_eq!(bytes[0], 0b1011_0010);
        assert_eq!(bytes[1], 0b1110_0000);

        let mut r = BitReader::new(&bytes);
        for &b in &pattern {
            assert_eq!(r.read_bit().unwrap(), b);
        }
    }

    #[test]
    fn reader_hits_eof() {
        let bytes = [0xFFu8];
        let mut r = BitReader::new(&bytes);
        for _ in 0..8 {
            r.read_bit().unwrap();
        }
        assert!(matches!(r.read_bit(), Err(CodecError::UnexpectedEof)));
    }

    #[test]
    fn empty_writer_yields_no_bytes() {
        assert!(BitWriter::new().finish().is_empty());
    }
}
