// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! The codec pipeline: color transform → 8×8 DCT → quantization → zigzag →
//! RLE → Huffman → container, and the mirror decode path.
//!
//! [`CodecImage`] owns every intermediate buffer of one pipeline invocation
//! and tracks progress with a [`Stage`] tag. Stage steps are fail-soft: a
//! step whose source buffer is absent logs a warning and returns unchanged,
//! so callers sequence stages without fear of panics; the terminal
//! operations (`encode_to_vec`, `reconstruct_rgb`) return hard errors
//! instead.

pub mod bitio;
pub mod block;
pub mod color;
pub mod container;
pub mod dct;
pub mod error;
pub mod huffman;
pub mod pixels;
pub mod quant;
pub mod rle;
pub mod zigzag;

use block::{BlockGrid, Channel};
use container::ContainerHeader;
use error::{CodecError, Result};
use pixels::{RgbImage, YcbcrImage};
use quant::QuantTables;

/// Pipeline progress for one image instance.
///
/// Encode advances left to right; decode walks the same stages in reverse
/// and terminates at `RawLoaded`, or short-circuits to `ExtractedPayload`
/// when only payload recovery is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RawLoaded,
    ColorConverted,
    BlockTransformed,
    Quantized,
    Embedded,
    Scanned,
    RunLengthEncoded,
    EntropyEncoded,
    Serialized,
    ExtractedPayload,
}

/// One in-flight encode or decode, owning all intermediate representations.
///
/// Raw DCT blocks and quantized blocks are mutually exclusive slots:
/// quantization moves the grid into the quantized slot, dequantization
/// moves it back.
pub struct CodecImage {
    quality: i32,
    width: usize,
    height: usize,
    tables: QuantTables,
    rgb: Option<RgbImage>,
    ycbcr: Option<YcbcrImage>,
    dct: Option<BlockGrid>,
    quantized: Option<BlockGrid>,
    stage: Stage,
    successfully_encoded: bool,
}

impl CodecImage {
    /// Start a pipeline from raw RGB pixels. Width and height are truncated
    /// down to multiples of 8; trailing rows/columns are dropped.
    pub fn from_rgb(img: RgbImage, quality: i32) -> Self {
        let img = img.truncate_to_blocks();
        let (width, height) = (img.width(), img.height());
        Self {
            quality,
            width,
            height,
            tables: QuantTables::for_quality(quality),
            rgb: Some(img),
            ycbcr: None,
            dct: None,
            quantized: None,
            stage: Stage::RawLoaded,
            successfully_encoded: true,
        }
    }

    /// Start a pipeline from PNG bytes.
    ///
    /// # Errors
    /// `Image` if the bytes are not a decodable PNG.
    pub fn from_png_bytes(bytes: &[u8], quality: i32) -> Result<Self> {
        Ok(Self::from_rgb(RgbImage::from_png_bytes(bytes)?, quality))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn quality(&self) -> i32 {
        self.quality
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Change the quality, regenerating the quantization tables. Has no
    /// effect on blocks that were already quantized with the old tables.
    pub fn set_quality(&mut self, quality: i32) {
        if self.quantized.is_some() {
            log::warn!("quality changed after quantization; existing blocks keep the old tables");
        }
        self.quality = quality;
        self.tables = QuantTables::for_quality(quality);
    }

    pub fn rgb(&self) -> Option<&RgbImage> {
        self.rgb.as_ref()
    }

    /// The quantized coefficient grid, if quantization has run (encode) or a
    /// container was parsed (decode). This is the coefficient-domain
    /// steganography carrier.
    pub fn quantized(&self) -> Option<&BlockGrid> {
        self.quantized.as_ref()
    }

    pub fn quantized_mut(&mut self) -> Option<&mut BlockGrid> {
        self.quantized.as_mut()
    }

    /// Whether every embed on this image has succeeded so far.
    pub fn successfully_encoded(&self) -> bool {
        self.successfully_encoded
    }

    /// Record a failed payload embed. `encode_to_vec` refuses to serialize
    /// afterwards, so a truncated payload can never reach a container.
    pub(crate) fn mark_embed_failed(&mut self) {
        self.successfully_encoded = false;
    }

    /// Record a successful payload embed.
    pub(crate) fn mark_embedded(&mut self) {
        self.stage = Stage::Embedded;
    }

    /// Record that decode stopped at payload extraction, skipping full
    /// image reconstruction.
    pub(crate) fn mark_payload_extracted(&mut self) {
        self.stage = Stage::ExtractedPayload;
    }

    /// Color transform, RGB → YCbCr. No-op with a warning if no RGB data is
    /// loaded.
    pub fn rgb_to_ycbcr(&mut self) {
        let Some(rgb) = self.rgb.as_ref() else {
            log::warn!("rgb_to_ycbcr: no RGB data loaded");
            return;
        };
        self.ycbcr = Some(color::rgb_to_ycbcr(rgb));
        self.stage = Stage::ColorConverted;
    }

    /// Inverse color transform, YCbCr → RGB. No-op with a warning if no
    /// YCbCr data exists.
    pub fn ycbcr_to_rgb(&mut self) {
        let Some(ycbcr) = self.ycbcr.as_ref() else {
            log::warn!("ycbcr_to_rgb: no YCbCr data loaded");
            return;
        };
        self.rgb = Some(color::ycbcr_to_rgb(ycbcr));
        self.stage = Stage::RawLoaded;
    }

    /// Split the YCbCr buffer into blocks and apply the forward DCT to every
    /// channel. No-op with a warning if the color transform hasn't run.
    pub fn generate_dct_blocks(&mut self) {
        let Some(ycbcr) = self.ycbcr.as_ref() else {
            log::warn!("generate_dct_blocks: no YCbCr data loaded");
            return;
        };
        let mut grid = BlockGrid::split_samples(ycbcr);
        for block in grid.blocks_mut() {
            for ch in Channel::ALL {
                let transformed = dct::forward_dct(block.channel(ch));
                *block.channel_mut(ch) = transformed;
            }
        }
        self.dct = Some(grid);
        self.stage = Stage::BlockTransformed;
    }

    /// Apply the inverse DCT to every channel and merge blocks back into a
    /// YCbCr buffer, clamping samples into [16,255]. No-op with a warning if
    /// no DCT blocks exist.
    pub fn invert_dct_blocks(&mut self) {
        let Some(grid) = self.dct.as_mut() else {
            log::warn!("invert_dct_blocks: no DCT blocks generated");
            return;
        };
        for block in grid.blocks_mut() {
            for ch in Channel::ALL {
                let restored = dct::inverse_dct(block.channel(ch));
                *block.channel_mut(ch) = restored;
            }
        }
        self.ycbcr = Some(grid.merge_samples());
        self.stage = Stage::ColorConverted;
    }

    /// Quantize all DCT blocks in place, moving the grid into the quantized
    /// slot. No-op with a warning if no DCT blocks exist.
    pub fn quantize_blocks(&mut self) {
        let Some(mut grid) = self.dct.take() else {
            log::warn!("quantize_blocks: no DCT blocks generated");
            return;
        };
        for block in grid.blocks_mut() {
            for ch in Channel::ALL {
                quant::quantize(block.channel_mut(ch), self.tables.table(ch));
            }
        }
        self.quantized = Some(grid);
        self.stage = Stage::Quantized;
    }

    /// Dequantize all blocks, recreating the DCT-block slot from quantized
    /// data. No-op with a warning if no quantized blocks exist.
    pub fn dequantize_blocks(&mut self) {
        let Some(mut grid) = self.quantized.take() else {
            log::warn!("dequantize_blocks: no quantized blocks");
            return;
        };
        for block in grid.blocks_mut() {
            for ch in Channel::ALL {
                quant::dequantize(block.channel_mut(ch), self.tables.table(ch));
            }
        }
        self.dct = Some(grid);
        self.stage = Stage::BlockTransformed;
    }

    /// Run any missing forward stages and serialize to container bytes.
    ///
    /// # Errors
    /// - `EmbedFailed` if a payload embed on this image failed.
    /// - `NoImageData` if no pixel data was ever loaded (or the image is
    ///   empty after 8-alignment truncation).
    pub fn encode_to_vec(&mut self) -> Result<Vec<u8>> {
        if !self.successfully_encoded {
            return Err(CodecError::EmbedFailed);
        }

        // Catch up on whatever stages haven't run yet.
        if self.quantized.is_none() {
            if self.ycbcr.is_none() {
                self.rgb_to_ycbcr();
            }
            if self.dct.is_none() {
                self.generate_dct_blocks();
            }
            self.quantize_blocks();
        }
        let grid = self.quantized.as_ref().ok_or(CodecError::NoImageData)?;
        if grid.is_empty() {
            return Err(CodecError::NoImageData);
        }

        // Zigzag scan: channels Y, Cb, Cr per block, blocks in raster order.
        let mut sequence = Vec::with_capacity(grid.len() * 192);
        for block in grid.blocks() {
            for ch in Channel::ALL {
                zigzag::zigzag_block(block.channel(ch), &mut sequence);
            }
        }
        self.stage = Stage::Scanned;

        let pairs = rle::encode_rle(&sequence);
        self.stage = Stage::RunLengthEncoded;

        let frequencies = huffman::count_frequencies(&pairs);
        let tree = huffman::HuffmanTree::build(&frequencies)?;
        let (payload, bit_len) = huffman::encode_symbols(&pairs, &tree.codes())?;
        self.stage = Stage::EntropyEncoded;
        log::debug!(
            "encoded {}x{} q{}: {} rle symbols, {} payload bits",
            self.width,
            self.height,
            self.quality,
            pairs.len(),
            bit_len
        );

        let header = ContainerHeader {
            quality: self.quality,
            height: self.height as i32,
            width: self.width as i32,
            frequencies,
            encoded_len: payload.len() as i32,
            rle_len: pairs.len() as i32,
        };
        let mut out = Vec::with_capacity(payload.len() + 64);
        header.write_to(&mut out);
        out.extend_from_slice(&payload);
        self.stage = Stage::Serialized;
        Ok(out)
    }

    /// Serialize to a container file.
    ///
    /// # Errors
    /// Everything from [`encode_to_vec`](Self::encode_to_vec), plus `Io` on
    /// write failure.
    pub fn encode_to_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.encode_to_vec()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Parse container bytes down to the quantized coefficient grid.
    ///
    /// The returned image sits at [`Stage::Quantized`]; callers either
    /// extract an embedded payload from [`quantized`](Self::quantized) or
    /// continue with [`reconstruct_rgb`](Self::reconstruct_rgb).
    ///
    /// # Errors
    /// `UnexpectedEof`, `InvalidHeader`, `TruncatedBitstream`,
    /// `EmptyFrequencyTable`, or `InvalidRle` on malformed input.
    pub fn decode_from_slice(data: &[u8]) -> Result<Self> {
        let (header, payload_off) = ContainerHeader::read_from(data)?;
        let encoded_len = header.encoded_len as usize;
        let payload = data
            .get(payload_off..payload_off + encoded_len)
            .ok_or(CodecError::UnexpectedEof)?;

        let width = header.width as usize;
        let height = header.height as usize;
        // The grid consumes exactly this many coefficients; a well-formed
        // container never expands past it.
        let max_coeffs = width * height * 3;

        let tree = huffman::HuffmanTree::build(&header.frequencies)?;
        let mut reader = bitio::BitReader::new(payload);
        let rle_len = header.rle_len as usize;
        let pairs = tree.decode(&mut reader, rle_len)?;
        let sequence = rle::decode_rle(&pairs, rle_len, max_coeffs)?;

        let mut grid = BlockGrid::new(width / 8, height / 8);
        for (idx, block) in grid.blocks_mut().iter_mut().enumerate() {
            for (c, ch) in Channel::ALL.into_iter().enumerate() {
                *block.channel_mut(ch) = zigzag::dezigzag_block(&sequence, idx * 192 + c * 64);
            }
        }
        log::debug!(
            "decoded {}x{} q{}: {} rle symbols",
            width,
            height,
            header.quality,
            pairs.len()
        );

        Ok(Self {
            quality: header.quality,
            width,
            height,
            tables: QuantTables::for_quality(header.quality),
            rgb: None,
            ycbcr: None,
            dct: None,
            quantized: Some(grid),
            stage: Stage::Quantized,
            successfully_encoded: true,
        })
    }

    /// Parse a container file.
    ///
    /// # Errors
    /// Everything from [`decode_from_slice`](Self::decode_from_slice), plus
    /// `Io` on read failure.
    pub fn decode_from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::decode_from_slice(&data)
    }

    /// Complete the decode path: dequantize, inverse DCT, inverse color
    /// transform; returns the reconstructed RGB image.
    ///
    /// # Errors
    /// `NoImageData` if there are no quantized blocks to reconstruct from.
    pub fn reconstruct_rgb(&mut self) -> Result<&RgbImage> {
        if self.quantized.is_none() && self.dct.is_none() {
            return Err(CodecError::NoImageData);
        }
        if self.quantized.is_some() {
            self.dequantize_blocks();
        }
        self.invert_dct_blocks();
        self.ycbcr_to_rgb();
        self.rgb.as_ref().ok_or(CodecError::NoImageData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: usize, height: usize) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set(
                    x,
                    y,
                    (
                        ((x * 7 + y * 13) % 256) as u8,
                        ((x * 11 + y * 3) % 256) as u8,
                        ((x * 5 + y * 17) % 256) as u8,
                    ),
                );
            }
        }
        img
    }

    #[test]
    fn stage_steps_are_fail_soft() {
        let mut img = CodecImage::from_rgb(RgbImage::new(8, 8), 50);
        // DCT before color transform: warned no-op.
        img.generate_dct_blocks();
        assert_eq!(img.stage(), Stage::RawLoaded);
        assert!(img.quantized().is_none());
        // Quantize before DCT: warned no-op.
        img.quantize_blocks();
        assert_eq!(img.stage(), Stage::RawLoaded);

        img.rgb_to_ycbcr();
        assert_eq!(img.stage(), Stage::ColorConverted);
        img.generate_dct_blocks();
        assert_eq!(img.stage(), Stage::BlockTransformed);
        img.quantize_blocks();
        assert_eq!(img.stage(), Stage::Quantized);
        assert!(img.quantized().is_some());
    }

    #[test]
    fn dimensions_truncate_to_blocks() {
        let img = CodecImage::from_rgb(RgbImage::new(13, 22), 50);
        assert_eq!((img.width(), img.height()), (8, 16));
    }

    #[test]
    fn encode_runs_missing_stages() {
        let mut img = CodecImage::from_rgb(gradient_image(16, 16), 50);
        assert_eq!(img.stage(), Stage::RawLoaded);
        let bytes = img.encode_to_vec().unwrap();
        assert_eq!(img.stage(), Stage::Serialized);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn empty_image_cannot_encode() {
        let mut img = CodecImage::from_rgb(RgbImage::new(4, 4), 50); // truncates to 0x0
        assert!(matches!(
            img.encode_to_vec(),
            Err(CodecError::NoImageData)
        ));
    }

    #[test]
    fn embed_failure_blocks_serialization() {
        let mut img = CodecImage::from_rgb(gradient_image(8, 8), 50);
        img.mark_embed_failed();
        assert!(matches!(img.encode_to_vec(), Err(CodecError::EmbedFailed)));
    }

    #[test]
    fn container_round_trip_preserves_coefficients() {
        let mut img = CodecImage::from_rgb(gradient_image(24, 16), 60);
        let bytes = img.encode_to_vec().unwrap();

        let decoded = CodecImage::decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded.stage(), Stage::Quantized);
        assert_eq!((decoded.width(), decoded.height()), (24, 16));
        assert_eq!(decoded.quality(), 60);
        // The quantized grid survives entropy coding bit-exactly.
        assert_eq!(decoded.quantized(), img.quantized());
    }

    #[test]
    fn reconstruct_without_data_fails() {
        let mut img = CodecImage::from_rgb(RgbImage::new(8, 8), 50);
        img.rgb = None;
        assert!(matches!(
            img.reconstruct_rgb(),
            Err(CodecError::NoImageData)
        ));
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let mut img = CodecImage::from_rgb(gradient_image(8, 8), 50);
        let bytes = img.encode_to_vec().unwrap();
        assert!(CodecImage::decode_from_slice(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn decode_rejects_runaway_run_counts() {
        // Hand-built container for an 8x8 image whose single RLE pair
        // claims a 100-million-element run. Decode must reject it instead
        // of materializing a ~400 MB sequence for 192 coefficients.
        let pairs = vec![0i32, 100_000_000];
        let frequencies = huffman::count_frequencies(&pairs);
        let tree = huffman::HuffmanTree::build(&frequencies).unwrap();
        let (payload, _) = huffman::encode_symbols(&pairs, &tree.codes()).unwrap();
        let header = ContainerHeader {
            quality: 50,
            height: 8,
            width: 8,
            frequencies,
            encoded_len: payload.len() as i32,
            rle_len: pairs.len() as i32,
        };
        let mut bytes = Vec::new();
        header.write_to(&mut bytes);
        bytes.extend_from_slice(&payload);

        assert!(matches!(
            CodecImage::decode_from_slice(&bytes),
            Err(CodecError::InvalidRle(_))
        ));
    }

    #[test]
    fn reconstruction_of_solid_gray_is_close() {
        let mut img = RgbImage::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, (128, 128, 128));
            }
        }
        let mut enc = CodecImage::from_rgb(img, 50);
        let bytes = enc.encode_to_vec().unwrap();

        let mut dec = CodecImage::decode_from_slice(&bytes).unwrap();
        let out = dec.reconstruct_rgb().unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
        for y in 0..8 {
            for x in 0..8 {
                let (r, g, b) = out.get(x, y);
                for (label, v) in [("r", r), ("g", g), ("b", b)] {
                    assert!(
                        (v as i32 - 128).abs() <= 2,
                        "{label}({x},{y}) = {v}, expected within 2 of 128"
                    );
                }
            }
        }
        assert_eq!(dec.stage(), Stage::RawLoaded);
    }
}
