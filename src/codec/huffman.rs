// Copyright (c) 2026 the stegopress developers
// SPDX-License-Identifier: GPL-3.0-only

//! Dynamic Huffman coding over the RLE symbol stream.
//!
//! The tree is never serialized; the container carries the frequency table
//! and both sides rebuild the tree from it. Construction must therefore be
//! fully deterministic: leaves are inserted in ascending symbol order
//! (`BTreeMap` iteration) and the priority queue breaks frequency ties by
//! insertion order, never by symbol value.
//!
//! Nodes live in an arena `Vec` and reference children by index.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use super::bitio::{BitReader, BitWriter};
use super::error::{CodecError, Result};

/// Count symbol occurrences, keyed in ascending symbol order.
pub fn count_frequencies(symbols: &[i32]) -> BTreeMap<i32, u32> {
    let mut freqs = BTreeMap::new();
    for &s in symbols {
        *freqs.entry(s).or_insert(0u32) += 1;
    }
    freqs
}

/// Frequencies live in the build queue only; once the tree shape is fixed
/// they are never consulted again.
#[derive(Debug, Clone)]
struct Node {
    /// `Some` for leaves, `None` for internal nodes.
    symbol: Option<i32>,
    left: Option<usize>,
    right: Option<usize>,
}

/// A prefix-code tree built from a frequency table.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Greedy bottom-up construction: repeatedly merge the two
    /// lowest-frequency nodes until one remains. A single-symbol alphabet
    /// yields a lone leaf whose code is one '0' bit.
    ///
    /// # Errors
    /// `EmptyFrequencyTable` if `frequencies` has no entries.
    pub fn build(frequencies: &BTreeMap<i32, u32>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(CodecError::EmptyFrequencyTable);
        }

        let mut nodes = Vec::with_capacity(frequencies.len() * 2);
        // Min-heap on (frequency, insertion order). The insertion counter
        // keeps tie-breaking independent of symbol values.
        let mut queue = BinaryHeap::new();
        let mut order = 0u64;

        for (&symbol, &count) in frequencies {
            let idx = nodes.len();
            nodes.push(Node {
                symbol: Some(symbol),
                left: None,
                right: None,
            });
            queue.push(Reverse((count as u64, order, idx)));
            order += 1;
        }

        while queue.len() > 1 {
            let (Some(Reverse((f_left, _, left))), Some(Reverse((f_right, _, right)))) =
                (queue.pop(), queue.pop())
            else {
                break;
            };
            let idx = nodes.len();
            nodes.push(Node {
                symbol: None,
                left: Some(left),
                right: Some(right),
            });
            queue.push(Reverse((f_left + f_right, order, idx)));
            order += 1;
        }

        match queue.pop() {
            Some(Reverse((_, _, root))) => Ok(Self { nodes, root }),
            None => Err(CodecError::EmptyFrequencyTable),
        }
    }

    /// Code bits per symbol: '1' on the left branch, '0' on the right.
    pub fn codes(&self) -> HashMap<i32, Vec<u8>> {
        let mut codes = HashMap::new();
        let root = &self.nodes[self.root];
        if let Some(symbol) = root.symbol {
            // Degenerate single-leaf tree.
            codes.insert(symbol, vec![0]);
            return codes;
        }
        let mut stack = vec![(self.root, Vec::new())];
        while let Some((idx, prefix)) = stack.pop() {
            let node = &self.nodes[idx];
            if let Some(symbol) = node.symbol {
                codes.insert(symbol, prefix);
                continue;
            }
            if let Some(left) = node.left {
                let mut code = prefix.clone();
                code.push(1);
                stack.push((left, code));
            }
            if let Some(right) = node.right {
                let mut code = prefix;
                code.push(0);
                stack.push((right, code));
            }
        }
        codes
    }

    /// Decode exactly `count` symbols from the bit stream.
    ///
    /// The stream carries no sentinel; the caller supplies the symbol count
    /// recorded in the container header.
    ///
    /// # Errors
    /// `TruncatedBitstream` if the bits run out before `count` symbols.
    pub fn decode(&self, reader: &mut BitReader<'_>, count: usize) -> Result<Vec<i32>> {
        let mut out = Vec::with_capacity(count);

        if let Some(symbol) = self.nodes[self.root].symbol {
            // Degenerate tree: one bit per symbol.
            for _ in 0..count {
                reader
                    .read_bit()
                    .map_err(|_| CodecError::TruncatedBitstream)?;
                out.push(symbol);
            }
            return Ok(out);
        }

        while out.len() < count {
            let mut idx = self.root;
            loop {
                let bit = reader
                    .read_bit()
                    .map_err(|_| CodecError::TruncatedBitstream)?;
                let node = &self.nodes[idx];
                let next = if bit == 1 { node.left } else { node.right };
                idx = next.ok_or(CodecError::TruncatedBitstream)?;
                if let Some(symbol) = self.nodes[idx].symbol {
                    out.push(symbol);
                    break;
                }
            }
        }
        Ok(out)
    }
}

/// Encode a symbol sequence with the given code table; returns the packed
/// bytes and the exact bit length before padding.
///
/// # Errors
/// `MissingHuffmanCode` if a symbol has no code (the codes were built from
/// a different sequence).
pub fn encode_symbols(symbols: &[i32], codes: &HashMap<i32, Vec<u8>>) -> Result<(Vec<u8>, usize)> {
    let mut writer = BitWriter::new();
    for &s in symbols {
        let code = codes.get(&s).ok_or(CodecError::MissingHuffmanCode(s))?;
        for &bit in code {
            writer.write_bit(bit);
        }
    }
    let bit_len = writer.bit_len();
    Ok((writer.finish(), bit_len))
}
