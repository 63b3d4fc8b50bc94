//! Canonical Huffman code construction and decoding.
//!
//! The decoder here is the canonical-table representation from the
//! design notes rather than a linked binary tree: `count[len]` holds how
//! many symbols share each code length, and `symbol[]` holds every
//! symbol with nonzero length in order of (length, symbol value). This
//! sidesteps the raw-pointer-tree ownership questions a naive port of
//! the reference implementation runs into, at the cost of a slightly
//! less obvious decode loop — the loop below is the textbook algorithm
//! from RFC 1951's reference decoder (`puff.c`), adapted to read bits
//! from a `BitReader` instead of a flat buffer.

use crate::bitreader::BitReader;
use crate::error::{InflateError, Result};
use std::io::Read;

const MAXBITS: usize = 15;

/// A canonical Huffman decoder built from a vector of per-symbol code
/// lengths (0 meaning "symbol absent from this tree").
pub struct HuffmanTree {
    count: [u16; MAXBITS + 1],
    symbol: Vec<u16>,
}

impl HuffmanTree {
    /// Builds a decoder for an alphabet whose `lengths[i]` gives the
    /// code length, in bits, of symbol `i`.
    pub fn build(lengths: &[u16]) -> Result<HuffmanTree> {
        let mut count = [0u16; MAXBITS + 1];
        for &len in lengths {
            count[len as usize] += 1;
        }

        // A tree with nothing but zero-length entries decodes nothing;
        // callers (the dynamic/fixed tree readers) treat this as a
        // valid but empty alphabet, e.g. an unused distance tree.
        if count[0] as usize == lengths.len() {
            return Ok(HuffmanTree {
                count,
                symbol: Vec::new(),
            });
        }

        // Kraft inequality: each additional bit of depth doubles the
        // available code space: if the counts ever claim more codes
        // than the space at that depth allows, the tree is malformed.
        let mut left: i64 = 1;
        for i in 1..=MAXBITS {
            left *= 2;
            left -= count[i] as i64;
            if left < 0 {
                return Err(InflateError::MalformedTree.into());
            }
        }

        let mut offs = [0u16; MAXBITS + 1];
        for i in 1..MAXBITS {
            offs[i + 1] = offs[i] + count[i];
        }

        let mut symbol = vec![0u16; lengths.len()];
        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                let idx = offs[len as usize] as usize;
                symbol[idx] = sym as u16;
                offs[len as usize] += 1;
            }
        }

        Ok(HuffmanTree { count, symbol })
    }

    /// Decodes one symbol by walking the input bit by bit, MSB-first,
    /// until the accumulated code falls within the range of codes of
    /// some length `len`.
    pub fn decode_symbol<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        let mut code: i32 = 0;
        let mut first: i32 = 0;
        let mut index: i32 = 0;
        for len in 1..=MAXBITS {
            code |= bits.next_bit()? as i32;
            let count = self.count[len] as i32;
            if code - first < count {
                return Ok(self.symbol[(index + (code - first)) as usize]);
            }
            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }
        Err(InflateError::InvalidPrefix.into())
    }
}
