//! Parses the per-block preamble of a dynamic-Huffman (BTYPE=10) block:
//! the HLIT/HDIST/HCLEN counts, the 19-symbol code-length alphabet used
//! to describe the two real trees, and the run-length-encoded vector of
//! code lengths those produce.

use std::io::Read;

use crate::bitreader::BitReader;
use crate::error::{InflateError, Result};
use crate::huffman::HuffmanTree;

/// Upper bound on HLIT (257 + 31).
const MAXLCODES: u16 = 288;
/// Upper bound on HDIST (1 + 31).
const MAXDCODES: u16 = 32;

/// Order in which the HCLEN code-length codes appear in the stream;
/// this permutation puts the codes most likely to be used (16, 17, 18,
/// 0) first so that trailing all-zero entries can be omitted via HCLEN.
const ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Reads the dynamic-block preamble and returns the literal/length and
/// distance trees it describes.
pub fn read_dynamic_trees<R: Read>(bits: &mut BitReader<R>) -> Result<(HuffmanTree, HuffmanTree)> {
    let hlit = bits.read_bits_lsb(5)? + 257;
    let hdist = bits.read_bits_lsb(5)? + 1;
    let hclen = bits.read_bits_lsb(4)? + 4;

    if hlit > MAXLCODES || hdist > MAXDCODES {
        return Err(InflateError::LengthsOverflow.into());
    }

    let mut cl_lengths = [0u16; 19];
    for i in 0..(hclen as usize) {
        cl_lengths[ORDER[i]] = bits.read_bits_lsb(3)?;
    }
    let cl_tree = HuffmanTree::build(&cl_lengths)?;

    let total = (hlit + hdist) as usize;
    let mut lengths: Vec<u16> = Vec::with_capacity(total);

    while lengths.len() < total {
        let symbol = cl_tree.decode_symbol(bits)?;
        match symbol {
            0..=15 => lengths.push(symbol),
            16 => {
                let prev = *lengths
                    .last()
                    .ok_or(InflateError::InvalidRepeat)?;
                let repeat = bits.read_bits_lsb(2)? as usize + 3;
                push_repeated(&mut lengths, prev, repeat, total)?;
            }
            17 => {
                let repeat = bits.read_bits_lsb(3)? as usize + 3;
                push_repeated(&mut lengths, 0, repeat, total)?;
            }
            18 => {
                let repeat = bits.read_bits_lsb(7)? as usize + 11;
                push_repeated(&mut lengths, 0, repeat, total)?;
            }
            _ => return Err(InflateError::InvalidPrefix.into()),
        }
    }

    let lit_lengths = &lengths[..hlit as usize];
    let dist_lengths = &lengths[hlit as usize..total];

    let lit_tree = HuffmanTree::build(lit_lengths)?;
    let dist_tree = HuffmanTree::build(dist_lengths)?;
    Ok((lit_tree, dist_tree))
}

fn push_repeated(lengths: &mut Vec<u16>, value: u16, repeat: usize, total: usize) -> Result<()> {
    if lengths.len() + repeat > total {
        return Err(InflateError::LengthsOverflow.into());
    }
    for _ in 0..repeat {
        lengths.push(value);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::read_dynamic_trees;
    use crate::bitreader::BitReader;

    /// A minimal bit writer, LSB-first per field, matching
    /// `BitReader::read_bits_lsb`'s convention. Test-only.
    struct BitWriter {
        bytes: Vec<u8>,
        bitbuf: u32,
        bitcnt: u32,
    }

    impl BitWriter {
        fn new() -> Self {
            BitWriter {
                bytes: Vec::new(),
                bitbuf: 0,
                bitcnt: 0,
            }
        }

        fn write_bits_lsb(&mut self, value: u32, n: u32) {
            for i in 0..n {
                let bit = (value >> i) & 1;
                self.bitbuf |= bit << self.bitcnt;
                self.bitcnt += 1;
                if self.bitcnt == 8 {
                    self.bytes.push(self.bitbuf as u8);
                    self.bitbuf = 0;
                    self.bitcnt = 0;
                }
            }
        }

        fn finish(mut self) -> Vec<u8> {
            if self.bitcnt > 0 {
                self.bytes.push(self.bitbuf as u8);
            }
            self.bytes
        }
    }

    #[test]
    fn hclen_zero_only_declares_four_positions() {
        // HLIT=257 (0), HDIST=1 (0), HCLEN=0 (0b0000 -> +4 = 4 codes)
        // -> only positions 16,17,18,0 (per ORDER) get 3-bit lengths.
        // Give code length 1 to symbol 0 (order position 3) so the
        // code-length tree is a trivial single-code tree, then encode
        // 258 zero-length-code-length symbols (HLIT+HDIST=258) as 258
        // single 0 bits, each decoding to code-length-alphabet symbol 0
        // (length 0).
        let mut w = BitWriter::new();
        w.write_bits_lsb(0, 5); // hlit = 257
        w.write_bits_lsb(0, 5); // hdist = 1
        w.write_bits_lsb(0, 4); // hclen = 4
        w.write_bits_lsb(0, 3); // length for order[0]=16 -> 0
        w.write_bits_lsb(0, 3); // order[1]=17 -> 0
        w.write_bits_lsb(0, 3); // order[2]=18 -> 0
        w.write_bits_lsb(1, 3); // order[3]=0  -> 1 (single-symbol tree)
        for _ in 0..258 {
            w.write_bits_lsb(0, 1); // symbol 0 under a length-1 code
        }
        let bytes = w.finish();
        let mut bits = BitReader::new(&bytes[..]);
        let (lit, dist) = read_dynamic_trees(&mut bits).unwrap();
        // All 257 literal/length lengths are 0 except... all zero here,
        // so building succeeds as the degenerate empty tree; just
        // confirm construction didn't error.
        let _ = (lit, dist);
    }

    #[test]
    fn repeat_16_as_first_symbol_is_rejected() {
        let mut w = BitWriter::new();
        w.write_bits_lsb(0, 5); // hlit = 257
        w.write_bits_lsb(0, 5); // hdist = 1
        w.write_bits_lsb(15, 4); // hclen = 19, all ORDER positions explicit
        // order[0] (meta-symbol 16) gets a length-1 code, every other
        // meta-symbol gets length 0.
        w.write_bits_lsb(1, 3);
        for _ in 1..19 {
            w.write_bits_lsb(0, 3);
        }
        w.write_bits_lsb(0, 1); // decodes to meta-symbol 16 immediately
        w.write_bits_lsb(0, 2); // repeat count bits (unused, error fires first)
        let bytes = w.finish();
        let mut bits = BitReader::new(&bytes[..]);
        assert!(read_dynamic_trees(&mut bits).is_err());
    }
}
