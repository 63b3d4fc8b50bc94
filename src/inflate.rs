//! The DEFLATE block driver (RFC 1951): reads one block header at a
//! time, selects the tree source for that block type, and resolves
//! literal/length/distance symbols against the [`OutputWindow`].

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::bitreader::BitReader;
use crate::dynamic::read_dynamic_trees;
use crate::error::{InflateError, Result};
use crate::huffman::HuffmanTree;
use crate::window::OutputWindow;

/// Base length for literal/length symbols 265..284 (symbol 285 is
/// always length 258 with no extra bits; symbols 257..264 are a flat
/// `symbol - 254`).
const LENGTH_BASE: [u16; 20] = [
    11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131, 163, 195, 227,
];

/// Base distance for distance codes 4..29.
const DIST_BASE: [u16; 26] = [
    5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537, 2049, 3073,
    4097, 6145, 8193, 12289, 16385, 24577,
];

enum DistanceSource<'a> {
    /// Fixed blocks read the 5-bit distance code directly (MSB-first,
    /// per RFC 1951 §3.2.6 — it's still a fixed-width Huffman code, just
    /// not one built from a tree), with no per-block tree construction.
    Raw,
    /// Dynamic blocks decode the distance code through its own tree.
    Tree(&'a HuffmanTree),
}

/// Drives DEFLATE block decoding over a bit-level source, streaming
/// decoded bytes to a sink as they are produced.
pub struct Inflater<R, W> {
    bits: BitReader<R>,
    window: OutputWindow<W>,
}

impl<R: Read, W: Write> Inflater<R, W> {
    /// Wraps a fresh `BitReader`/`OutputWindow` pair around `source`/`sink`.
    pub fn new(source: R, sink: W) -> Inflater<R, W> {
        Inflater {
            bits: BitReader::new(source),
            window: OutputWindow::new(sink),
        }
    }

    /// Decodes blocks until the final-block flag is set.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let bfinal = self.bits.read_bits_lsb(1)? == 1;
            let btype = self.bits.read_bits_lsb(2)?;
            log::trace!("deflate block: bfinal={bfinal} btype={btype}");
            match btype {
                0 => self.inflate_stored()?,
                1 => self.inflate_fixed()?,
                2 => self.inflate_dynamic()?,
                3 => return Err(InflateError::ReservedBlockType.into()),
                _ => unreachable!("read_bits_lsb(2) cannot exceed 3"),
            }
            if bfinal {
                return Ok(());
            }
        }
    }

    /// Byte-aligns the bit reader (discarding any unread bits of the
    /// current byte, per spec: the inflater must leave the source
    /// positioned at the first byte after the final block) and returns
    /// the underlying source and sink.
    pub fn into_parts(mut self) -> (R, W) {
        self.bits.align_to_byte();
        (self.bits.into_inner(), self.window.into_inner())
    }

    fn inflate_stored(&mut self) -> Result<()> {
        let reader = self.bits.reader_from_boundary();
        let len = reader.read_u16::<LittleEndian>()?;
        let nlen = reader.read_u16::<LittleEndian>()?;
        if nlen != !len {
            return Err(InflateError::StoredBlockLengthMismatch.into());
        }
        let mut buf = vec![0u8; len as usize];
        reader.read_exact(&mut buf)?;
        for byte in buf {
            self.window.append(byte)?;
        }
        Ok(())
    }

    fn inflate_fixed(&mut self) -> Result<()> {
        let lit_tree = fixed_literal_tree()?;
        self.decode_symbols(&lit_tree, DistanceSource::Raw)
    }

    fn inflate_dynamic(&mut self) -> Result<()> {
        let (lit_tree, dist_tree) = read_dynamic_trees(&mut self.bits)?;
        self.decode_symbols(&lit_tree, DistanceSource::Tree(&dist_tree))
    }

    fn decode_symbols(&mut self, lit_tree: &HuffmanTree, dist_source: DistanceSource) -> Result<()> {
        loop {
            let symbol = lit_tree.decode_symbol(&mut self.bits)?;
            match symbol {
                0..=255 => self.window.append(symbol as u8)?,
                256 => return Ok(()),
                257..=285 => {
                    let length = self.decode_length(symbol)?;
                    let dist_code = match &dist_source {
                        DistanceSource::Raw => self.bits.read_bits_msb(5)?,
                        DistanceSource::Tree(tree) => tree.decode_symbol(&mut self.bits)?,
                    };
                    let distance = self.decode_distance(dist_code)?;
                    self.window.copy(distance, length)?;
                }
                _ => return Err(InflateError::InvalidLengthSymbol(symbol).into()),
            }
        }
    }

    fn decode_length(&mut self, symbol: u16) -> Result<usize> {
        let length = if symbol <= 264 {
            (symbol - 254) as usize
        } else if symbol <= 284 {
            let extra_bits = (symbol - 261) / 4;
            let extra = self.bits.read_bits_lsb(extra_bits as u32)? as usize;
            LENGTH_BASE[(symbol - 265) as usize] as usize + extra
        } else {
            258
        };
        Ok(length)
    }

    fn decode_distance(&mut self, code: u16) -> Result<usize> {
        if code <= 3 {
            return Ok(code as usize + 1);
        }
        if code > 29 {
            return Err(InflateError::InvalidDistance(code as usize).into());
        }
        let extra_bits = (code - 2) / 2;
        let extra = self.bits.read_bits_lsb(extra_bits as u32)? as usize;
        Ok(DIST_BASE[(code - 4) as usize] as usize + extra)
    }
}

/// Builds the fixed literal/length tree defined by RFC 1951 §3.2.6. The
/// reference implementation this crate is grounded on declares the
/// fixed-length ranges but never actually calls its own tree-construction
/// routine on them (a latent bug); this builds the tree for real, every
/// time a fixed block is encountered. Fixed blocks have no equivalent
/// distance tree — distance codes are a fixed-width 5-bit code read
/// MSB-first, not Huffman-decoded through a tree, then interpreted
/// through the same base/extra-bits table dynamic blocks use (§4.4).
fn fixed_literal_tree() -> Result<HuffmanTree> {
    let mut lit_lengths = [0u16; 288];
    lit_lengths[0..144].fill(8);
    lit_lengths[144..256].fill(9);
    lit_lengths[256..280].fill(7);
    lit_lengths[280..288].fill(8);
    HuffmanTree::build(&lit_lengths)
}

/// Decodes a complete DEFLATE bitstream, streaming output to `sink` as
/// it is produced. Returns the underlying source (byte-aligned past the
/// final block) and the sink, so a container format can keep reading
/// trailer bytes from the same source and keep accumulating into the
/// same sink (e.g. a checksum-tracking writer).
pub fn inflate<R: Read, W: Write>(source: R, sink: W) -> Result<(R, W)> {
    let mut inflater = Inflater::new(source, sink);
    inflater.run()?;
    Ok(inflater.into_parts())
}

#[cfg(test)]
mod test {
    use super::inflate;

    fn decode(bytes: &[u8]) -> Vec<u8> {
        let (_, out) = inflate(bytes, Vec::new()).unwrap();
        out
    }

    #[test]
    fn empty_fixed_block() {
        // BFINAL=1, BTYPE=01, then the 7-bit fixed code for symbol 256
        // (end-of-block), which is 0b0000000.
        assert_eq!(decode(&[0x03, 0x00]), b"");
    }

    #[test]
    fn single_letter_fixed_block() {
        assert_eq!(decode(&[0x4B, 0x04, 0x00]), b"a");
    }

    #[test]
    fn three_letter_fixed_block() {
        assert_eq!(decode(&[0x4B, 0x4C, 0x4A, 0x06, 0x00]), b"abc");
    }

    #[test]
    fn reserved_block_type_is_rejected_with_no_output() {
        // BFINAL=1 (bit 0), BTYPE=11 (bits 1-2): first byte 0b...111,
        // i.e. low 3 bits = 0b111 = 0x07.
        let err = inflate(&[0x07][..], Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Inflate(crate::error::InflateError::ReservedBlockType)
        ));
    }

    #[test]
    fn stored_block_roundtrips_verbatim_bytes() {
        // BFINAL=1, BTYPE=00 -> 0b001 in the first (partial) byte,
        // then byte-align, LEN=5 LE, NLEN=!LEN LE, then 5 raw bytes.
        let mut stream = vec![0b001u8];
        stream.extend_from_slice(&5u16.to_le_bytes());
        stream.extend_from_slice(&(!5u16).to_le_bytes());
        stream.extend_from_slice(b"hello");
        assert_eq!(decode(&stream), b"hello");
    }

    #[test]
    fn stored_block_length_mismatch_is_rejected() {
        let mut stream = vec![0b001u8];
        stream.extend_from_slice(&5u16.to_le_bytes());
        stream.extend_from_slice(&5u16.to_le_bytes()); // wrong: should be !LEN
        stream.extend_from_slice(b"hello");
        assert!(inflate(&stream[..], Vec::new()).is_err());
    }
}
