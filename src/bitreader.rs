//! Bit-level reader over an arbitrary byte source.
//!
//! DEFLATE packs most fixed-width fields LSB-first within the bitstream
//! (the first bit read becomes bit 0 of the assembled integer) but
//! transmits Huffman codes MSB-first (the first bit read is the top bit
//! of the code being walked). Both conventions are exposed here so the
//! rest of the crate never has to reason about bit order itself.

use std::io::{self, Read};

use crate::error::{InflateError, Result};

/// A byte cursor with sub-byte granularity. Bits within a byte are
/// consumed LSB-first; a byte is refilled from the source as soon as
/// its last bit has been consumed.
pub struct BitReader<R> {
    inner: R,
    bitbuf: u32,
    bitcnt: u32,
}

impl<R: Read> BitReader<R> {
    /// Wraps `inner`, starting with an empty bit buffer.
    pub fn new(inner: R) -> BitReader<R> {
        BitReader {
            inner,
            bitbuf: 0,
            bitcnt: 0,
        }
    }

    /// Extracts the lowest-order unread bit, refilling from the source
    /// when the current byte is exhausted.
    pub fn next_bit(&mut self) -> Result<u32> {
        if self.bitcnt == 0 {
            let mut byte = [0u8; 1];
            match self.inner.read(&mut byte)? {
                0 => return Err(InflateError::UnexpectedEndOfInput.into()),
                _ => {}
            }
            self.bitbuf = byte[0] as u32;
            self.bitcnt = 8;
        }
        let bit = self.bitbuf & 1;
        self.bitbuf >>= 1;
        self.bitcnt -= 1;
        Ok(bit)
    }

    /// Reads `n` bits (0 <= n <= 16) and assembles them LSB-first: the
    /// first bit read occupies bit 0 of the result, the next bit 1, etc.
    pub fn read_bits_lsb(&mut self, n: u32) -> Result<u16> {
        debug_assert!(n <= 16);
        let mut value: u32 = 0;
        for i in 0..n {
            value |= self.next_bit()? << i;
        }
        Ok(value as u16)
    }

    /// Reads `n` bits and assembles them MSB-first: the first bit read
    /// becomes the top bit of the result. Used while walking a Huffman
    /// code one bit at a time during decode.
    pub fn read_bits_msb(&mut self, n: u32) -> Result<u16> {
        let mut value: u32 = 0;
        for _ in 0..n {
            value = (value << 1) | self.next_bit()?;
        }
        Ok(value as u16)
    }

    /// Discards any unread bits in the current byte, so the next read
    /// starts at a byte boundary. Required before a stored (BTYPE=00)
    /// block's LEN/NLEN fields.
    pub fn align_to_byte(&mut self) {
        self.bitbuf = 0;
        self.bitcnt = 0;
    }

    /// Reads `buf.len()` raw bytes directly from the source, bypassing
    /// the bit buffer. Only valid immediately after `align_to_byte`.
    pub fn read_aligned_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }

    /// Byte-aligns and returns the underlying reader for direct,
    /// byte-oriented access (stored-block LEN/NLEN and raw payload).
    pub fn reader_from_boundary(&mut self) -> &mut R {
        self.align_to_byte();
        &mut self.inner
    }

    /// Consumes the reader, discarding any buffered partial byte and
    /// handing back the underlying source. Used once a DEFLATE stream
    /// is fully decoded, so a container format can keep reading
    /// trailer bytes from the same source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn lsb_assembly_matches_bit_order() {
        // byte 0b1011_0010 read LSB-first bit by bit: 0,1,0,0,1,1,0,1
        let mut r = BitReader::new(&[0b1011_0010u8][..]);
        assert_eq!(r.read_bits_lsb(3).unwrap(), 0b010); // bits 0,1,0 -> value 0b010
        assert_eq!(r.read_bits_lsb(5).unwrap(), 0b10110);
    }

    #[test]
    fn msb_assembly_walks_bit_by_bit() {
        let mut r = BitReader::new(&[0b1010_0000u8][..]);
        // first four bits read are 1,0,1,0 -> MSB-first assembly is 0b1010
        assert_eq!(r.read_bits_msb(4).unwrap(), 0b1010);
    }

    #[test]
    fn refills_across_byte_boundaries() {
        let mut r = BitReader::new(&[0xFFu8, 0x00][..]);
        for _ in 0..8 {
            assert_eq!(r.next_bit().unwrap(), 1);
        }
        for _ in 0..8 {
            assert_eq!(r.next_bit().unwrap(), 0);
        }
    }

    #[test]
    fn errors_on_exhausted_source() {
        let mut r = BitReader::new(&[][..]);
        assert!(r.next_bit().is_err());
    }

    #[test]
    fn align_to_byte_discards_partial_byte() {
        let mut r = BitReader::new(&[0b1111_0000u8, 0xAB, 0xCD][..]);
        r.read_bits_lsb(3).unwrap();
        r.align_to_byte();
        let mut buf = [0u8; 2];
        r.read_aligned_bytes(&mut buf).unwrap();
        assert_eq!(buf, [0xAB, 0xCD]);
    }
}
