//! GZIP container handling (RFC 1952): the fixed header, its optional
//! fields, and the trailer's CRC32/ISIZE validation, wrapped around the
//! DEFLATE inflater in `inflate`.
//!
//! Grounded on `gunzip.c`'s `gzip_header`/`gzip_file` structs and flag
//! handling, with two of its acknowledged bugs fixed per spec: the
//! trailer's CRC32 and ISIZE fields are read as full 4-byte
//! little-endian words (the reference reads only 2 bytes of each), and
//! a concatenated (multi-member) stream is decoded member by member
//! rather than stopping after the first.

use std::io::{BufRead, Write};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::checksum::crc32::Crc32;
use crate::error::{Error, GzipError, Result};
use crate::inflate;
use crate::track::TrackingWriter;

const MAGIC: [u8; 2] = [0x1F, 0x8B];
const CM_DEFLATE: u8 = 8;

const FTEXT: u8 = 0x01;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;

/// Decompresses every member of a (possibly concatenated) gzip stream,
/// writing the reconstructed bytes to `sink` as they are produced.
/// Returns the sink once the source is exhausted.
pub fn decompress<R: BufRead, W: Write>(mut source: R, sink: W) -> Result<W> {
    let mut tracking = TrackingWriter::new(sink, Crc32::new());

    while !source.fill_buf()?.is_empty() {
        read_header(&mut source)?;

        let member_start = tracking.byte_count();
        let (src, trk) = inflate::inflate(source, tracking)?;
        source = src;
        tracking = trk;
        let produced = tracking.byte_count() - member_start;

        let expected_crc = source.read_u32::<LittleEndian>().map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::Gzip(GzipError::TruncatedMember)
            } else {
                Error::Io(e)
            }
        })?;
        let expected_isize = source.read_u32::<LittleEndian>()?;

        let actual_crc = tracking.checksum();
        if actual_crc != expected_crc {
            return Err(GzipError::TrailerCrcMismatch {
                expected: expected_crc,
                actual: actual_crc,
            }
            .into());
        }

        let actual_isize = (produced & 0xFFFF_FFFF) as u32;
        if actual_isize != expected_isize {
            return Err(GzipError::TrailerSizeMismatch {
                expected: expected_isize,
                actual: actual_isize,
            }
            .into());
        }

        tracking.reset_checksum();
        log::debug!("gzip member decoded: {produced} bytes, crc32={actual_crc:#010x}");
    }

    Ok(tracking.into_inner())
}

/// Reads and validates the fixed header and any optional fields,
/// leaving `source` positioned at the first DEFLATE bit.
fn read_header<R: BufRead>(source: &mut R) -> Result<()> {
    let mut header_bytes = Vec::with_capacity(10);

    let mut fixed = [0u8; 10];
    source.read_exact(&mut fixed)?;
    header_bytes.extend_from_slice(&fixed);

    if fixed[0..2] != MAGIC[..] {
        return Err(GzipError::BadMagic.into());
    }
    let cm = fixed[2];
    if cm != CM_DEFLATE {
        return Err(GzipError::UnsupportedCompressionMethod(cm).into());
    }
    let flg = fixed[3];

    if flg & FEXTRA != 0 {
        let xlen = source.read_u16::<LittleEndian>()?;
        header_bytes.extend_from_slice(&xlen.to_le_bytes());
        let mut extra = vec![0u8; xlen as usize];
        source.read_exact(&mut extra)?;
        header_bytes.extend_from_slice(&extra);
    }
    if flg & FNAME != 0 {
        read_cstring(source, &mut header_bytes)?;
    }
    if flg & FCOMMENT != 0 {
        read_cstring(source, &mut header_bytes)?;
    }
    if flg & FHCRC != 0 {
        let stored = source.read_u16::<LittleEndian>()?;
        let mut crc = Crc32::new();
        crc.feed(&header_bytes);
        let computed = (crc.result() & 0xFFFF) as u16;
        if computed != stored {
            return Err(GzipError::HeaderChecksumMismatch.into());
        }
    }

    log::trace!(
        "gzip header: flg={flg:#04x} text={} hcrc={} extra={} name={} comment={}",
        flg & FTEXT != 0,
        flg & FHCRC != 0,
        flg & FEXTRA != 0,
        flg & FNAME != 0,
        flg & FCOMMENT != 0,
    );

    Ok(())
}

/// Reads a NUL-terminated string, accumulating every byte (including
/// the terminator) into `acc` for the header-checksum computation. The
/// string's content itself is not retained; this crate has no use for
/// the original filename or comment.
fn read_cstring<R: BufRead>(source: &mut R, acc: &mut Vec<u8>) -> Result<()> {
    let mut byte = [0u8; 1];
    loop {
        source.read_exact(&mut byte)?;
        acc.push(byte[0]);
        if byte[0] == 0 {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod test {
    use super::decompress;
    use std::io::BufReader;

    /// Builds a minimal one-member gzip stream wrapping a raw DEFLATE
    /// payload (a stored or fixed block, already byte-complete).
    fn wrap(payload: &[u8], uncompressed: &[u8]) -> Vec<u8> {
        let mut out = vec![0x1F, 0x8B, 8, 0, 0, 0, 0, 0, 0, 0xFF];
        out.extend_from_slice(payload);
        let mut crc = crc32fast::Hasher::new();
        crc.update(uncompressed);
        out.extend_from_slice(&crc.finalize().to_le_bytes());
        out.extend_from_slice(&(uncompressed.len() as u32).to_le_bytes());
        out
    }

    #[test]
    fn decompresses_a_single_member() {
        let stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        let out = decompress(BufReader::new(&stream[..]), Vec::new()).unwrap();
        assert_eq!(out, b"a");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        stream[0] = 0x00;
        assert!(decompress(BufReader::new(&stream[..]), Vec::new()).is_err());
    }

    #[test]
    fn rejects_crc_mismatch() {
        let mut stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        let len = stream.len();
        stream[len - 8] ^= 0xFF; // flip a byte of the trailer CRC32
        assert!(decompress(BufReader::new(&stream[..]), Vec::new()).is_err());
    }

    #[test]
    fn decompresses_concatenated_members() {
        let mut stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        stream.extend(wrap(&[0x4B, 0x04, 0x00], b"a"));
        let out = decompress(BufReader::new(&stream[..]), Vec::new()).unwrap();
        assert_eq!(out, b"aa");
    }
}
