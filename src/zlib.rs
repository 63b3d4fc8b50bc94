//! ZLIB decompression (RFC 1950): a two-byte header (CMF/FLG) plus the
//! Adler-32 trailer wrapped around the same DEFLATE payload used by the
//! gzip container in [`crate::gzip`].
//!
//! Enabled by the `zlib` feature, on by default.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Cursor;
//! let stream = Cursor::new(&[0u8][..]);
//! let out = gzrs::zlib::decompress(stream, Vec::new()).unwrap();
//! ```
//!
//! # Related links
//!
//! * <http://tools.ietf.org/html/rfc1950> - RFC this module implements

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt};

use crate::checksum::adler::State32;
use crate::error::{Error, GzipError, Result};
use crate::inflate;
use crate::track::TrackingWriter;

const CM_DEFLATE: u8 = 8;

/// Decodes a single zlib stream, streaming the reconstructed bytes to
/// `sink`. Unlike gzip, zlib has no multi-member concatenation.
pub fn decompress<R: Read, W: Write>(mut source: R, sink: W) -> Result<W> {
    validate_header(&mut source)?;

    let tracking = TrackingWriter::new(sink, State32::new());
    let (mut source, tracking) = inflate::inflate(source, tracking)?;

    let expected = source.read_u32::<BigEndian>()?;
    let actual = tracking.checksum();
    if actual != expected {
        return Err(GzipError::TrailerCrcMismatch {
            expected,
            actual,
        }
        .into());
    }

    Ok(tracking.into_inner())
}

/// Validates the 2-byte CMF/FLG header: compression method must be 8
/// (deflate), the window-size field must not exceed 32 KiB, a preset
/// dictionary is unsupported, and the 16-bit header must be a multiple
/// of 31 (RFC 1950 §2.2's `FCHECK`).
fn validate_header<R: Read>(source: &mut R) -> Result<()> {
    let mut header = [0u8; 2];
    source.read_exact(&mut header)?;
    let [cmf, flg] = header;

    if cmf & 0x0F != CM_DEFLATE {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "unsupported zlib compression method",
        )));
    }
    if cmf >> 4 > 7 {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "unsupported zlib window size",
        )));
    }
    if flg & 0x20 != 0 {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "zlib preset dictionaries are not supported",
        )));
    }
    if (u16::from(cmf) * 256 + u16::from(flg)) % 31 != 0 {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "invalid zlib header checksum",
        )));
    }

    log::trace!("zlib header: cmf={cmf:#04x} flg={flg:#04x}");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::decompress;

    fn wrap(payload: &[u8], uncompressed: &[u8]) -> Vec<u8> {
        let mut out = vec![0x78, 0x01]; // CM=8, CINFO=7, no fdict, FCHECK ok
        out.extend_from_slice(payload);
        let mut adler = crate::checksum::adler::State32::new();
        adler.feed(uncompressed);
        out.extend_from_slice(&adler.result().to_be_bytes());
        out
    }

    #[test]
    fn decompresses_a_single_stream() {
        let stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        let out = decompress(&stream[..], Vec::new()).unwrap();
        assert_eq!(out, b"a");
    }

    #[test]
    fn rejects_bad_compression_method() {
        let mut stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        stream[0] = 0x77; // CM=7, invalid
        assert!(decompress(&stream[..], Vec::new()).is_err());
    }

    #[test]
    fn rejects_checksum_mismatch() {
        let mut stream = wrap(&[0x4B, 0x04, 0x00], b"a");
        let len = stream.len();
        stream[len - 1] ^= 0xFF;
        assert!(decompress(&stream[..], Vec::new()).is_err());
    }
}
