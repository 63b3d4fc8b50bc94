//! A gzip (RFC 1952) / DEFLATE (RFC 1951) decompressor.
//!
//! The entry points most callers want are [`gzip::decompress`] and, with
//! the `zlib` feature (on by default), [`zlib::decompress`]. Both stream
//! their output to an arbitrary [`std::io::Write`] sink rather than
//! buffering the whole result in memory.
//!
//! ```no_run
//! use std::io::BufReader;
//! use std::fs::File;
//!
//! let input = BufReader::new(File::open("archive.gz").unwrap());
//! let out = gzrs::gzip::decompress(input, Vec::new()).unwrap();
//! ```

#![deny(missing_docs)]

/// Checksum algorithms.
///
/// <http://en.wikipedia.org/wiki/Checksum>
pub mod checksum;

/// Crate-wide error types.
pub mod error;

/// Bit-level reading over a byte source.
pub mod bitreader;

/// Canonical Huffman code construction and decoding.
pub mod huffman;

/// The sliding output window used to resolve LZ77 back-references.
pub mod window;

/// Parsing of dynamic-Huffman block headers.
pub mod dynamic;

/// The DEFLATE (RFC 1951) block decoder.
pub mod inflate;

/// The gzip (RFC 1952) container format.
pub mod gzip;

/// The zlib (RFC 1950) container format.
#[cfg(feature = "zlib")]
pub mod zlib;

/// A checksum- and byte-count-tracking `Write` wrapper.
pub mod track;

/// Crate-wide error type, re-exported for convenience.
pub use error::Error;
/// Crate-wide result alias, re-exported for convenience.
pub use error::Result;
