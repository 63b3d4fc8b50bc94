//! Crate-wide error types.
//!
//! The inflater's error kinds are kept narrow and specific (one variant
//! per condition in the format's grammar) so that callers can match on
//! *why* a stream was rejected rather than parsing a message string.

use thiserror::Error;

/// Errors raised while decoding a raw DEFLATE bitstream (RFC 1951).
#[derive(Debug, Error)]
pub enum InflateError {
    /// The source was exhausted mid-bitstream.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A Huffman decode walked past the longest valid code without a match.
    #[error("huffman decode reached an invalid prefix")]
    InvalidPrefix,

    /// Code-length symbol 16 (repeat previous) appeared with no previous entry.
    #[error("code length symbol 16 (repeat previous) appeared first")]
    InvalidRepeat,

    /// The dynamic-block preamble declared more code lengths than HLIT+HDIST.
    #[error("dynamic huffman header declared more code lengths than HLIT+HDIST")]
    LengthsOverflow,

    /// BTYPE == 3, a reserved value with no defined meaning.
    #[error("reserved block type (BTYPE == 3)")]
    ReservedBlockType,

    /// A stored block's NLEN field was not the one's complement of LEN.
    #[error("stored block length mismatch: NLEN is not the one's complement of LEN")]
    StoredBlockLengthMismatch,

    /// A decoded literal/length symbol fell outside 0..285.
    #[error("literal/length symbol {0} is outside the valid 0..285 range")]
    InvalidLengthSymbol(u16),

    /// A back-reference distance exceeded the bytes emitted so far.
    #[error("back-reference distance {0} exceeds bytes emitted so far")]
    InvalidDistance(usize),

    /// A code-length vector violates the Kraft inequality.
    #[error("code length vector violates the Kraft inequality")]
    MalformedTree,
}

/// Errors raised while parsing the gzip container (RFC 1952) around a
/// DEFLATE payload.
#[derive(Debug, Error)]
pub enum GzipError {
    /// The stream didn't start with the 0x1F 0x8B magic bytes.
    #[error("not a gzip stream: bad magic bytes")]
    BadMagic,

    /// CM was not 8; gzip only defines deflate as a compression method.
    #[error("unsupported compression method {0} (only 8 = deflate is defined)")]
    UnsupportedCompressionMethod(u8),

    /// The optional FHCRC field didn't match the header bytes actually read.
    #[error("gzip header checksum (FHCRC) does not match")]
    HeaderChecksumMismatch,

    /// The trailer's CRC32 didn't match the CRC32 of the decoded bytes.
    #[error("trailer CRC32 {expected:#010x} does not match computed CRC32 {actual:#010x}")]
    TrailerCrcMismatch {
        /// The CRC32 stored in the trailer.
        expected: u32,
        /// The CRC32 computed over the decoded member.
        actual: u32,
    },

    /// The trailer's ISIZE didn't match the decoded member's size mod 2^32.
    #[error("trailer ISIZE {expected} does not match decoded size {actual} (mod 2^32)")]
    TrailerSizeMismatch {
        /// The ISIZE stored in the trailer.
        expected: u32,
        /// The decoded member's size, mod 2^32.
        actual: u32,
    },

    /// The source ran out before a member's 8-byte trailer could be read.
    #[error("gzip member ended before its trailer could be read")]
    TruncatedMember,
}

/// Top-level error type returned by every fallible operation in this
/// crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw DEFLATE bitstream failed to decode.
    #[error("deflate error: {0}")]
    Inflate(#[from] InflateError),

    /// The gzip container around a DEFLATE payload was malformed.
    #[error("gzip error: {0}")]
    Gzip(#[from] GzipError),

    /// Reading from or writing to the underlying stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
