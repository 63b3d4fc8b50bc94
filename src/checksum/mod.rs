//! Checksum algorithms used by the container formats built on top of
//! DEFLATE. Gzip (RFC 1952) trails its payload with a CRC32; zlib
//! (RFC 1950) uses Adler-32 instead. Both are exposed behind the same
//! small trait so a single `TrackingWriter` can be generic over either.

/// Adler-32, used by the zlib (RFC 1950) container.
pub mod adler;
/// CRC-32, used by the gzip (RFC 1952) container.
pub mod crc32;

/// A running checksum that can be fed bytes incrementally as they are
/// produced, then read back out once the stream is exhausted.
pub trait RollingChecksum {
    /// Folds `bytes` into the running checksum.
    fn feed(&mut self, bytes: &[u8]);
    /// Returns the checksum accumulated so far.
    fn result(&self) -> u32;
    /// Resets the state back to its initial value.
    fn reset(&mut self);
}

impl RollingChecksum for adler::State32 {
    fn feed(&mut self, bytes: &[u8]) {
        adler::State32::feed(self, bytes)
    }
    fn result(&self) -> u32 {
        adler::State32::result(self)
    }
    fn reset(&mut self) {
        adler::State32::reset(self)
    }
}

impl RollingChecksum for crc32::Crc32 {
    fn feed(&mut self, bytes: &[u8]) {
        crc32::Crc32::feed(self, bytes)
    }
    fn result(&self) -> u32 {
        crc32::Crc32::result(self)
    }
    fn reset(&mut self) {
        crc32::Crc32::reset(self)
    }
}
