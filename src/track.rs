//! A `Write` wrapper that accumulates a rolling checksum and a byte
//! count alongside whatever it forwards to the wrapped sink. The gzip
//! and zlib container readers each plug in a different checksum
//! ([`crate::checksum::crc32::Crc32`] and
//! [`crate::checksum::adler::State32`] respectively) over the same
//! `OutputWindow` machinery.

use std::io::{self, Write};

use crate::checksum::RollingChecksum;

/// A `Write` wrapper that forwards every byte to `inner` while also
/// feeding it to a [`RollingChecksum`] and counting it.
pub struct TrackingWriter<W, C> {
    inner: W,
    checksum: C,
    count: u64,
}

impl<W: Write, C: RollingChecksum> TrackingWriter<W, C> {
    /// Wraps `inner`, starting `checksum` fresh and the byte count at 0.
    pub fn new(inner: W, checksum: C) -> TrackingWriter<W, C> {
        TrackingWriter {
            inner,
            checksum,
            count: 0,
        }
    }

    /// Total bytes written through this wrapper so far.
    pub fn byte_count(&self) -> u64 {
        self.count
    }

    /// The checksum accumulated so far.
    pub fn checksum(&self) -> u32 {
        self.checksum.result()
    }

    /// Resets the checksum (but not the byte count) so a multi-member
    /// container can compute a fresh per-member checksum while still
    /// tracking total bytes emitted across the whole stream.
    pub fn reset_checksum(&mut self) {
        self.checksum.reset();
    }

    /// Consumes the wrapper, handing back the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write, C: RollingChecksum> Write for TrackingWriter<W, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.checksum.feed(&buf[..n]);
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
