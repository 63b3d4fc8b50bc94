/*!

CRC-32 checksum (the ISO-HDLC / "CRC-32" polynomial used by gzip's
trailer, PNG, zip, and Ethernet). Computation is delegated to
`crc32fast`, which picks a SIMD-accelerated implementation at runtime
where the target supports one; this module only adapts its API to the
same `new`/`feed`/`result`/`reset` shape as [`super::adler::State32`]
so both checksums can sit behind [`super::RollingChecksum`].

# Example

```rust
use gzrs::checksum::crc32;
let mut state = crc32::Crc32::new();
state.feed(b"abracadabra");
let checksum = state.result();
```

*/

/// CRC-32 running state.
pub struct Crc32 {
    hasher: crc32fast::Hasher,
}

impl Crc32 {
    /// Create a new state, equivalent to the CRC-32 of the empty
    /// string.
    pub fn new() -> Crc32 {
        Crc32 {
            hasher: crc32fast::Hasher::new(),
        }
    }

    /// Mutate the state for the given data.
    pub fn feed(&mut self, buf: &[u8]) {
        self.hasher.update(buf);
    }

    /// Get the checksum accumulated so far.
    pub fn result(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Reset the state back to its initial value.
    pub fn reset(&mut self) {
        self.hasher = crc32fast::Hasher::new();
    }
}

impl Default for Crc32 {
    fn default() -> Crc32 {
        Crc32::new()
    }
}
