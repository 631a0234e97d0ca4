//! Serial receive abstraction
//!
//! The companion controller streams bytes one way only, so the bridge needs
//! just the receive half of a UART. Reads are bounded by a timeout so a
//! stalled link can never park the decode loop forever.

/// Buffered serial receiver
///
/// Implementations sit on top of a driver-level receive buffer (an
/// interrupt-fed ring, a DMA buffer, an in-memory queue in tests).
#[allow(async_fn_in_trait)]
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Number of bytes already buffered and readable without waiting
    fn available(&self) -> usize;

    /// Read into `buf`, waiting at most `timeout_ms` for it to fill
    ///
    /// Returns the number of bytes actually read. A return value smaller
    /// than `buf.len()` means the timeout expired first. With a timeout
    /// of zero only already-buffered bytes are returned.
    async fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32)
        -> Result<usize, Self::Error>;

    /// Check whether at least `min_bytes` are buffered
    fn has_data(&self, min_bytes: usize) -> bool {
        self.available() >= min_bytes
    }
}
