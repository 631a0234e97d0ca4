//! Link framer
//!
//! Pulls exactly one frame at a time off a [`SerialRx`] and verifies it.
//! The wire has no sync byte, so every failure path below still consumes
//! the bytes the header promised. That keeps the next read starting on a
//! header boundary.

use vmac_hal::SerialRx;

use crate::packet::{checksum, Packet, PacketKind, HEADER_LEN};

/// Bytes read per chunk while discarding an oversize frame
pub const DISCARD_CHUNK: usize = 64;

/// Default per-chunk timeout while discarding an oversize frame
pub const DEFAULT_DISCARD_TIMEOUT_MS: u32 = 10;

/// Reasons a frame was dropped
///
/// None of these are fatal: the link is fire-and-forget, so the caller
/// logs or counts the error and moves on to the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Fewer bytes than required arrived before the timeout
    Timeout,
    /// Header carried an unrecognised type tag
    UnknownKind(u8),
    /// Payload length exceeds the receive buffer (frame was discarded)
    Oversize { len: u16 },
    /// Checksum did not match the header and payload
    ChecksumMismatch { expected: u8, received: u8 },
    /// The serial driver reported an error
    Serial,
}

/// Counters for accepted and dropped frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    pub accepted: u32,
    pub timeouts: u32,
    pub unknown_kind: u32,
    pub oversize: u32,
    pub bad_checksum: u32,
    pub serial_errors: u32,
}

impl LinkStats {
    /// Total number of dropped frames
    pub fn dropped(&self) -> u32 {
        self.timeouts
            .saturating_add(self.unknown_kind)
            .saturating_add(self.oversize)
            .saturating_add(self.bad_checksum)
            .saturating_add(self.serial_errors)
    }

    fn record(&mut self, result: &Result<Packet<'_>, LinkError>) {
        let counter = match result {
            Ok(_) => &mut self.accepted,
            Err(LinkError::Timeout) => &mut self.timeouts,
            Err(LinkError::UnknownKind(_)) => &mut self.unknown_kind,
            Err(LinkError::Oversize { .. }) => &mut self.oversize,
            Err(LinkError::ChecksumMismatch { .. }) => &mut self.bad_checksum,
            Err(LinkError::Serial) => &mut self.serial_errors,
        };
        *counter = counter.saturating_add(1);
    }
}

/// Frame reader over a serial receiver
pub struct LinkFramer<R> {
    rx: R,
    discard_timeout_ms: u32,
    stats: LinkStats,
}

impl<R: SerialRx> LinkFramer<R> {
    /// Create a framer with the default discard timeout
    pub fn new(rx: R) -> Self {
        Self::with_discard_timeout(rx, DEFAULT_DISCARD_TIMEOUT_MS)
    }

    /// Create a framer with a custom per-chunk discard timeout
    pub fn with_discard_timeout(rx: R, discard_timeout_ms: u32) -> Self {
        Self {
            rx,
            discard_timeout_ms,
            stats: LinkStats::default(),
        }
    }

    /// Frame statistics since creation
    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// True once a full header is buffered
    ///
    /// The decode loop polls this before calling [`Self::read_packet`]
    /// with a zero timeout.
    pub fn header_ready(&self) -> bool {
        self.rx.has_data(HEADER_LEN)
    }

    /// Release the underlying receiver
    #[cfg(test)]
    pub fn into_inner(self) -> R {
        self.rx
    }

    /// Read and verify exactly one frame
    ///
    /// `payload` is the receive buffer; its length is the largest payload
    /// this call accepts. Each read of the header, payload and checksum
    /// waits at most `timeout_ms`.
    pub async fn read_packet<'b>(
        &mut self,
        payload: &'b mut [u8],
        timeout_ms: u32,
    ) -> Result<Packet<'b>, LinkError> {
        let result = self.read_frame(payload, timeout_ms).await;
        self.stats.record(&result);
        result
    }

    async fn read_frame<'b>(
        &mut self,
        payload: &'b mut [u8],
        timeout_ms: u32,
    ) -> Result<Packet<'b>, LinkError> {
        let mut header = [0u8; HEADER_LEN];
        self.read_exact(&mut header, timeout_ms).await?;

        let kind = PacketKind::from_tag(header[0]).ok_or(LinkError::UnknownKind(header[0]))?;
        let len = u16::from_le_bytes([header[1], header[2]]);

        if usize::from(len) > payload.len() {
            self.discard(u32::from(len) + 1).await?;
            return Err(LinkError::Oversize { len });
        }

        let body = &mut payload[..usize::from(len)];
        self.read_exact(body, timeout_ms).await?;

        let mut received = [0u8; 1];
        self.read_exact(&mut received, timeout_ms).await?;

        let expected = checksum(&header, body);
        if received[0] != expected {
            return Err(LinkError::ChecksumMismatch {
                expected,
                received: received[0],
            });
        }

        Ok(Packet {
            kind,
            payload: body,
            checksum: received[0],
        })
    }

    async fn read_exact(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<(), LinkError> {
        if buf.is_empty() {
            return Ok(());
        }
        let got = self
            .rx
            .read_timeout(buf, timeout_ms)
            .await
            .map_err(|_| LinkError::Serial)?;
        if got == buf.len() {
            Ok(())
        } else {
            Err(LinkError::Timeout)
        }
    }

    /// Drop `remaining` bytes in bounded chunks; stops early if the link
    /// goes quiet for longer than the discard timeout
    async fn discard(&mut self, mut remaining: u32) -> Result<(), LinkError> {
        let mut scratch = [0u8; DISCARD_CHUNK];
        while remaining > 0 {
            let chunk = (remaining as usize).min(DISCARD_CHUNK);
            let got = self
                .rx
                .read_timeout(&mut scratch[..chunk], self.discard_timeout_ms)
                .await
                .map_err(|_| LinkError::Serial)?;
            if got == 0 {
                break;
            }
            remaining -= got as u32;
        }
        Ok(())
    }
}
