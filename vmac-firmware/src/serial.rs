//! Serial receiver over the UART byte pipe
//!
//! The UART pump fills [`RX_PIPE`]; this adapter gives the link framer a
//! view of it with availability queries and bounded reads.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_time::{with_deadline, Duration, Instant};
use vmac_hal::SerialRx;

use crate::channels::{RX_PIPE, RX_PIPE_SIZE};

/// Pipe-backed serial receiver
pub struct PipeRx {
    pipe: &'static Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE>,
}

impl PipeRx {
    pub fn new() -> Self {
        Self { pipe: &RX_PIPE }
    }
}

impl SerialRx for PipeRx {
    type Error = Infallible;

    fn available(&self) -> usize {
        self.pipe.len()
    }

    async fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        let mut filled = 0;

        while filled < buf.len() {
            match with_deadline(deadline, self.pipe.read(&mut buf[filled..])).await {
                Ok(n) => filled += n,
                Err(_) => break,
            }
        }

        Ok(filled)
    }
}
