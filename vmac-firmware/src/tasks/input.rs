//! Input decode task
//!
//! Frames packets from the link, feeds pointer motion into the shared input
//! state and key transitions straight into the emulator.

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Timer;

use vmac_core::config::LinkConfig;
use vmac_core::input::InputDecoder;
use vmac_link::LinkFramer;

use crate::channels::BRIDGE;
use crate::emulator;
use crate::serial::PipeRx;

/// Receive buffer size; `payload_capacity` is clamped to it
const MAX_PAYLOAD: usize = 1024;

/// Wait for the rest of a frame once its header has arrived
const FRAME_TIMEOUT_MS: u32 = 10;

#[embassy_executor::task]
pub async fn input_task(link: LinkConfig) {
    info!(
        "Input task started (capacity {} bytes, poll every {} ms)",
        link.payload_capacity, link.poll_interval_ms
    );

    let mut framer = LinkFramer::with_discard_timeout(PipeRx::new(), link.discard_timeout_ms);
    let mut decoder = InputDecoder::new(BRIDGE.input());
    let mut payload = [0u8; MAX_PAYLOAD];
    let capacity = usize::from(link.payload_capacity).min(MAX_PAYLOAD);

    let mut keys = |code: u8, down: bool| {
        trace!("Key {=u8:#04x} {}", code, if down { "down" } else { "up" });
        emulator::key(code, down);
    };

    loop {
        if framer.header_ready() {
            match framer.read_packet(&mut payload[..capacity], FRAME_TIMEOUT_MS).await {
                Ok(packet) => {
                    trace!("Packet {:?}: {=[u8]:02x}", packet.kind, packet.payload);
                    match decoder.handle(&packet, &mut keys) {
                        Ok(event) => debug!("Input: {:?}", event),
                        Err(e) => warn!("Dropped packet: {:?}", e),
                    }
                }
                Err(e) => {
                    warn!("Dropped frame: {:?} ({} dropped)", e, framer.stats().dropped());
                }
            }
        }

        if link.poll_interval_ms == 0 {
            yield_now().await;
        } else {
            Timer::after_millis(u64::from(link.poll_interval_ms)).await;
        }
    }
}
