//! Vertical sync task
//!
//! Turns the panel's tearing-effect edges into vsync notifications.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::BRIDGE;

#[embassy_executor::task]
pub async fn vsync_task(mut te: Input<'static>) {
    info!("VSync task started");

    loop {
        te.wait_for_rising_edge().await;
        BRIDGE.notify_vsync();
    }
}
