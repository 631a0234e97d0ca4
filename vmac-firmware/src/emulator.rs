//! Emulator core bindings
//!
//! The emulator core is a C library running on core 1. It calls the
//! `vmac_host_*` functions below as its platform layer and exposes an entry
//! point plus a keyboard injection function of its own.
//!
//! Everything here runs in the emulator's context, not on the executor.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use defmt::*;
use embassy_time::{block_for, Duration, Instant};

use crate::channels::BRIDGE;

extern "C" {
    /// Emulator main loop; never returns
    fn vmac_emulator_main() -> i32;

    /// Press or release an emulated key (Mac virtual keycode)
    fn vmac_emulator_key(code: u8, down: bool);
}

/// Size in bytes of the emulator's monochrome framebuffer
static FRAME_LEN: AtomicUsize = AtomicUsize::new(0);

/// Left button as sampled by the latest pointer drain
static LEFT_BUTTON: AtomicBool = AtomicBool::new(false);

/// Run the emulator core; called once on core 1
pub fn run(frame_len: usize) -> ! {
    FRAME_LEN.store(frame_len, Ordering::Release);
    info!("Starting emulator core, {} byte framebuffer", frame_len);

    // SAFETY: entry point of the linked emulator library, called once
    let code = unsafe { vmac_emulator_main() };
    error!("Emulator exited with code {}", code);

    loop {
        cortex_m::asm::wfe();
    }
}

/// Forward a translated key transition to the emulator
pub fn key(code: u8, down: bool) {
    // SAFETY: the emulator's key map is updated under its own lock
    unsafe { vmac_emulator_key(code, down) }
}

/// Drain the pointer motion accumulated since the previous call
///
/// # Safety
///
/// `dx` and `dy` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn vmac_host_mouse_delta(dx: *mut i32, dy: *mut i32) {
    let sample = BRIDGE.poll_input();
    LEFT_BUTTON.store(sample.left_button, Ordering::Relaxed);
    *dx = sample.dx;
    *dy = sample.dy;
}

/// Left button state as of the last [`vmac_host_mouse_delta`]
#[no_mangle]
pub extern "C" fn vmac_host_mouse_button() -> i32 {
    i32::from(LEFT_BUTTON.load(Ordering::Relaxed))
}

/// The emulator changed part of its screen (half-open rows and columns)
#[no_mangle]
pub extern "C" fn vmac_host_screen_changed(top: i32, left: i32, bottom: i32, right: i32) {
    BRIDGE.notify_region_changed(top, left, bottom, right);
}

/// End of an emulator tick; `screen` is the current monochrome framebuffer
///
/// # Safety
///
/// `screen` must point to a framebuffer of the configured size that stays
/// valid for the life of the program. The emulator's screen buffers are
/// allocated once at startup and never freed.
#[no_mangle]
pub unsafe extern "C" fn vmac_host_draw_screen(screen: *const u8) {
    let len = FRAME_LEN.load(Ordering::Acquire);
    if screen.is_null() || len == 0 {
        return;
    }
    let frame: &'static [u8] = core::slice::from_raw_parts(screen, len);
    BRIDGE.notify_frame_ready(frame);
}

/// Milliseconds since boot
#[no_mangle]
pub extern "C" fn vmac_host_time_ms() -> u64 {
    Instant::now().as_millis()
}

/// Busy-wait; the emulator owns core 1
#[no_mangle]
pub extern "C" fn vmac_host_delay_ms(ms: u32) {
    block_for(Duration::from_millis(u64::from(ms)));
}
