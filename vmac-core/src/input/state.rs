//! Input state store
//!
//! One producer (the decode loop) adds pointer motion; one consumer (the
//! emulator tick) drains it. Both sides hold the lock only for a handful of
//! integer operations.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use vmac_link::input::BUTTON_LEFT;

/// Pointer state handed to the emulator once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseSample {
    /// Horizontal motion since the previous drain
    pub dx: i32,
    /// Vertical motion since the previous drain
    pub dy: i32,
    /// Primary button currently held
    pub left_button: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    dx: i32,
    dy: i32,
    buttons: u8,
}

/// Pending pointer displacement and latest button mask
pub struct InputState<M: RawMutex = CriticalSectionRawMutex> {
    inner: Mutex<M, RefCell<Accumulator>>,
}

impl<M: RawMutex> Default for InputState<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> InputState<M> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Accumulator {
                dx: 0,
                dy: 0,
                buttons: 0,
            })),
        }
    }

    /// Add one pointer report
    ///
    /// Motion sums until the next drain; the button mask is last-write-wins.
    pub fn accumulate(&self, dx: i16, dy: i16, buttons: u8) {
        self.inner.lock(|acc| {
            let mut acc = acc.borrow_mut();
            acc.dx = acc.dx.saturating_add(i32::from(dx));
            acc.dy = acc.dy.saturating_add(i32::from(dy));
            acc.buttons = buttons;
        });
    }

    /// Take the pending motion and read the button state
    ///
    /// Motion resets to zero; the button mask is left as-is so a held
    /// button stays held across ticks without new reports.
    pub fn drain(&self) -> MouseSample {
        self.inner.lock(|acc| {
            let mut acc = acc.borrow_mut();
            let sample = MouseSample {
                dx: acc.dx,
                dy: acc.dy,
                left_button: acc.buttons & BUTTON_LEFT != 0,
            };
            acc.dx = 0;
            acc.dy = 0;
            sample
        })
    }

    /// Latest raw button mask
    #[cfg(test)]
    pub fn buttons(&self) -> u8 {
        self.inner.lock(|acc| acc.borrow().buttons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_then_drain() {
        let state: InputState = InputState::new();
        state.accumulate(3, 4, 0);
        state.accumulate(-1, 2, 1);

        let sample = state.drain();
        assert_eq!(sample.dx, 2);
        assert_eq!(sample.dy, 6);
        assert!(sample.left_button);
        assert_eq!(state.buttons(), 1);
    }

    #[test]
    fn test_drain_resets_motion_but_keeps_buttons() {
        let state: InputState = InputState::new();
        state.accumulate(10, -10, 0x01);
        state.drain();

        let sample = state.drain();
        assert_eq!(sample.dx, 0);
        assert_eq!(sample.dy, 0);
        assert!(sample.left_button);
    }

    #[test]
    fn test_right_button_alone_is_not_left() {
        let state: InputState = InputState::new();
        state.accumulate(0, 0, 0x02);
        assert!(!state.drain().left_button);
        assert_eq!(state.buttons(), 0x02);
    }

    #[test]
    fn test_concurrent_producer_consumer_loses_nothing() {
        let state: InputState = InputState::new();
        let mut total_dx = 0i64;
        let mut total_dy = 0i64;

        std::thread::scope(|s| {
            let producer = s.spawn(|| {
                for _ in 0..10_000 {
                    state.accumulate(1, -2, 0);
                }
            });
            while !producer.is_finished() {
                let sample = state.drain();
                total_dx += i64::from(sample.dx);
                total_dy += i64::from(sample.dy);
            }
        });
        let sample = state.drain();
        total_dx += i64::from(sample.dx);
        total_dy += i64::from(sample.dy);

        assert_eq!(total_dx, 10_000);
        assert_eq!(total_dy, -20_000);
    }
}
