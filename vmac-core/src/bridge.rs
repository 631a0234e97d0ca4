//! Shared bridge state
//!
//! The one object every execution context touches: the decode loop writes
//! pointer motion, the emulator tick drains it and reports screen changes,
//! the display loop consumes frames, and the vsync interrupt releases it.
//!
//! Critical sections are short and never nested: one accumulate or drain,
//! one report or take, one signal store.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};

use crate::input::{InputState, MouseSample};
use crate::video::{DirtyRect, DirtyTracker, FrameSync};

/// Cross-context state shared by the input, emulator and display loops
pub struct Bridge<'f, M: RawMutex = CriticalSectionRawMutex> {
    input: InputState<M>,
    dirty: DirtyTracker<M>,
    sync: FrameSync<'f, M>,
}

impl<M: RawMutex> Default for Bridge<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f, M: RawMutex> Bridge<'f, M> {
    pub const fn new() -> Self {
        Self {
            input: InputState::new(),
            dirty: DirtyTracker::new(),
            sync: FrameSync::new(),
        }
    }

    /// Pointer state store (producer side lives in the decode loop)
    pub fn input(&self) -> &InputState<M> {
        &self.input
    }

    /// Dirty-region tracker
    pub fn dirty(&self) -> &DirtyTracker<M> {
        &self.dirty
    }

    /// Frame and vsync signals
    pub fn sync(&self) -> &FrameSync<'f, M> {
        &self.sync
    }

    // Emulator-facing hooks

    /// Drain pointer motion for this emulator tick
    pub fn poll_input(&self) -> MouseSample {
        self.input.drain()
    }

    /// The emulator changed part of its screen
    pub fn notify_region_changed(&self, top: i32, left: i32, bottom: i32, right: i32) {
        self.dirty.report(DirtyRect::new(top, left, bottom, right));
    }

    /// End of an emulator tick: hand over the current framebuffer
    ///
    /// Ticks that changed nothing on screen do not wake the display loop.
    /// Returns true if the frame was published.
    pub fn notify_frame_ready(&self, frame: &'f [u8]) -> bool {
        if !self.dirty.take_changed() {
            return false;
        }
        self.sync.frame_ready(frame);
        true
    }

    /// Vertical sync from the panel; interrupt-safe
    pub fn notify_vsync(&self) {
        self.sync.vsync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_tick_not_published() {
        let frame = [0u8; 64];
        let bridge: Bridge = Bridge::new();

        assert!(!bridge.notify_frame_ready(&frame));
        assert_eq!(bridge.sync().try_take_frame(), None);
    }

    #[test]
    fn test_changed_tick_published_once() {
        let frame = [0u8; 64];
        let bridge: Bridge = Bridge::new();

        bridge.notify_region_changed(0, 0, 10, 10);
        assert!(bridge.notify_frame_ready(&frame));
        assert!(!bridge.notify_frame_ready(&frame));
        assert_eq!(bridge.sync().try_take_frame(), Some(&frame[..]));
        assert_eq!(bridge.dirty().take_and_clear(), Some(DirtyRect::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_poll_input_drains() {
        let bridge: Bridge = Bridge::new();
        bridge.input().accumulate(5, -5, 1);

        let sample = bridge.poll_input();
        assert_eq!((sample.dx, sample.dy, sample.left_button), (5, -5, true));
        assert_eq!(bridge.poll_input().dx, 0);
    }
}
