//! Frame-ready and vertical-sync signalling
//!
//! Both signals are single-slot and latest-wins: a burst of frame-ready
//! notifications while a conversion is in flight collapses into one, and
//! the slot only ever holds the newest framebuffer.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::signal::Signal;

/// Frame hand-off and vsync gate
pub struct FrameSync<'f, M: RawMutex = CriticalSectionRawMutex> {
    frame_ready: Signal<M, &'f [u8]>,
    vsync: Signal<M, ()>,
}

impl<M: RawMutex> Default for FrameSync<'_, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f, M: RawMutex> FrameSync<'f, M> {
    pub const fn new() -> Self {
        Self {
            frame_ready: Signal::new(),
            vsync: Signal::new(),
        }
    }

    /// Publish a new monochrome framebuffer
    ///
    /// Overwrites any frame not yet picked up.
    pub fn frame_ready(&self, frame: &'f [u8]) {
        self.frame_ready.signal(frame);
    }

    /// Record a vertical sync
    ///
    /// Safe from interrupt context: no allocation, and the only lock taken
    /// is the signal's own critical section for a single store.
    pub fn vsync(&self) {
        self.vsync.signal(());
    }

    /// Wait for the next framebuffer
    pub async fn wait_frame(&self) -> &'f [u8] {
        self.frame_ready.wait().await
    }

    /// Take a pending framebuffer without waiting
    #[cfg(test)]
    pub fn try_take_frame(&self) -> Option<&'f [u8]> {
        self.frame_ready.try_take()
    }

    /// Wait for the next vertical sync
    pub async fn wait_vsync(&self) {
        self.vsync.wait().await
    }

    /// Consume a pending vertical sync without waiting
    #[cfg(test)]
    pub fn try_take_vsync(&self) -> bool {
        self.vsync.try_take().is_some()
    }

    /// Forget any vertical sync seen so far
    pub fn reset_vsync(&self) {
        self.vsync.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_coalesce_latest_wins() {
        let a = [1u8; 4];
        let b = [2u8; 4];
        let sync: FrameSync = FrameSync::new();

        sync.frame_ready(&a);
        sync.frame_ready(&b);
        assert_eq!(sync.try_take_frame(), Some(&b[..]));
        assert_eq!(sync.try_take_frame(), None);
    }

    #[test]
    fn test_vsync_is_latched_once() {
        let sync: FrameSync = FrameSync::new();
        assert!(!sync.try_take_vsync());

        sync.vsync();
        sync.vsync();
        assert!(sync.try_take_vsync());
        assert!(!sync.try_take_vsync());
    }

    #[test]
    fn test_reset_drops_stale_vsync() {
        let sync: FrameSync = FrameSync::new();
        sync.vsync();
        sync.reset_vsync();
        assert!(!sync.try_take_vsync());
    }

    #[test]
    fn test_wait_frame_returns_pending() {
        let frame = [0xAAu8; 8];
        let sync: FrameSync = FrameSync::new();
        sync.frame_ready(&frame);

        let got = embassy_futures::block_on(sync.wait_frame());
        assert_eq!(got, &frame[..]);
    }
}
