//! Frame presenter
//!
//! Drives the conversion cycle:
//!
//! ```text
//! WaitFrame ──frame ready──▶ convert dirty area ──▶ invalidate + redraw ──▶ WaitVSync
//!     ▲                                                                       │
//!     └──────────────────────────────── vsync ────────────────────────────────┘
//! ```
//!
//! At most one conversion is in flight: frames published while waiting for
//! vsync sit in the single-slot signal and the newest one is picked up on
//! the next cycle.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use vmac_hal::Compositor;

use crate::bridge::Bridge;
use crate::video::convert::Converter;

/// Where the presenter is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// Waiting for the emulator to publish a frame
    WaitFrame,
    /// Redraw requested, waiting for the panel's vertical sync
    WaitVSync,
}

/// Outcome of one non-blocking [`Presenter::poll`]
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do yet
    Idle,
    /// A frame was converted; the area is in panel coordinates
    Presented(Rectangle),
    /// A frame arrived but no dirty area was pending
    Skipped,
    /// Vertical sync seen, ready for the next frame
    Released,
}

/// Converts frames and paces them against vertical sync
pub struct Presenter<'a> {
    converter: Converter<'a>,
    offset: Point,
    state: SyncState,
    presented: u32,
    full_refresh: bool,
}

impl<'a> Presenter<'a> {
    /// `offset` is the panel position of the emulated image's top-left pixel
    pub fn new(converter: Converter<'a>, offset: Point) -> Self {
        Self {
            converter,
            offset,
            state: SyncState::WaitFrame,
            presented: 0,
            full_refresh: false,
        }
    }

    /// Convert the whole surface on the next frame, whatever its dirty area
    pub fn request_full_refresh(&mut self) {
        self.full_refresh = true;
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of frames converted so far
    pub fn presented(&self) -> u32 {
        self.presented
    }

    pub fn converter(&self) -> &Converter<'a> {
        &self.converter
    }

    /// Advance the cycle without waiting
    #[cfg(test)]
    pub fn poll<M: RawMutex, C: Compositor>(&mut self, bridge: &Bridge<'_, M>, compositor: &mut C) -> Step {
        match self.state {
            SyncState::WaitFrame => match bridge.sync().try_take_frame() {
                None => Step::Idle,
                Some(frame) => match self.present(frame, bridge, compositor) {
                    Some(area) => {
                        self.state = SyncState::WaitVSync;
                        Step::Presented(area)
                    }
                    None => Step::Skipped,
                },
            },
            SyncState::WaitVSync => {
                if bridge.sync().try_take_vsync() {
                    self.state = SyncState::WaitFrame;
                    Step::Released
                } else {
                    Step::Idle
                }
            }
        }
    }

    /// Run one full cycle, waiting for a frame and then for vsync
    ///
    /// Returns the presented area, or `None` if the frame had nothing dirty
    /// (in which case no redraw was requested and no vsync is awaited).
    pub async fn run_cycle<M: RawMutex, C: Compositor>(
        &mut self,
        bridge: &Bridge<'_, M>,
        compositor: &mut C,
    ) -> Option<Rectangle> {
        if self.state == SyncState::WaitVSync {
            bridge.sync().wait_vsync().await;
            self.state = SyncState::WaitFrame;
        }

        let frame = bridge.sync().wait_frame().await;
        let area = self.present(frame, bridge, compositor)?;

        self.state = SyncState::WaitVSync;
        bridge.sync().wait_vsync().await;
        self.state = SyncState::WaitFrame;
        Some(area)
    }

    /// Convert the pending dirty area and request its redraw
    fn present<M: RawMutex, C: Compositor>(
        &mut self,
        frame: &[u8],
        bridge: &Bridge<'_, M>,
        compositor: &mut C,
    ) -> Option<Rectangle> {
        let dirty = bridge.dirty().take_and_clear();
        let converted = if core::mem::take(&mut self.full_refresh) {
            self.converter.convert_full(frame)?
        } else {
            self.converter.convert(frame, dirty?)?
        };
        self.presented = self.presented.wrapping_add(1);

        let area = Rectangle::new(converted.top_left + self.offset, converted.size);

        // Only a vsync after this redraw request may release the cycle
        bridge.sync().reset_vsync();
        compositor.invalidate_region(area);
        compositor.request_redraw_now();
        Some(area)
    }
}
