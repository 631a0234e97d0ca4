//! Video path: monochrome framebuffer to colour panel
//!
//! ```text
//! emulator ──report()──▶ DirtyTracker ─┐
//! emulator ──frame ready──▶ FrameSync ─┼─▶ Presenter ──▶ Converter ──▶ Compositor
//! panel ─────vsync───────▶ FrameSync ──┘
//! ```

pub mod convert;
pub mod deferred;
pub mod dirty;
pub mod lut;
pub mod present;
pub mod sync;

pub use convert::Converter;
pub use deferred::DeferredCompositor;
pub use dirty::{DirtyRect, DirtyTracker};
pub use lut::Lut;
pub use present::{Presenter, SyncState};
pub use sync::FrameSync;
