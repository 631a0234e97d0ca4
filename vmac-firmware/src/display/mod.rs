//! Panel output
//!
//! The panel is a MIPI DCS controller with its own frame memory, written
//! over SPI. Its tearing-effect line marks the start of vertical blanking
//! and serves as the bridge's vsync.

pub mod panel;

pub use panel::Panel;
