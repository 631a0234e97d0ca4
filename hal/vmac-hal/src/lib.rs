//! vmac-bridge Hardware Abstraction Layer
//!
//! This crate defines the seams between the bridge logic and the hardware
//! it runs on. The bridge crates only ever talk to these traits, so the
//! framing and conversion logic can be exercised on the host against
//! in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  vmac-firmware (tasks, peripherals)     │
//! └─────────────────────────────────────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │   vmac-link     │     │   vmac-core     │
//! └─────────────────┘     └─────────────────┘
//!          │                       │
//!          └───────────┬───────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  vmac-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialRx`] - Buffered serial receive with bounded waits
//! - [`display::Compositor`] - Owner of the panel that redraws dirty areas

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod serial;

// Re-export key traits at crate root for convenience
pub use display::Compositor;
pub use serial::SerialRx;
