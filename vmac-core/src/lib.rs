//! Board-agnostic core logic for the vmac bridge
//!
//! This crate contains everything between the serial link and the panel
//! that does not depend on a specific chip:
//!
//! - Input state store (pointer accumulation, polled once per emulator tick)
//! - Keyboard translator (edge synthesis from state snapshots)
//! - Dirty-region tracking
//! - Monochrome to colour framebuffer conversion
//! - Frame-ready / vertical-sync synchronisation
//! - Configuration type definitions
//!
//! All cross-context state lives in [`Bridge`], which the firmware keeps in a
//! `static` and hands by reference to every task and to the emulator hooks.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod input;
pub mod video;

pub use bridge::Bridge;
