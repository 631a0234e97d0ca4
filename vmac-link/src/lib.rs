//! Serial HID Link Protocol
//!
//! This crate defines the one-way serial protocol between the companion
//! HID controller (which owns the USB/Bluetooth mouse and keyboard) and the
//! bridge. The controller never waits for an answer: every packet is a
//! snapshot of the current input state, and anything malformed is simply
//! dropped by the receiver.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌──────┬────────┬────────┬─────────────┬──────────┐
//! │ TYPE │ LEN_LO │ LEN_HI │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B     │ LEN bytes   │ 1B       │
//! └──────┴────────┴────────┴─────────────┴──────────┘
//! ```
//!
//! - `TYPE` is `'M'` (pointer motion) or `'K'` (keyboard report)
//! - `CHECKSUM` is the XOR of the three header bytes and every payload byte
//!
//! There is no start-of-frame marker, so the receiver stays aligned by
//! always consuming exactly `3 + LEN + 1` bytes per frame, even when it
//! cannot keep the payload.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod framer;
pub mod input;
pub mod keymap;
pub mod packet;

pub use framer::{LinkError, LinkFramer, LinkStats, DISCARD_CHUNK};
pub use input::{DecodeError, KeyEvent, PointerEvent};
pub use keymap::{hid_to_mac, MODIFIER_PRIORITY};
pub use packet::{checksum, encode_packet, EncodeError, Packet, PacketKind, HEADER_LEN};
