//! Keyboard translator
//!
//! The controller sends the *current* keyboard state on every report, never
//! explicit press/release events. This module turns consecutive snapshots
//! into key edges for the emulated keyboard, which only understands "key X
//! went down" and "key X went up".
//!
//! Tracking is deliberately narrow: one modifier and one primary key at a
//! time, matching the single key slot the link carries.

use vmac_link::{hid_to_mac, KeyEvent, MODIFIER_PRIORITY};

/// Receiver for key edges, in the emulated machine's key codes
pub trait KeySink {
    /// Apply one edge to the emulated keyboard
    fn key(&mut self, code: u8, down: bool);
}

impl<F: FnMut(u8, bool)> KeySink for F {
    fn key(&mut self, code: u8, down: bool) {
        self(code, down)
    }
}

/// Keys currently held, as input (HID) usage IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModifierLatch {
    modifier: Option<u8>,
    primary: Option<u8>,
}

impl ModifierLatch {
    /// Held modifier key, if any
    pub fn modifier(&self) -> Option<u8> {
        self.modifier
    }

    /// Held primary key, if any
    pub fn primary(&self) -> Option<u8> {
        self.primary
    }
}

/// Derives key edges from keyboard state snapshots
#[derive(Debug, Clone, Default)]
pub struct KeyboardTranslator {
    latch: ModifierLatch,
}

impl KeyboardTranslator {
    /// Create a translator with nothing held
    pub const fn new() -> Self {
        Self {
            latch: ModifierLatch {
                modifier: None,
                primary: None,
            },
        }
    }

    /// Current latch state
    pub fn latch(&self) -> ModifierLatch {
        self.latch
    }

    /// Apply one keyboard report, emitting edges into `sink`
    ///
    /// Modifier: an empty mask releases the latched modifier; otherwise the
    /// highest-priority set bit is pressed unless it is already latched.
    ///
    /// Primary key: zero releases the latched key; any other value is
    /// pressed, again on every report. Whether a repeated press means
    /// anything is up to the emulated keyboard.
    pub fn apply<S: KeySink>(&mut self, event: KeyEvent, sink: &mut S) {
        if event.modifiers == 0 {
            if let Some(held) = self.latch.modifier.take() {
                emit(sink, held, false);
            }
        } else if let Some(&(_, key)) = MODIFIER_PRIORITY
            .iter()
            .find(|(mask, _)| event.modifiers & mask != 0)
        {
            if self.latch.modifier != Some(key) {
                emit(sink, key, true);
                self.latch.modifier = Some(key);
            }
        }

        if event.keycode == 0 {
            if let Some(held) = self.latch.primary.take() {
                emit(sink, held, false);
            }
        } else {
            emit(sink, event.keycode, true);
            self.latch.primary = Some(event.keycode);
        }
    }
}

/// Forward an edge if the emulated keyboard has the key
fn emit<S: KeySink>(sink: &mut S, usage: u8, down: bool) {
    if let Some(code) = hid_to_mac(usage) {
        sink.key(code, down);
    }
}
