//! Input path: pointer accumulation and keyboard translation
//!
//! Packets from the link are routed by [`InputDecoder`]: pointer motion is
//! summed into the shared [`InputState`] for the emulator to drain once per
//! tick, and keyboard reports go through the [`KeyboardTranslator`] straight
//! into the emulated keyboard.

pub mod keyboard;
pub mod state;

pub use keyboard::{KeySink, KeyboardTranslator, ModifierLatch};
pub use state::{InputState, MouseSample};

use embassy_sync::blocking_mutex::raw::RawMutex;
use vmac_link::{DecodeError, KeyEvent, Packet, PacketKind, PointerEvent};

/// What a packet turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded {
    Pointer(PointerEvent),
    Keyboard(KeyEvent),
}

/// Routes verified packets to the input state and the emulated keyboard
///
/// Owned by the decode loop; the only producer for its [`InputState`].
pub struct InputDecoder<'a, M: RawMutex> {
    state: &'a InputState<M>,
    keyboard: KeyboardTranslator,
}

impl<'a, M: RawMutex> InputDecoder<'a, M> {
    /// Create a decoder feeding `state`
    pub fn new(state: &'a InputState<M>) -> Self {
        Self {
            state,
            keyboard: KeyboardTranslator::new(),
        }
    }

    /// Current keyboard latch
    pub fn latch(&self) -> ModifierLatch {
        self.keyboard.latch()
    }

    /// Decode one packet and apply it
    ///
    /// A short payload is dropped without touching any state.
    pub fn handle<S: KeySink>(&mut self, packet: &Packet<'_>, keys: &mut S) -> Result<Decoded, DecodeError> {
        match packet.kind {
            PacketKind::Pointer => {
                let event = PointerEvent::parse(packet.payload)?;
                self.state.accumulate(event.dx, event.dy, event.buttons);
                Ok(Decoded::Pointer(event))
            }
            PacketKind::Keyboard => {
                let event = KeyEvent::parse(packet.payload)?;
                self.keyboard.apply(event, keys);
                Ok(Decoded::Keyboard(event))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    fn packet(kind: PacketKind, payload: &[u8]) -> Packet<'_> {
        Packet {
            kind,
            payload,
            checksum: 0,
        }
    }

    #[test]
    fn test_pointer_packets_accumulate() {
        let state: InputState<CriticalSectionRawMutex> = InputState::new();
        let mut decoder = InputDecoder::new(&state);
        let mut keys = |_: u8, _: bool| panic!("no key expected");

        decoder
            .handle(&packet(PacketKind::Pointer, &[0x00, 0x03, 0x00, 0x04, 0x00]), &mut keys)
            .unwrap();
        decoder
            .handle(&packet(PacketKind::Pointer, &[0x01, 0xFF, 0xFF, 0x02, 0x00]), &mut keys)
            .unwrap();

        assert_eq!(
            state.drain(),
            MouseSample {
                dx: 2,
                dy: 6,
                left_button: true
            }
        );
    }

    #[test]
    fn test_keyboard_packets_reach_sink() {
        let state: InputState<CriticalSectionRawMutex> = InputState::new();
        let mut decoder = InputDecoder::new(&state);
        let mut events = std::vec::Vec::new();
        let mut keys = |code: u8, down: bool| events.push((code, down));

        let decoded = decoder
            .handle(&packet(PacketKind::Keyboard, &[0x00, 0x00, 0x04]), &mut keys)
            .unwrap();
        assert_eq!(
            decoded,
            Decoded::Keyboard(KeyEvent {
                modifiers: 0,
                keycode: 0x04
            })
        );
        assert_eq!(events, [(0x00u8, true)]);
        assert_eq!(decoder.latch().primary(), Some(0x04));
    }

    #[test]
    fn test_short_payloads_dropped() {
        let state: InputState<CriticalSectionRawMutex> = InputState::new();
        let mut decoder = InputDecoder::new(&state);
        let mut keys = |_: u8, _: bool| panic!("no key expected");

        assert!(decoder
            .handle(&packet(PacketKind::Pointer, &[0x01, 0x05]), &mut keys)
            .is_err());
        assert!(decoder
            .handle(&packet(PacketKind::Keyboard, &[0x02]), &mut keys)
            .is_err());
        assert_eq!(state.drain(), MouseSample::default());
        assert_eq!(decoder.latch(), ModifierLatch::default());
    }
}
