//! Pointer and keyboard payload decoding

/// Minimum payload length of a pointer packet
pub const POINTER_PAYLOAD_LEN: usize = 5;

/// Minimum payload length of a keyboard packet
pub const KEYBOARD_PAYLOAD_MIN: usize = 3;

/// Button mask bit for the primary (left) button
pub const BUTTON_LEFT: u8 = 0x01;

/// Button mask bit for the secondary (right) button
pub const BUTTON_RIGHT: u8 = 0x02;

/// Payload could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload shorter than the fixed layout requires
    TooShort { needed: usize, got: usize },
}

/// Relative mouse motion
///
/// Wire layout: `[buttons][dx_lo][dx_hi][dy_lo][dy_hi]`, two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
    pub dx: i16,
    pub dy: i16,
    pub buttons: u8,
}

impl PointerEvent {
    /// Decode a pointer payload; trailing bytes are ignored
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        match payload {
            [buttons, dx_lo, dx_hi, dy_lo, dy_hi, ..] => Ok(Self {
                dx: i16::from_le_bytes([*dx_lo, *dx_hi]),
                dy: i16::from_le_bytes([*dy_lo, *dy_hi]),
                buttons: *buttons,
            }),
            _ => Err(DecodeError::TooShort {
                needed: POINTER_PAYLOAD_LEN,
                got: payload.len(),
            }),
        }
    }

    /// Primary button held
    pub fn left_button(&self) -> bool {
        self.buttons & BUTTON_LEFT != 0
    }

    /// Secondary button held
    pub fn right_button(&self) -> bool {
        self.buttons & BUTTON_RIGHT != 0
    }
}

/// Keyboard state snapshot
///
/// Follows the boot keyboard report: byte 0 is the modifier mask, byte 1
/// is reserved and bytes 2.. are key slots. Only the first slot is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub modifiers: u8,
    pub keycode: u8,
}

impl KeyEvent {
    /// Decode a keyboard payload
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        match payload {
            [modifiers, _reserved, keycode, ..] => Ok(Self {
                modifiers: *modifiers,
                keycode: *keycode,
            }),
            _ => Err(DecodeError::TooShort {
                needed: KEYBOARD_PAYLOAD_MIN,
                got: payload.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_rel16_le() {
        let event = PointerEvent::parse(&[0x01, 0xFE, 0xFF, 0x0A, 0x00]).unwrap();
        assert_eq!(event.dx, -2);
        assert_eq!(event.dy, 10);
        assert_eq!(event.buttons, 0x01);
        assert!(event.left_button());
        assert!(!event.right_button());
    }

    #[test]
    fn test_pointer_extremes() {
        let event = PointerEvent::parse(&[0x02, 0x00, 0x80, 0xFF, 0x7F]).unwrap();
        assert_eq!(event.dx, i16::MIN);
        assert_eq!(event.dy, i16::MAX);
        assert!(event.right_button());
    }

    #[test]
    fn test_pointer_too_short() {
        assert_eq!(
            PointerEvent::parse(&[0x01, 0x02, 0x03, 0x04]),
            Err(DecodeError::TooShort { needed: 5, got: 4 })
        );
    }

    #[test]
    fn test_keyboard_boot_report() {
        // Left shift + 'a', full 8-byte report
        let event = KeyEvent::parse(&[0x02, 0x00, 0x04, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(event.modifiers, 0x02);
        assert_eq!(event.keycode, 0x04);
    }

    #[test]
    fn test_keyboard_minimum_length() {
        assert!(KeyEvent::parse(&[0x00, 0x00, 0x28]).is_ok());
        assert_eq!(
            KeyEvent::parse(&[0x00, 0x00]),
            Err(DecodeError::TooShort { needed: 3, got: 2 })
        );
    }
}
