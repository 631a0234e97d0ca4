//! Packet layout, checksum and encoding
//!
//! Frame format:
//! - TYPE (1 byte): `'M'` or `'K'`
//! - LEN (2 bytes): payload length, little-endian
//! - PAYLOAD (LEN bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of TYPE, both LEN bytes and all PAYLOAD bytes

/// Size of the fixed frame header (type + 16-bit length)
pub const HEADER_LEN: usize = 3;

/// Size of the trailing checksum
pub const CHECKSUM_LEN: usize = 1;

/// Wire tag for pointer-motion packets
pub const TAG_POINTER: u8 = b'M';

/// Wire tag for keyboard-report packets
pub const TAG_KEYBOARD: u8 = b'K';

/// Kind of packet carried on the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// Relative mouse motion and button state
    Pointer,
    /// Keyboard report (modifier mask and first key slot)
    Keyboard,
}

impl PacketKind {
    /// Parse a kind from its wire tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_POINTER => Some(PacketKind::Pointer),
            TAG_KEYBOARD => Some(PacketKind::Keyboard),
            _ => None,
        }
    }

    /// Wire tag for this kind
    pub fn tag(self) -> u8 {
        match self {
            PacketKind::Pointer => TAG_POINTER,
            PacketKind::Keyboard => TAG_KEYBOARD,
        }
    }
}

/// A verified packet
///
/// The payload borrows the receive buffer handed to the framer, so a packet
/// lives only until the next read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet<'a> {
    /// Packet kind
    pub kind: PacketKind,
    /// Payload bytes (length is `payload.len()`)
    pub payload: &'a [u8],
    /// Checksum byte as received (already verified)
    pub checksum: u8,
}

impl Packet<'_> {
    /// Payload length as carried in the header
    pub fn len(&self) -> u16 {
        self.payload.len() as u16
    }

    /// True if the packet carries no payload
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Errors that can occur when encoding a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Payload does not fit the 16-bit length field
    PayloadTooLarge,
    /// Output buffer too small for the encoded frame
    BufferTooSmall,
}

/// Running XOR over header and payload bytes
pub fn checksum(header: &[u8; HEADER_LEN], payload: &[u8]) -> u8 {
    let mut sum = header[0] ^ header[1] ^ header[2];
    for &byte in payload {
        sum ^= byte;
    }
    sum
}

/// Encode a packet into `out`
///
/// Returns the number of bytes written (`HEADER_LEN + payload.len() + 1`).
pub fn encode_packet(kind: PacketKind, payload: &[u8], out: &mut [u8]) -> Result<usize, EncodeError> {
    let len = u16::try_from(payload.len()).map_err(|_| EncodeError::PayloadTooLarge)?;
    let frame_len = HEADER_LEN + payload.len() + CHECKSUM_LEN;
    if out.len() < frame_len {
        return Err(EncodeError::BufferTooSmall);
    }

    let [len_lo, len_hi] = len.to_le_bytes();
    let header = [kind.tag(), len_lo, len_hi];

    out[..HEADER_LEN].copy_from_slice(&header);
    out[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
    out[frame_len - 1] = checksum(&header, payload);

    Ok(frame_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pointer_packet() {
        let mut out = [0u8; 16];
        let len = encode_packet(PacketKind::Pointer, &[0x01, 0xFE, 0xFF, 0x0A, 0x00], &mut out).unwrap();

        assert_eq!(len, 9);
        assert_eq!(&out[..3], &[b'M', 5, 0]);
        assert_eq!(&out[3..8], &[0x01, 0xFE, 0xFF, 0x0A, 0x00]);
        // 'M' ^ 5 ^ 0 ^ 0x01 ^ 0xFE ^ 0xFF ^ 0x0A ^ 0x00
        assert_eq!(out[8], b'M' ^ 5 ^ 0x01 ^ 0xFE ^ 0xFF ^ 0x0A);
    }

    #[test]
    fn test_encode_empty_payload() {
        let mut out = [0u8; 4];
        let len = encode_packet(PacketKind::Keyboard, &[], &mut out).unwrap();

        assert_eq!(len, 4);
        assert_eq!(out, [b'K', 0, 0, b'K']);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let mut out = [0u8; 8];
        let result = encode_packet(PacketKind::Pointer, &[0; 5], &mut out);
        assert_eq!(result, Err(EncodeError::BufferTooSmall));
    }

    #[test]
    fn test_length_is_little_endian() {
        let payload = [0x55u8; 300];
        let mut out = [0u8; 304];
        encode_packet(PacketKind::Keyboard, &payload, &mut out).unwrap();

        assert_eq!(out[1], 0x2C); // 300 = 0x012C
        assert_eq!(out[2], 0x01);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(PacketKind::from_tag(b'M'), Some(PacketKind::Pointer));
        assert_eq!(PacketKind::from_tag(b'K'), Some(PacketKind::Keyboard));
        assert_eq!(PacketKind::from_tag(b'X'), None);
        assert_eq!(PacketKind::from_tag(0), None);
        assert_eq!(PacketKind::Keyboard.tag(), b'K');
    }
}
