//! Monochrome byte to colour octet lookup
//!
//! Every source byte expands to eight panel pixels. The table holds all 256
//! expansions so conversion is one lookup and one 16-byte copy per byte.

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;

/// 256 × 8 colour expansion table
///
/// `octet(b)[i]` is the pixel for bit `7 - i` of `b`: the most significant
/// bit is the leftmost pixel. A set bit is foreground.
pub struct Lut {
    table: [[Rgb565; 8]; 256],
}

impl Lut {
    /// Build the table for the given colours
    pub fn new(foreground: Rgb565, background: Rgb565) -> Self {
        let mut table = [[background; 8]; 256];
        for (byte, octet) in table.iter_mut().enumerate() {
            for (bit, pixel) in octet.iter_mut().enumerate() {
                if byte & (0x80 >> bit) != 0 {
                    *pixel = foreground;
                }
            }
        }
        Self { table }
    }

    /// Build the table from raw RGB565 values
    pub fn from_raw(foreground: u16, background: u16) -> Self {
        Self::new(RawU16::new(foreground).into(), RawU16::new(background).into())
    }

    /// Eight pixels for one source byte
    #[inline(always)]
    pub fn octet(&self, byte: u8) -> &[Rgb565; 8] {
        &self.table[usize::from(byte)]
    }

    /// Colour of clear bits
    pub fn background(&self) -> Rgb565 {
        self.table[0][0]
    }
}
