//! Framebuffer converter
//!
//! Expands the emulator's 1-bit framebuffer into the colour buffer the
//! compositor displays, touching only the requested rectangle.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::config::{ConfigError, VideoConfig};
use crate::video::dirty::DirtyRect;
use crate::video::lut::Lut;

/// Monochrome to colour converter
///
/// Sole writer of the colour buffer. Source rows are `width / 8` bytes,
/// destination rows `width` pixels.
pub struct Converter<'a> {
    lut: &'a Lut,
    pixels: &'a mut [Rgb565],
    width: usize,
    height: usize,
}

impl<'a> Converter<'a> {
    /// Create a converter writing into `pixels`
    ///
    /// The buffer is filled with the background colour so the panel shows
    /// a blank screen until the first frame arrives.
    pub fn new(video: &VideoConfig, lut: &'a Lut, pixels: &'a mut [Rgb565]) -> Result<Self, ConfigError> {
        video.validate()?;
        let needed = video.pixel_count();
        if pixels.len() < needed {
            return Err(ConfigError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }

        let mut converter = Self {
            lut,
            pixels: &mut pixels[..needed],
            width: video.width as usize,
            height: video.height as usize,
        };
        converter.clear();
        Ok(converter)
    }

    /// Colour buffer, row-major
    pub fn pixels(&self) -> &[Rgb565] {
        self.pixels
    }

    /// Surface width in pixels (destination row length)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Fill the whole buffer with the background colour
    pub fn clear(&mut self) {
        self.pixels.fill(self.lut.background());
    }

    /// Convert the whole surface
    pub fn convert_full(&mut self, source: &[u8]) -> Option<Rectangle> {
        self.convert(source, DirtyRect::new(0, 0, self.height as i32, self.width as i32))
    }

    /// Convert the pixels covered by `dirty`
    ///
    /// Columns are widened to whole source bytes, then the area is clamped
    /// to the surface (and to the rows `source` actually holds). Returns the
    /// area written in emulated coordinates, or `None` if nothing was.
    pub fn convert(&mut self, source: &[u8], dirty: DirtyRect) -> Option<Rectangle> {
        let stride = self.width / 8;
        let rows = self.height.min(source.len() / stride);

        let top = clamp(dirty.top, rows);
        let bottom = clamp(dirty.bottom, rows);
        let left = clamp(dirty.left, self.width) & !7;
        let right = ((clamp(dirty.right, self.width) + 7) & !7).min(self.width);

        if top >= bottom || left >= right {
            return None;
        }

        let (first_byte, last_byte) = (left / 8, right / 8);
        for y in top..bottom {
            let src = &source[y * stride + first_byte..y * stride + last_byte];
            let dst = &mut self.pixels[y * self.width + left..y * self.width + right];
            for (octet, &byte) in dst.chunks_exact_mut(8).zip(src) {
                octet.copy_from_slice(self.lut.octet(byte));
            }
        }

        Some(Rectangle::new(
            Point::new(left as i32, top as i32),
            Size::new((right - left) as u32, (bottom - top) as u32),
        ))
    }
}

fn clamp(value: i32, max: usize) -> usize {
    (value.max(0) as usize).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    const W: usize = 32;
    const H: usize = 4;

    fn video() -> VideoConfig {
        VideoConfig {
            width: W as u32,
            height: H as u32,
            ..VideoConfig::default()
        }
    }

    fn lut() -> Lut {
        Lut::new(Rgb565::BLACK, Rgb565::WHITE)
    }

    fn px(on: bool) -> Rgb565 {
        if on {
            Rgb565::BLACK
        } else {
            Rgb565::WHITE
        }
    }

    #[test]
    fn test_buffer_starts_blank() {
        let lut = lut();
        let mut pixels = [Rgb565::BLACK; W * H];
        let converter = Converter::new(&video(), &lut, &mut pixels).unwrap();
        assert!(converter.pixels().iter().all(|&p| p == Rgb565::WHITE));
    }

    #[test]
    fn test_rejects_small_buffer() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H - 1];
        let result = Converter::new(&video(), &lut, &mut pixels);
        assert!(matches!(
            result,
            Err(ConfigError::BufferTooSmall { needed: 128, got: 127 })
        ));
    }

    #[test]
    fn test_full_conversion_bit_exact() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H];
        let mut converter = Converter::new(&video(), &lut, &mut pixels).unwrap();

        let mut source = [0u8; W / 8 * H];
        source[0] = 0b1000_0001;
        source[5] = 0xF0; // row 1, byte 1

        let area = converter.convert_full(&source).unwrap();
        assert_eq!(area, Rectangle::new(Point::zero(), Size::new(W as u32, H as u32)));

        let out = converter.pixels();
        assert_eq!(out[0], px(true));
        assert_eq!(out[1], px(false));
        assert_eq!(out[7], px(true));
        for i in 0..8 {
            assert_eq!(out[W + 8 + i], px(i < 4));
        }
    }

    #[test]
    fn test_dirty_rect_aligned_outward() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H];
        let mut converter = Converter::new(&video(), &lut, &mut pixels).unwrap();
        let source = [0xFFu8; W / 8 * H];

        let area = converter.convert(&source, DirtyRect::new(1, 9, 2, 17)).unwrap();
        assert_eq!(area, Rectangle::new(Point::new(8, 1), Size::new(16, 1)));

        let out = converter.pixels();
        for x in 0..W {
            let expected = (8..24).contains(&x);
            assert_eq!(out[W + x], px(expected), "row 1 column {}", x);
            assert_eq!(out[x], px(false));
            assert_eq!(out[2 * W + x], px(false));
        }
    }

    #[test]
    fn test_dirty_rect_clamped() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H];
        let mut converter = Converter::new(&video(), &lut, &mut pixels).unwrap();
        let source = [0xFFu8; W / 8 * H];

        let area = converter.convert(&source, DirtyRect::new(-5, -3, 100, 1000)).unwrap();
        assert_eq!(area, Rectangle::new(Point::zero(), Size::new(W as u32, H as u32)));
        assert!(converter.pixels().iter().all(|&p| p == Rgb565::BLACK));
    }

    #[test]
    fn test_empty_rect_writes_nothing() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H];
        let mut converter = Converter::new(&video(), &lut, &mut pixels).unwrap();
        let source = [0xFFu8; W / 8 * H];

        assert_eq!(converter.convert(&source, DirtyRect::new(2, 0, 2, 32)), None);
        assert_eq!(converter.convert(&source, DirtyRect::new(0, 40, 4, 50)), None);
        assert!(converter.pixels().iter().all(|&p| p == Rgb565::WHITE));
    }

    #[test]
    fn test_short_source_limits_rows() {
        let lut = lut();
        let mut pixels = [Rgb565::WHITE; W * H];
        let mut converter = Converter::new(&video(), &lut, &mut pixels).unwrap();
        let source = [0xFFu8; W / 8 * 2];

        let area = converter.convert_full(&source).unwrap();
        assert_eq!(area.size, Size::new(W as u32, 2));
    }
}
