//! Configuration types
//!
//! Board-agnostic settings for the serial link and the video path. The
//! firmware fills these from its embedded `bridge.toml` with
//! [`parse_config`].

pub mod toml;

pub use toml::{parse_config, ParseError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Emulated display width in pixels (compact Macintosh)
pub const EMU_WIDTH: u32 = 512;

/// Emulated display height in pixels
pub const EMU_HEIGHT: u32 = 342;

/// Physical panel width the defaults centre the image on
pub const PANEL_WIDTH: u32 = 640;

/// Physical panel height the defaults centre the image on
pub const PANEL_HEIGHT: u32 = 480;

/// RGB565 black
pub const RGB565_BLACK: u16 = 0x0000;

/// RGB565 white
pub const RGB565_WHITE: u16 = 0xFFFF;

/// Configuration errors
///
/// All of these are fatal at startup: the video path cannot run without a
/// valid geometry and a destination buffer to match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    EmptyGeometry,
    /// Width is not a whole number of source bytes
    UnalignedWidth(u32),
    /// Destination buffer holds fewer than `width * height` pixels
    BufferTooSmall { needed: usize, got: usize },
}

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// UART baud rate
    pub baudrate: u32,
    /// Largest payload accepted; larger frames are discarded
    pub payload_capacity: u16,
    /// Per-chunk wait while discarding an oversize frame
    pub discard_timeout_ms: u32,
    /// Pause between decode-loop iterations
    pub poll_interval_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baudrate: 921_600,
            payload_capacity: 64,
            discard_timeout_ms: 10,
            poll_interval_ms: 1,
        }
    }
}

/// Video path settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VideoConfig {
    /// Emulated display width in pixels
    pub width: u32,
    /// Emulated display height in pixels
    pub height: u32,
    /// Panel column of the image's left edge
    pub x_offset: i32,
    /// Panel row of the image's top edge
    pub y_offset: i32,
    /// Colour for set bits (RGB565)
    pub foreground: u16,
    /// Colour for clear bits (RGB565)
    pub background: u16,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: EMU_WIDTH,
            height: EMU_HEIGHT,
            x_offset: ((PANEL_WIDTH - EMU_WIDTH) / 2) as i32,
            y_offset: ((PANEL_HEIGHT - EMU_HEIGHT) / 2) as i32,
            foreground: RGB565_BLACK,
            background: RGB565_WHITE,
        }
    }
}

impl VideoConfig {
    /// Check the geometry can be converted byte-wise
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGeometry);
        }
        if self.width % 8 != 0 {
            return Err(ConfigError::UnalignedWidth(self.width));
        }
        Ok(())
    }

    /// Number of colour pixels in the destination buffer
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row of the monochrome source
    pub fn stride(&self) -> usize {
        self.width as usize / 8
    }
}

/// Complete bridge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BridgeConfig {
    pub link: LinkConfig,
    pub video: VideoConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_centres_image() {
        let video = VideoConfig::default();
        assert_eq!(video.x_offset, 64);
        assert_eq!(video.y_offset, 69);
        assert_eq!(video.stride(), 64);
        assert_eq!(video.pixel_count(), 512 * 342);
        assert!(video.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut video = VideoConfig::default();
        video.width = 0;
        assert_eq!(video.validate(), Err(ConfigError::EmptyGeometry));

        video.width = 510;
        assert_eq!(video.validate(), Err(ConfigError::UnalignedWidth(510)));
    }

    #[test]
    fn test_link_defaults() {
        let link = LinkConfig::default();
        assert_eq!(link.baudrate, 921_600);
        assert_eq!(link.payload_capacity, 64);
        assert_eq!(link.discard_timeout_ms, 10);
    }
}
