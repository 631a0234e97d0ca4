//! DCS panel driver
//!
//! Driver for 640x480 RGB565 panels with a MIPI DCS command set over a
//! 4-wire SPI bus (separate data/command line).
//!
//! Controller bring-up is left to the panel's reset defaults. Only the
//! pixel format and the tearing-effect output that drives vsync are set.

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Error, Spi};
use embassy_time::Timer;
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use vmac_core::config::{PANEL_HEIGHT, PANEL_WIDTH};

/// Longest row pushed in one transfer
const MAX_ROW: usize = PANEL_WIDTH as usize;

/// DCS commands
mod cmd {
    pub const SLEEP_OUT: u8 = 0x11;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDRESS: u8 = 0x2A;
    pub const PAGE_ADDRESS: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const TEARING_ON: u8 = 0x35;
    pub const PIXEL_FORMAT: u8 = 0x3A;
}

/// 16 bits per pixel on the interface
const COLMOD_RGB565: u8 = 0x55;

/// DCS panel on SPI0
pub struct Panel<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
    row: [u8; MAX_ROW * 2],
}

impl<'d> Panel<'d> {
    pub fn new(spi: Spi<'d, SPI0, Async>, dc: Output<'d>, cs: Output<'d>) -> Self {
        Self {
            spi,
            dc,
            cs,
            row: [0; MAX_ROW * 2],
        }
    }

    /// Initialize the panel and fill it with `background`
    pub async fn init(&mut self, background: Rgb565) -> Result<(), Error> {
        self.command(cmd::SLEEP_OUT, &[]).await?;
        Timer::after_millis(120).await;

        self.command(cmd::PIXEL_FORMAT, &[COLMOD_RGB565]).await?;
        // Tearing line pulses on vertical blanking only
        self.command(cmd::TEARING_ON, &[0x00]).await?;

        self.fill(
            Rectangle::new(Point::zero(), Size::new(PANEL_WIDTH, PANEL_HEIGHT)),
            background,
        )
        .await?;

        self.command(cmd::DISPLAY_ON, &[]).await
    }

    /// Fill an area of the panel with one colour
    pub async fn fill(&mut self, area: Rectangle, colour: Rgb565) -> Result<(), Error> {
        let width = (area.size.width as usize).min(MAX_ROW);
        let bytes = RawU16::from(colour).into_inner().to_be_bytes();
        for px in self.row[..width * 2].chunks_exact_mut(2) {
            px.copy_from_slice(&bytes);
        }

        self.set_window(area).await?;
        self.cs.set_low();
        self.dc.set_high();
        let mut result = Ok(());
        for _ in 0..area.size.height {
            result = self.spi.write(&self.row[..width * 2]).await;
            if result.is_err() {
                break;
            }
        }
        self.cs.set_high();
        result
    }

    /// Copy `source` (an area of `pixels`, rows `stride` pixels long) to the
    /// panel with its top-left corner at `target`
    pub async fn flush(
        &mut self,
        pixels: &[Rgb565],
        stride: usize,
        source: Rectangle,
        target: Point,
    ) -> Result<(), Error> {
        let left = source.top_left.x.max(0) as usize;
        let top = source.top_left.y.max(0) as usize;
        let width = (source.size.width as usize).min(MAX_ROW);
        let height = source.size.height as usize;

        self.set_window(Rectangle::new(target, Size::new(width as u32, height as u32)))
            .await?;

        self.cs.set_low();
        self.dc.set_high();
        let mut result = Ok(());
        for y in top..top + height {
            let start = y * stride + left;
            let Some(line) = pixels.get(start..start + width) else {
                break;
            };
            for (px, out) in line.iter().zip(self.row.chunks_exact_mut(2)) {
                out.copy_from_slice(&RawU16::from(*px).into_inner().to_be_bytes());
            }
            result = self.spi.write(&self.row[..width * 2]).await;
            if result.is_err() {
                break;
            }
        }
        self.cs.set_high();
        result
    }

    /// Set the column/page window for the next memory write
    async fn set_window(&mut self, area: Rectangle) -> Result<(), Error> {
        let x0 = area.top_left.x as u16;
        let y0 = area.top_left.y as u16;
        let x1 = x0 + area.size.width.saturating_sub(1) as u16;
        let y1 = y0 + area.size.height.saturating_sub(1) as u16;

        let [xs0, xs1] = x0.to_be_bytes();
        let [xe0, xe1] = x1.to_be_bytes();
        let [ys0, ys1] = y0.to_be_bytes();
        let [ye0, ye1] = y1.to_be_bytes();

        self.command(cmd::COLUMN_ADDRESS, &[xs0, xs1, xe0, xe1]).await?;
        self.command(cmd::PAGE_ADDRESS, &[ys0, ys1, ye0, ye1]).await?;
        self.command(cmd::MEMORY_WRITE, &[]).await
    }

    /// Send a command with optional parameter bytes
    async fn command(&mut self, command: u8, params: &[u8]) -> Result<(), Error> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.write(&[command]).await;
        if result.is_ok() && !params.is_empty() {
            self.dc.set_high();
            result = self.spi.write(params).await;
        }
        // MEMORY_WRITE keeps the chip selected for the pixel data that follows
        if command != cmd::MEMORY_WRITE || result.is_err() {
            self.cs.set_high();
        }
        result
    }
}
