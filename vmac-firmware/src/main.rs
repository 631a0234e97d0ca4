//! vmac bridge - Emulator I/O bridge firmware
//!
//! Runs a compact Macintosh emulator core on core 1 and bridges it to the
//! outside world from core 0:
//!
//! - Keyboard and mouse reports arrive from a companion HID controller over
//!   UART and are decoded into the emulator's input state
//! - The emulator's 1-bit framebuffer is expanded to RGB565 and pushed to a
//!   640x480 panel, paced by the panel's vertical sync

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use vmac_core::config::{parse_config, BridgeConfig, EMU_HEIGHT, EMU_WIDTH};
use vmac_core::video::{Converter, Lut, Presenter};

use crate::display::Panel;

mod channels;
mod display;
mod emulator;
mod serial;
mod tasks;

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Embedded configuration (compiled into firmware)
/// Edit bridge.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../bridge.toml");

/// Colour framebuffer capacity; bridge.toml geometry must fit it
const FRAMEBUFFER_PIXELS: usize = (EMU_WIDTH * EMU_HEIGHT) as usize;

/// Panel SPI clock
const SPI_FREQUENCY_HZ: u32 = 62_500_000;

const CORE1_STACK_SIZE: usize = 16 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

static FRAMEBUFFER: ConstStaticCell<[Rgb565; FRAMEBUFFER_PIXELS]> =
    ConstStaticCell::new([Rgb565::BLACK; FRAMEBUFFER_PIXELS]);
static LUT: StaticCell<Lut> = StaticCell::new();
static CORE1_STACK: ConstStaticCell<Stack<CORE1_STACK_SIZE>> = ConstStaticCell::new(Stack::new());

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("vmac bridge starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let link = config.link;
    let video = config.video;
    info!(
        "Link: {} baud, {} byte payloads; video: {}x{} at ({}, {})",
        link.baudrate, link.payload_capacity, video.width, video.height, video.x_offset, video.y_offset
    );

    // Companion controller UART (receive only)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = link.baudrate;

    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();

    info!("UART initialized");

    // Panel on SPI0: SCK=GPIO18, MOSI=GPIO19, CS=GPIO17, DC=GPIO20, TE=GPIO21
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_20, Level::Low);
    let te = Input::new(p.PIN_21, Pull::None);

    let lut: &'static Lut = LUT.init(Lut::from_raw(video.foreground, video.background));

    let mut panel = Panel::new(spi, dc, cs);
    if let Err(e) = panel.init(lut.background()).await {
        error!("Panel init failed: {:?}", e);
    }

    let converter = match Converter::new(&video, lut, FRAMEBUFFER.take()) {
        Ok(converter) => converter,
        Err(e) => {
            error!("Invalid video configuration: {:?}", e);
            return;
        }
    };
    let offset = Point::new(video.x_offset, video.y_offset);
    let mut presenter = Presenter::new(converter, offset);
    // First frame paints the whole image, not just its dirty area
    presenter.request_full_refresh();

    info!("Video path initialized");

    spawner.spawn(tasks::uart_rx_task(rx)).unwrap();
    spawner.spawn(tasks::input_task(link)).unwrap();
    spawner.spawn(tasks::vsync_task(te)).unwrap();
    spawner
        .spawn(tasks::display_task(presenter, panel, offset))
        .unwrap();

    let frame_len = video.stride() * video.height as usize;
    spawn_core1(p.CORE1, CORE1_STACK.take(), move || emulator::run(frame_len));

    info!("All tasks spawned, bridge running");
}

/// Parse the embedded configuration
///
/// Falls back to defaults if bridge.toml cannot be parsed; build.rs
/// validates it, so this only happens with a hand-edited binary.
fn load_config() -> BridgeConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            BridgeConfig::default()
        }
    }
}
