//! Inter-task communication
//!
//! Defines the statics shared between Embassy tasks, the emulator core and
//! interrupt context. Uses embassy-sync primitives throughout.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;

use vmac_core::Bridge;

/// Capacity of the UART to decoder byte pipe
pub const RX_PIPE_SIZE: usize = 512;

/// Raw bytes from the companion controller, written by the UART pump
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE> = Pipe::new();

/// State shared by the input task, the emulator hooks and the display task
pub static BRIDGE: Bridge<'static, CriticalSectionRawMutex> = Bridge::new();
