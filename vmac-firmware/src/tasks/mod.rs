//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod display;
pub mod input;
pub mod uart_rx;
pub mod vsync;

pub use display::display_task;
pub use input::input_task;
pub use uart_rx::uart_rx_task;
pub use vsync::vsync_task;
