//! Display task
//!
//! Runs the presenter: one conversion per published frame, paced by vsync,
//! then pushes the converted area to the panel during blanking.

use defmt::*;
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;

use vmac_core::video::{DeferredCompositor, Presenter};

use crate::channels::BRIDGE;
use crate::display::Panel;

#[embassy_executor::task]
pub async fn display_task(mut presenter: Presenter<'static>, mut panel: Panel<'static>, offset: Point) {
    info!("Display task started");

    let mut compositor = DeferredCompositor::new();

    loop {
        if presenter.run_cycle(&BRIDGE, &mut compositor).await.is_none() {
            trace!("Frame with nothing dirty");
            continue;
        }

        let Some(area) = compositor.take_request() else {
            continue;
        };

        let source = Rectangle::new(area.top_left - offset, area.size);
        let converter = presenter.converter();
        if let Err(e) = panel
            .flush(converter.pixels(), converter.width(), source, area.top_left)
            .await
        {
            warn!("Panel flush failed: {:?}", e);
        }

        debug!(
            "Frame {}: {}x{} at ({}, {})",
            presenter.presented(),
            area.size.width,
            area.size.height,
            area.top_left.x,
            area.top_left.y
        );
    }
}
