//! Deferred compositor
//!
//! Collects invalidated panel areas until a redraw is requested, for
//! boards where the caller pushes pixels to the panel itself (typically in
//! the blanking interval after vsync).

use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use vmac_hal::Compositor;

/// Compositor that records what to redraw instead of drawing it
#[derive(Debug, Default)]
pub struct DeferredCompositor {
    pending: Option<Rectangle>,
    requested: bool,
}

impl DeferredCompositor {
    pub const fn new() -> Self {
        Self {
            pending: None,
            requested: false,
        }
    }

    /// Area to flush, if a redraw was requested since the last call
    ///
    /// Invalidated areas stay pending until a redraw is requested.
    pub fn take_request(&mut self) -> Option<Rectangle> {
        if !core::mem::take(&mut self.requested) {
            return None;
        }
        self.pending.take()
    }
}

impl Compositor for DeferredCompositor {
    fn invalidate_region(&mut self, area: Rectangle) {
        self.pending = Some(match self.pending {
            Some(pending) => enclose(pending, area),
            None => area,
        });
    }

    fn request_redraw_now(&mut self) {
        self.requested = true;
    }
}

/// Smallest rectangle containing both
fn enclose(a: Rectangle, b: Rectangle) -> Rectangle {
    let a_end = a.top_left + a.size;
    let b_end = b.top_left + b.size;
    let top_left = Point::new(a.top_left.x.min(b.top_left.x), a.top_left.y.min(b.top_left.y));
    let end = Point::new(a_end.x.max(b_end.x), a_end.y.max(b_end.y));
    Rectangle::with_corners(top_left, end - Point::new(1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Size;

    #[test]
    fn test_nothing_without_redraw_request() {
        let mut compositor = DeferredCompositor::new();
        compositor.invalidate_region(Rectangle::new(Point::new(8, 2), Size::new(8, 2)));
        assert_eq!(compositor.take_request(), None);

        compositor.request_redraw_now();
        assert_eq!(
            compositor.take_request(),
            Some(Rectangle::new(Point::new(8, 2), Size::new(8, 2)))
        );
        assert_eq!(compositor.take_request(), None);
    }

    #[test]
    fn test_invalidated_areas_enclosed() {
        let mut compositor = DeferredCompositor::new();
        compositor.invalidate_region(Rectangle::new(Point::new(64, 69), Size::new(16, 4)));
        compositor.invalidate_region(Rectangle::new(Point::new(100, 60), Size::new(8, 2)));
        compositor.request_redraw_now();

        let area = compositor.take_request().unwrap();
        assert_eq!(area, Rectangle::new(Point::new(64, 60), Size::new(44, 13)));
    }

    #[test]
    fn test_contained_area_keeps_outer() {
        let outer = Rectangle::new(Point::new(0, 0), Size::new(32, 32));
        let mut compositor = DeferredCompositor::new();
        compositor.invalidate_region(outer);
        compositor.invalidate_region(Rectangle::new(Point::new(8, 8), Size::new(8, 8)));
        compositor.request_redraw_now();
        assert_eq!(compositor.take_request(), Some(outer));
    }

    #[test]
    fn test_request_without_area_is_empty() {
        let mut compositor = DeferredCompositor::new();
        compositor.request_redraw_now();
        assert_eq!(compositor.take_request(), None);
    }
}
