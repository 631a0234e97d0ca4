//! Display compositor abstraction
//!
//! The compositor owns the physical panel and the widget that shows the
//! emulated screen. The bridge writes colour pixels into its own buffer and
//! then asks the compositor to refresh only the area it touched.

use embedded_graphics::primitives::Rectangle;

/// Panel compositor
///
/// `invalidate_region` and `request_redraw_now` are always called as a
/// pair, invalidation first.
pub trait Compositor {
    /// Mark an area of the panel (in panel coordinates) as needing redraw
    fn invalidate_region(&mut self, area: Rectangle);

    /// Flush all invalidated areas to the panel immediately
    fn request_redraw_now(&mut self);
}
