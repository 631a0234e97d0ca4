//! Dirty-region tracking
//!
//! The emulator reports every screen area it touched; between two frame
//! conversions all reports collapse into one enclosing rectangle.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;

/// Screen rectangle in emulated pixels, half-open (`top..bottom`, `left..right`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyRect {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl DirtyRect {
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Smallest rectangle enclosing both
    pub fn union(self, other: Self) -> Self {
        Self {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    /// True if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TrackerState {
    /// Union of reports not yet taken by a conversion
    pending: Option<DirtyRect>,
    /// A report arrived since the last frame hand-off
    changed: bool,
}

/// Shared dirty-region accumulator
pub struct DirtyTracker<M: RawMutex = CriticalSectionRawMutex> {
    inner: Mutex<M, Cell<TrackerState>>,
}

impl<M: RawMutex> Default for DirtyTracker<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> DirtyTracker<M> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(TrackerState {
                pending: None,
                changed: false,
            })),
        }
    }

    /// Merge a changed area into the pending rectangle
    ///
    /// The first report after a conversion is adopted as-is; later ones
    /// only ever grow it.
    pub fn report(&self, rect: DirtyRect) {
        self.inner.lock(|cell| {
            let mut state = cell.get();
            state.pending = Some(match state.pending {
                Some(pending) => pending.union(rect),
                None => rect,
            });
            state.changed = true;
            cell.set(state);
        });
    }

    /// Take the pending rectangle, leaving nothing pending
    pub fn take_and_clear(&self) -> Option<DirtyRect> {
        self.inner.lock(|cell| {
            let mut state = cell.get();
            let pending = state.pending.take();
            cell.set(state);
            pending
        })
    }

    /// True if a rectangle is waiting for conversion
    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.inner.lock(|cell| cell.get().pending.is_some())
    }

    /// Consume the "changed since last hand-off" flag
    pub(crate) fn take_changed(&self) -> bool {
        self.inner.lock(|cell| {
            let mut state = cell.get();
            let changed = state.changed;
            state.changed = false;
            cell.set(state);
            changed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_union_of_reports() {
        let tracker: DirtyTracker = DirtyTracker::new();
        tracker.report(DirtyRect::new(10, 10, 20, 20));
        tracker.report(DirtyRect::new(5, 30, 15, 40));

        assert_eq!(tracker.take_and_clear(), Some(DirtyRect::new(5, 10, 20, 40)));
        assert_eq!(tracker.take_and_clear(), None);
    }

    #[test]
    fn test_fresh_rect_after_take() {
        let tracker: DirtyTracker = DirtyTracker::new();
        tracker.report(DirtyRect::new(0, 0, 342, 512));
        tracker.take_and_clear();

        tracker.report(DirtyRect::new(100, 100, 101, 108));
        assert!(tracker.is_pending());
        assert_eq!(tracker.take_and_clear(), Some(DirtyRect::new(100, 100, 101, 108)));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_changed_flag_independent_of_take() {
        let tracker: DirtyTracker = DirtyTracker::new();
        assert!(!tracker.take_changed());

        tracker.report(DirtyRect::new(0, 0, 1, 8));
        tracker.take_and_clear();
        assert!(tracker.take_changed());
        assert!(!tracker.take_changed());
    }

    #[test]
    fn test_empty_rect() {
        assert!(DirtyRect::new(5, 5, 5, 10).is_empty());
        assert!(DirtyRect::new(5, 10, 6, 10).is_empty());
        assert!(!DirtyRect::new(5, 5, 6, 6).is_empty());
    }

    fn rect() -> impl Strategy<Value = DirtyRect> {
        (0i32..342, 0i32..512, 0i32..342, 0i32..512)
            .prop_map(|(t, l, b, r)| DirtyRect::new(t, l, b, r))
    }

    proptest! {
        #[test]
        fn prop_report_order_irrelevant(rects in proptest::collection::vec(rect(), 1..8)) {
            let forward: DirtyTracker = DirtyTracker::new();
            let backward: DirtyTracker = DirtyTracker::new();
            for r in &rects {
                forward.report(*r);
            }
            for r in rects.iter().rev() {
                backward.report(*r);
            }
            prop_assert_eq!(forward.take_and_clear(), backward.take_and_clear());
        }
    }
}
