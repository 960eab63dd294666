//! Continuous horizontal auto-scroll.
//!
//! `AutoScroller` holds the per-frame stepping rule and is independent of any
//! toolkit type; `ScrollSurface` is the seam the widget implements over its
//! horizontal `gtk4::Adjustment`.

use gtk4::prelude::*;

/// Something with a horizontal scroll offset.
pub trait ScrollSurface {
    fn offset(&self) -> f64;
    fn set_offset(&mut self, offset: f64);
    /// Content width minus visible width.
    fn max_extent(&self) -> f64;
}

impl ScrollSurface for gtk4::Adjustment {
    fn offset(&self) -> f64 {
        self.value() - self.lower()
    }

    fn set_offset(&mut self, offset: f64) {
        self.set_value(self.lower() + offset);
    }

    fn max_extent(&self) -> f64 {
        (self.upper() - self.lower() - self.page_size()).max(0.0)
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No surface was available; nothing happened.
    Detached,
    /// Pointer is over the carousel; offset held.
    Held,
    Advanced,
    /// Reached the end of the content and jumped back to the start.
    Wrapped,
}

#[derive(Debug, Clone)]
pub struct AutoScroller {
    speed: f64,
    hovered: bool,
}

impl AutoScroller {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            hovered: false,
        }
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            tracing::trace!(hovered, "Auto-scroll hover state changed");
        }
        self.hovered = hovered;
    }

    /// Advance the surface by one frame.
    pub fn tick<S: ScrollSurface + ?Sized>(&self, surface: Option<&mut S>) -> TickOutcome {
        let Some(surface) = surface else {
            return TickOutcome::Detached;
        };

        if self.hovered {
            return TickOutcome::Held;
        }

        let next = surface.offset() + self.speed;
        if next >= surface.max_extent() {
            surface.set_offset(0.0);
            TickOutcome::Wrapped
        } else {
            surface.set_offset(next);
            TickOutcome::Advanced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSurface {
        offset: f64,
        content: f64,
        visible: f64,
    }

    impl FakeSurface {
        fn new(content: f64, visible: f64) -> Self {
            Self {
                offset: 0.0,
                content,
                visible,
            }
        }
    }

    impl ScrollSurface for FakeSurface {
        fn offset(&self) -> f64 {
            self.offset
        }

        fn set_offset(&mut self, offset: f64) {
            self.offset = offset;
        }

        fn max_extent(&self) -> f64 {
            self.content - self.visible
        }
    }

    #[test]
    fn test_tick_advances_by_speed() {
        let scroller = AutoScroller::new(0.5);
        let mut surface = FakeSurface::new(1000.0, 300.0);

        for i in 1..=4 {
            let outcome = scroller.tick(Some(&mut surface));
            assert_eq!(outcome, TickOutcome::Advanced);
            assert_eq!(surface.offset, 0.5 * i as f64);
        }
        assert_eq!(surface.offset, 2.0);
    }

    #[test]
    fn test_hover_holds_offset() {
        let mut scroller = AutoScroller::new(0.5);
        let mut surface = FakeSurface::new(1000.0, 300.0);
        surface.offset = 42.0;

        scroller.set_hovered(true);
        for _ in 0..100 {
            assert_eq!(scroller.tick(Some(&mut surface)), TickOutcome::Held);
        }
        assert_eq!(surface.offset, 42.0);

        scroller.set_hovered(false);
        scroller.tick(Some(&mut surface));
        assert_eq!(surface.offset, 42.5);
    }

    #[test]
    fn test_wraps_at_max_extent() {
        let scroller = AutoScroller::new(0.5);
        let mut surface = FakeSurface::new(1000.0, 300.0);
        surface.offset = 700.0;

        assert_eq!(scroller.tick(Some(&mut surface)), TickOutcome::Wrapped);
        assert_eq!(surface.offset, 0.0);
    }

    #[test]
    fn test_wraps_instead_of_overshooting() {
        let scroller = AutoScroller::new(0.5);
        let mut surface = FakeSurface::new(1000.0, 300.0);
        surface.offset = 699.75;

        assert_eq!(scroller.tick(Some(&mut surface)), TickOutcome::Wrapped);
        assert_eq!(surface.offset, 0.0);
    }

    #[test]
    fn test_content_narrower_than_viewport_stays_at_zero() {
        let scroller = AutoScroller::new(0.5);
        let mut surface = FakeSurface::new(200.0, 300.0);

        for _ in 0..10 {
            scroller.tick(Some(&mut surface));
            assert_eq!(surface.offset, 0.0);
        }
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let scroller = AutoScroller::new(0.5);
        assert_eq!(
            scroller.tick::<FakeSurface>(None),
            TickOutcome::Detached
        );
    }
}
