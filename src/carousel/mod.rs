//! Carousel state: display sequence, auto-scroll, visibility flags and the
//! modal selection, owned by one widget instance and changed only through the
//! transitions below.

pub mod scroller;
pub mod selection;
pub mod visibility;

pub use scroller::{AutoScroller, ScrollSurface, TickOutcome};
pub use selection::{
    hit_test, is_activation_key, is_click_release, is_dismiss_key, ModalHit, ModalState,
};
pub use visibility::{
    intersection_ratio, item_name, parse_item_index, IntersectionEntry, LoadHint, Rect,
    VisibilityPolicy, VisibilityTracker,
};

use gdk4::Key;

use crate::config::CarouselConfig;
use crate::models::{DisplaySequenceMemo, MediaItem};

#[derive(Debug)]
pub struct CarouselState {
    sequence: DisplaySequenceMemo,
    scroller: AutoScroller,
    visibility: VisibilityTracker,
    modal: ModalState,
}

impl CarouselState {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            sequence: DisplaySequenceMemo::new(config.duplicate_threshold),
            scroller: AutoScroller::new(config.scroll_speed),
            visibility: VisibilityTracker::new(
                config.visibility_policy,
                config.visibility_threshold,
            ),
            modal: ModalState::Closed,
        }
    }

    /// Replace the host list. Returns `true` when the display sequence changed,
    /// in which case load flags are cleared and observation must be re-attached.
    pub fn set_items(&mut self, items: Option<&[MediaItem]>) -> bool {
        let changed = self.sequence.update(items);
        if changed {
            self.visibility.reset();
        }
        changed
    }

    pub fn display_sequence(&self) -> &[MediaItem] {
        self.sequence.sequence()
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.scroller.set_hovered(hovered);
    }

    /// Copy of the scroller, so a tick can move the surface without holding
    /// a borrow of the state while scroll signals fire.
    pub fn scroller(&self) -> AutoScroller {
        self.scroller.clone()
    }

    /// Feed one observation batch; returns the indices whose flag changed.
    pub fn observe(&mut self, entries: &[IntersectionEntry]) -> Vec<usize> {
        self.visibility.apply(entries)
    }

    pub fn load_hint(&self, index: usize) -> LoadHint {
        self.visibility.hint(index)
    }

    pub fn active_selection(&self) -> Option<&MediaItem> {
        self.modal.active()
    }

    /// Open the modal on the item at display index `index`. Out-of-range
    /// indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        match self.sequence.sequence().get(index) {
            Some(item) => {
                tracing::debug!(index, url = item.url(), "Item selected");
                self.modal.activate(item.clone());
                true
            }
            None => {
                tracing::debug!(index, "Ignoring selection outside display sequence");
                false
            }
        }
    }

    /// Keyboard activation on a focused item. Returns `true` when the key was
    /// consumed and must not propagate.
    pub fn activate_with_key(&mut self, index: usize, keyval: Key) -> bool {
        if !is_activation_key(keyval) {
            return false;
        }
        self.select(index);
        true
    }

    /// Click on the modal layer. Returns `true` if the modal closed.
    pub fn dismiss(&mut self, hit: ModalHit) -> bool {
        self.modal.dismiss_at(hit)
    }

    /// Escape on the modal. Returns `true` if the modal closed.
    pub fn dismiss_with_key(&mut self, keyval: Key) -> bool {
        is_dismiss_key(keyval) && self.modal.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state(threshold: usize) -> CarouselState {
        CarouselState::new(&CarouselConfig {
            duplicate_threshold: threshold,
            ..CarouselConfig::default()
        })
    }

    fn make_items(names: &[&str]) -> Vec<MediaItem> {
        names.iter().map(|n| MediaItem::new(*n)).collect()
    }

    #[test]
    fn test_select_open_and_dismiss_scenario() {
        let mut state = make_state(10);
        let items = make_items(&["a", "b", "c"]);
        assert!(state.set_items(Some(&items)));

        let urls: Vec<&str> = state.display_sequence().iter().map(MediaItem::url).collect();
        assert_eq!(urls, vec!["a", "b", "c", "a", "b", "c"]);

        assert!(state.select(4));
        assert_eq!(state.active_selection().map(MediaItem::url), Some("b"));

        assert!(!state.dismiss(ModalHit::Content));
        assert_eq!(state.active_selection().map(MediaItem::url), Some("b"));

        assert!(state.dismiss(ModalHit::Backdrop));
        assert!(state.active_selection().is_none());
    }

    #[test]
    fn test_key_activation_matches_click() {
        let mut clicked = make_state(10);
        let mut keyed = make_state(10);
        let items = make_items(&["a", "b"]);
        clicked.set_items(Some(&items));
        keyed.set_items(Some(&items));

        clicked.select(1);
        assert!(keyed.activate_with_key(1, Key::space));
        assert_eq!(clicked.active_selection(), keyed.active_selection());

        let mut enter = make_state(10);
        enter.set_items(Some(&items));
        assert!(enter.activate_with_key(1, Key::Return));
        assert_eq!(enter.active_selection().map(MediaItem::url), Some("b"));
    }

    #[test]
    fn test_other_keys_not_consumed() {
        let mut state = make_state(10);
        state.set_items(Some(&make_items(&["a"])));
        assert!(!state.activate_with_key(0, Key::Tab));
        assert!(state.active_selection().is_none());
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut state = make_state(10);
        state.set_items(Some(&make_items(&["a"])));
        assert!(!state.select(2));
        assert!(state.active_selection().is_none());
    }

    #[test]
    fn test_escape_closes_modal() {
        let mut state = make_state(10);
        state.set_items(Some(&make_items(&["a"])));
        state.select(0);
        assert!(!state.dismiss_with_key(Key::q));
        assert!(state.dismiss_with_key(Key::Escape));
        assert!(!state.dismiss_with_key(Key::Escape));
    }

    #[test]
    fn test_item_change_resets_flags() {
        let mut state = make_state(10);
        let items = make_items(&["a", "b"]);
        state.set_items(Some(&items));
        state.observe(&[IntersectionEntry::new(item_name(0), 1.0)]);
        assert_eq!(state.load_hint(0), LoadHint::Load);

        // Unchanged content keeps flags
        assert!(!state.set_items(Some(&make_items(&["a", "b"]))));
        assert_eq!(state.load_hint(0), LoadHint::Load);

        assert!(state.set_items(Some(&make_items(&["c"]))));
        assert_eq!(state.load_hint(0), LoadHint::Idle);
    }

    struct Strip {
        offset: f64,
    }

    impl ScrollSurface for Strip {
        fn offset(&self) -> f64 {
            self.offset
        }

        fn set_offset(&mut self, offset: f64) {
            self.offset = offset;
        }

        fn max_extent(&self) -> f64 {
            500.0
        }
    }

    #[test]
    fn test_scroller_snapshot_carries_hover() {
        let mut state = make_state(10);
        let mut strip = Strip { offset: 0.0 };

        state.scroller().tick(Some(&mut strip));
        assert_eq!(strip.offset, 0.5);

        state.set_hovered(true);
        assert_eq!(state.scroller().tick(Some(&mut strip)), TickOutcome::Held);
        assert_eq!(strip.offset, 0.5);

        state.set_hovered(false);
        state.scroller().tick(Some(&mut strip));
        assert_eq!(strip.offset, 1.0);
    }

    #[test]
    fn test_non_list_input_renders_nothing() {
        let mut state = make_state(10);
        state.set_items(None);
        assert!(state.display_sequence().is_empty());
        assert!(!state.select(0));
    }
}
