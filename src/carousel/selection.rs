//! Active selection and the modal viewer state.

use gdk4::Key;

use super::visibility::Rect;
use crate::models::MediaItem;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(MediaItem),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn active(&self) -> Option<&MediaItem> {
        match self {
            Self::Open(item) => Some(item),
            Self::Closed => None,
        }
    }

    /// Expand `item`. Replaces any item that is already open.
    pub fn activate(&mut self, item: MediaItem) {
        *self = Self::Open(item);
    }

    /// Handle a click on the modal layer. Returns `true` if the modal closed.
    pub fn dismiss_at(&mut self, hit: ModalHit) -> bool {
        match (hit, self.is_open()) {
            (ModalHit::Backdrop, true) => {
                *self = Self::Closed;
                true
            }
            _ => false,
        }
    }

    /// Close unconditionally. Returns `true` if something was open.
    pub fn close(&mut self) -> bool {
        std::mem::take(self).is_open()
    }
}

/// Where a click on the modal layer landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalHit {
    Backdrop,
    Content,
}

/// Classify a click at `(x, y)` against the content box. Without known
/// content bounds the click is treated as landing on content, so a modal
/// that has not been laid out yet cannot be dismissed by accident.
pub fn hit_test(x: f64, y: f64, content: Option<&Rect>) -> ModalHit {
    match content {
        Some(rect) if !rect.contains(x, y) => ModalHit::Backdrop,
        _ => ModalHit::Content,
    }
}

/// Whether a primary-button release on an item of size `bounds` completes a
/// click. Only the release of a single press that ends over the item counts.
pub fn is_click_release(n_press: i32, x: f64, y: f64, bounds: &Rect) -> bool {
    n_press == 1 && bounds.contains(x, y)
}

/// Keys that activate a focused carousel item.
pub fn is_activation_key(keyval: Key) -> bool {
    matches!(
        keyval,
        Key::Return | Key::KP_Enter | Key::ISO_Enter | Key::space | Key::KP_Space
    )
}

/// Keys that close an open modal.
pub fn is_dismiss_key(keyval: Key) -> bool {
    keyval == Key::Escape
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_backdrop_dismiss() {
        let mut modal = ModalState::default();
        assert!(!modal.is_open());

        modal.activate(MediaItem::new("b"));
        assert_eq!(modal.active().map(MediaItem::url), Some("b"));

        assert!(modal.dismiss_at(ModalHit::Backdrop));
        assert_eq!(modal, ModalState::Closed);
    }

    #[test]
    fn test_content_click_keeps_modal_open() {
        let mut modal = ModalState::Open(MediaItem::new("a"));
        assert!(!modal.dismiss_at(ModalHit::Content));
        assert!(modal.is_open());
    }

    #[test]
    fn test_dismiss_when_closed_is_noop() {
        let mut modal = ModalState::Closed;
        assert!(!modal.dismiss_at(ModalHit::Backdrop));
        assert!(!modal.close());
    }

    #[test]
    fn test_activate_replaces_open_item() {
        let mut modal = ModalState::Open(MediaItem::new("a"));
        modal.activate(MediaItem::new("c"));
        assert_eq!(modal.active().map(MediaItem::url), Some("c"));
    }

    #[test]
    fn test_hit_test() {
        let content = Rect::new(100.0, 50.0, 400.0, 300.0);
        assert_eq!(hit_test(10.0, 10.0, Some(&content)), ModalHit::Backdrop);
        assert_eq!(hit_test(120.0, 60.0, Some(&content)), ModalHit::Content);
        assert_eq!(hit_test(500.0, 60.0, Some(&content)), ModalHit::Backdrop);
        assert_eq!(hit_test(10.0, 10.0, None), ModalHit::Content);
    }

    #[test]
    fn test_activation_keys() {
        assert!(is_activation_key(Key::Return));
        assert!(is_activation_key(Key::KP_Enter));
        assert!(is_activation_key(Key::space));
        assert!(!is_activation_key(Key::Escape));
        assert!(!is_activation_key(Key::a));
        assert!(is_dismiss_key(Key::Escape));
    }

    #[test]
    fn test_click_completes_on_release_over_item() {
        let tile = Rect::new(0.0, 0.0, 320.0, 180.0);
        assert!(is_click_release(1, 10.0, 20.0, &tile));
        // Released after the pointer left the item
        assert!(!is_click_release(1, 400.0, 20.0, &tile));
        assert!(!is_click_release(1, -1.0, 20.0, &tile));
        // Second press of a double click does not re-open
        assert!(!is_click_release(2, 10.0, 20.0, &tile));
    }
}
