//! Viewport visibility tracking for lazy media loading.
//!
//! The widget layer measures each item against the scrolled viewport and
//! feeds batches of `IntersectionEntry` into a `VisibilityTracker`, which owns
//! the per-index load flags.

use std::collections::BTreeMap;

/// Widget name prefix carrying the display index of a carousel item.
pub const ITEM_NAME_PREFIX: &str = "carousel-item-";

/// How load flags react to an item leaving the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPolicy {
    /// Once visible, always loaded. Media is fetched once and never torn down.
    #[default]
    Sticky,
    /// The flag mirrors current visibility; off-screen media is suspended.
    Live,
}

/// How the renderer should treat an item's media given its flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadHint {
    /// Nothing attached yet; no preloading.
    Idle,
    /// Attach the stream and let it autoplay.
    Load,
    /// Keep the stream but pause it.
    Suspend,
}

impl LoadHint {
    pub fn for_flag(policy: VisibilityPolicy, flag: bool) -> Self {
        match (policy, flag) {
            (_, true) => Self::Load,
            (VisibilityPolicy::Sticky, false) => Self::Idle,
            (VisibilityPolicy::Live, false) => Self::Suspend,
        }
    }
}

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

/// Fraction of `item` that lies inside `viewport`, in `0.0..=1.0`.
pub fn intersection_ratio(item: &Rect, viewport: &Rect) -> f64 {
    let area = item.area();
    if area <= 0.0 {
        return 0.0;
    }
    item.intersection(viewport)
        .map(|overlap| (overlap.area() / area).min(1.0))
        .unwrap_or(0.0)
}

/// Widget name for the item at `index`.
pub fn item_name(index: usize) -> String {
    format!("{ITEM_NAME_PREFIX}{index}")
}

/// Recover the display index from an item's widget name.
pub fn parse_item_index(name: &str) -> Option<usize> {
    name.strip_prefix(ITEM_NAME_PREFIX)?.parse().ok()
}

/// One observation for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    /// Identity of the observed element; the display index is parsed from it.
    pub target: String,
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: impl Into<String>, ratio: f64) -> Self {
        Self {
            target: target.into(),
            ratio,
        }
    }
}

#[derive(Debug)]
pub struct VisibilityTracker {
    policy: VisibilityPolicy,
    threshold: f64,
    flags: BTreeMap<usize, bool>,
}

impl VisibilityTracker {
    pub fn new(policy: VisibilityPolicy, threshold: f64) -> Self {
        Self {
            policy,
            threshold,
            flags: BTreeMap::new(),
        }
    }

    /// Whether a ratio counts as visible.
    pub fn is_visible(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    pub fn flag(&self, index: usize) -> bool {
        self.flags.get(&index).copied().unwrap_or(false)
    }

    pub fn hint(&self, index: usize) -> LoadHint {
        LoadHint::for_flag(self.policy, self.flag(index))
    }

    /// Apply one observation batch. Returns the indices whose flag changed.
    pub fn apply<'a, I>(&mut self, entries: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a IntersectionEntry>,
    {
        let mut changed = Vec::new();

        for entry in entries {
            let Some(index) = parse_item_index(&entry.target) else {
                tracing::debug!(element = %entry.target, "Ignoring entry without item index");
                continue;
            };

            let visible = self.is_visible(entry.ratio);
            let previous = self.flag(index);
            let next = match self.policy {
                VisibilityPolicy::Sticky => previous || visible,
                VisibilityPolicy::Live => visible,
            };

            if next != previous {
                self.flags.insert(index, next);
                if !changed.contains(&index) {
                    changed.push(index);
                }
            }
        }

        if !changed.is_empty() {
            tracing::trace!(?changed, policy = ?self.policy, "Visibility flags updated");
        }
        changed
    }

    /// Forget all flags, as on remount.
    pub fn reset(&mut self) {
        self.flags.clear();
    }
}
