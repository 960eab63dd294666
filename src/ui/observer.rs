// Visibility observation for carousel items
// Measures each item against the scrolled viewport whenever the horizontal
// adjustment moves or its geometry changes, and reports threshold crossings.

use gtk4::prelude::*;
use gtk4::{glib, Adjustment, ScrolledWindow, Widget};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::carousel::{intersection_ratio, IntersectionEntry, Rect};

/// Callback receiving one batch of observations
pub type ObservationCallback = Rc<dyn Fn(Vec<IntersectionEntry>)>;

struct Subscription {
    adjustment: Adjustment,
    handlers: Vec<glib::SignalHandlerId>,
}

struct ObserverInner {
    root: glib::WeakRef<ScrolledWindow>,
    targets: RefCell<Vec<glib::WeakRef<Widget>>>,
    /// Last reported visibility per element name; only crossings are reported.
    reported: RefCell<HashMap<String, bool>>,
    threshold: f64,
    callback: RefCell<Option<ObservationCallback>>,
    generation: Cell<u64>,
}

/// Event subscription over a set of item widgets, with explicit attach/detach.
pub struct VisibilityObserver {
    inner: Rc<ObserverInner>,
    subscription: RefCell<Option<Subscription>>,
}

impl VisibilityObserver {
    pub fn new(root: &ScrolledWindow, threshold: f64) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                root: root.downgrade(),
                targets: RefCell::new(Vec::new()),
                reported: RefCell::new(HashMap::new()),
                threshold,
                callback: RefCell::new(None),
                generation: Cell::new(0),
            }),
            subscription: RefCell::new(None),
        }
    }

    /// Observe `targets`, replacing any previous subscription. The first batch
    /// covering every attached target is delivered from an idle callback once
    /// layout has run.
    pub fn attach<F>(&self, targets: &[Widget], callback: F)
    where
        F: Fn(Vec<IntersectionEntry>) + 'static,
    {
        self.detach();

        let Some(root) = self.inner.root.upgrade() else {
            tracing::debug!("Observer root gone; not attaching");
            return;
        };

        *self.inner.targets.borrow_mut() = targets.iter().map(|t| t.downgrade()).collect();
        *self.inner.callback.borrow_mut() = Some(Rc::new(callback));
        let generation = self.inner.generation.get().wrapping_add(1);
        self.inner.generation.set(generation);

        let adjustment = root.hadjustment();
        let mut handlers = Vec::with_capacity(2);

        let inner = Rc::downgrade(&self.inner);
        handlers.push(adjustment.connect_value_changed(move |_| {
            if let Some(inner) = inner.upgrade() {
                inner.measure();
            }
        }));

        // Emitted when upper/page-size change, e.g. after items are laid out
        let inner = Rc::downgrade(&self.inner);
        handlers.push(adjustment.connect_changed(move |_| {
            if let Some(inner) = inner.upgrade() {
                inner.measure();
            }
        }));

        let inner = Rc::downgrade(&self.inner);
        glib::idle_add_local_once(move || {
            if let Some(inner) = inner.upgrade() {
                if inner.generation.get() == generation && inner.callback.borrow().is_some() {
                    inner.measure();
                }
            }
        });

        tracing::debug!(targets = targets.len(), "Visibility observer attached");
        *self.subscription.borrow_mut() = Some(Subscription {
            adjustment,
            handlers,
        });
    }

    /// Release every watcher. Safe to call when not attached.
    pub fn detach(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            for handler in subscription.handlers {
                subscription.adjustment.disconnect(handler);
            }
            tracing::debug!("Visibility observer detached");
        }
        self.inner.targets.borrow_mut().clear();
        self.inner.reported.borrow_mut().clear();
        self.inner.callback.borrow_mut().take();
        self.inner
            .generation
            .set(self.inner.generation.get().wrapping_add(1));
    }
}

impl ObserverInner {
    fn measure(&self) {
        let Some(root) = self.root.upgrade() else {
            return;
        };
        let viewport = Rect::new(0.0, 0.0, root.width() as f64, root.height() as f64);
        if viewport.area() <= 0.0 {
            return;
        }

        let mut batch = Vec::new();
        {
            let targets = self.targets.borrow();
            let mut reported = self.reported.borrow_mut();

            for target in targets.iter() {
                let Some(widget) = target.upgrade() else {
                    continue;
                };
                // Not yet attached to the tree
                if widget.parent().is_none() || !widget.is_realized() {
                    continue;
                }
                let Some(bounds) = widget.compute_bounds(&root) else {
                    continue;
                };

                let item = Rect::new(
                    bounds.x() as f64,
                    bounds.y() as f64,
                    bounds.width() as f64,
                    bounds.height() as f64,
                );
                let ratio = intersection_ratio(&item, &viewport);
                let visible = ratio > 0.0 && ratio >= self.threshold;

                let name = widget.widget_name().to_string();
                if reported.get(&name) != Some(&visible) {
                    reported.insert(name.clone(), visible);
                    batch.push(IntersectionEntry::new(name, ratio));
                }
            }
        }

        if batch.is_empty() {
            return;
        }
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            callback(batch);
        }
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.detach();
    }
}
