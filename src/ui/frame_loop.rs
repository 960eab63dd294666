// Cancellable per-frame task driven by a widget's frame clock

use gtk4::prelude::*;
use gtk4::{glib, TickCallbackId, Widget};
use std::cell::RefCell;

/// A repeating frame-clock callback with an explicit start/stop lifecycle.
///
/// The callback runs once per frame while the host widget is mapped. It is
/// removed by `stop` and when the loop is dropped.
pub struct FrameLoop {
    host: glib::WeakRef<Widget>,
    tick_id: RefCell<Option<TickCallbackId>>,
}

impl FrameLoop {
    pub fn new(host: &impl IsA<Widget>) -> Self {
        Self {
            host: host.upcast_ref::<Widget>().downgrade(),
            tick_id: RefCell::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.tick_id.borrow().is_some()
    }

    /// Start ticking. Does nothing if already running or the host is gone.
    pub fn start<F>(&self, callback: F) -> bool
    where
        F: Fn() + 'static,
    {
        if self.is_running() {
            return false;
        }
        let Some(host) = self.host.upgrade() else {
            tracing::debug!("Frame loop host dropped before start");
            return false;
        };

        let id = host.add_tick_callback(move |_widget, _clock| {
            callback();
            glib::ControlFlow::Continue
        });
        *self.tick_id.borrow_mut() = Some(id);
        tracing::debug!("Frame loop started");
        true
    }

    pub fn stop(&self) {
        if let Some(id) = self.tick_id.borrow_mut().take() {
            id.remove();
            tracing::debug!("Frame loop stopped");
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
