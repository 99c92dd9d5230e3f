//! Retained event bindings.
//!
//! Listeners and observers are registered through [`Bindings`] so their
//! closures stay alive for the page lifetime and can all be detached
//! again, instead of being leaked one by one with `Closure::forget`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use crate::error::WebResult;
use crate::observe::Watcher;

struct EventBinding {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Owner of everything an init phase attaches to the page.
///
/// Must be kept alive as long as the listeners should fire; the callers
/// store one per init phase in page-lifetime state.
#[derive(Default)]
pub struct Bindings {
    listeners: Vec<EventBinding>,
    watchers: Vec<Watcher>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `handler` for `event` on `target` and retains the closure.
    pub fn listen<F>(&mut self, target: &EventTarget, event: &'static str, handler: F) -> WebResult<()>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push(EventBinding {
            target: target.clone(),
            event,
            closure,
        });
        Ok(())
    }

    /// Keeps a viewport watcher alive alongside the listeners.
    pub fn watch(&mut self, watcher: Watcher) {
        self.watchers.push(watcher);
    }

    /// Detaches every listener and disconnects every watcher.
    pub fn unbind(&mut self) {
        for binding in self.listeners.drain(..) {
            let _ = binding.target.remove_event_listener_with_callback(
                binding.event,
                binding.closure.as_ref().unchecked_ref(),
            );
        }
        for watcher in self.watchers.drain(..) {
            watcher.disconnect();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.watchers.is_empty()
    }
}
