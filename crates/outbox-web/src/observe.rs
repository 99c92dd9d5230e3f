//! Viewport visibility watching.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::WebResult;

/// Options for a viewport watcher.
pub struct WatchOptions {
    /// Fraction of the element that must be visible before the callback fires.
    pub threshold: f64,
    /// CSS-style margin applied to the viewport for the visibility test.
    pub root_margin: Option<&'static str>,
}

/// An `IntersectionObserver` together with its retained callback closure.
pub struct Watcher {
    observer: IntersectionObserver,
    _closure: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Watcher {
    /// Builds a watcher whose callback receives typed entries plus the
    /// observer itself, for unobserve-on-trigger patterns.
    pub fn new<F>(options: Option<WatchOptions>, mut on_entries: F) -> WebResult<Self>
    where
        F: FnMut(Vec<IntersectionObserverEntry>, &IntersectionObserver) + 'static,
    {
        let closure = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let typed = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .collect();
                on_entries(typed, &observer);
            },
        );

        let observer = match options {
            Some(opts) => {
                let init = IntersectionObserverInit::new();
                init.set_threshold(&JsValue::from_f64(opts.threshold));
                if let Some(margin) = opts.root_margin {
                    init.set_root_margin(margin);
                }
                IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?
            }
            None => IntersectionObserver::new(closure.as_ref().unchecked_ref())?,
        };

        Ok(Self {
            observer,
            _closure: closure,
        })
    }

    pub fn observe(&self, el: &Element) {
        self.observer.observe(el);
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}
