//! Sitewide behaviors: scroll state, lazy media, animations, notifications.
//!
//! Everything here is independent of page assembly; it binds against
//! whatever the document holds when `init` runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

use outbox_core::animate::{self, CounterSpec};
use outbox_core::debounce::{Debounce, RESIZE_DELAY_MS, SCROLL_DELAY_MS};
use outbox_core::links;
use outbox_core::scroll;

use crate::bind::Bindings;
use crate::dom;
use crate::env::PageEnv;
use crate::error::{WebError, WebResult};
use crate::observe::{WatchOptions, Watcher};
use crate::{console_log, console_warn};

/// Marker class added to `body` once the window `load` event fires.
const LOADED_CLASS: &str = "loaded";

/// Marker class telling the stylesheet to skip animations.
const REDUCE_MOTION_CLASS: &str = "reduce-motion";

/// Binds every sitewide behavior into `bindings`.
pub fn init(doc: &Document, env: &PageEnv, bindings: &mut Bindings) -> WebResult<()> {
    console_log!("Initializing Outbox app");

    bind_window_events(bindings)?;
    init_smooth_scrolling(doc, bindings)?;
    init_lazy_loading(doc, bindings)?;
    init_video_embeds(doc)?;
    tag_external_links(doc, &env.hostname)?;
    observe_form_submissions(doc, bindings)?;
    init_animations(doc, env, bindings)?;
    Ok(())
}

fn bind_window_events(bindings: &mut Bindings) -> WebResult<()> {
    let win = dom::window()?;

    bindings.listen(&win, "load", |_event| {
        if let Ok(doc) = dom::document() {
            if let Some(body) = doc.body() {
                let _ = body.class_list().add_1(LOADED_CLASS);
            }
        }
    })?;

    bind_debounced(bindings, &win, "resize", RESIZE_DELAY_MS, handle_resize)?;

    let scroll_win = win.clone();
    bind_debounced(bindings, &win, "scroll", SCROLL_DELAY_MS, move || {
        handle_scroll(&scroll_win);
    })?;

    Ok(())
}

/// Hook for responsive recalculation; nothing needs it yet.
fn handle_resize() {
    console_log!("Window resized");
}

fn handle_scroll(win: &Window) {
    let scroll_top = win.page_y_offset().unwrap_or(0.0);
    let Ok(doc) = dom::document() else { return };
    let Ok(Some(nav)) = doc.query_selector(".main-nav") else {
        return;
    };
    if scroll::nav_is_scrolled(scroll_top) {
        let _ = nav.class_list().add_1("scrolled");
    } else {
        let _ = nav.class_list().remove_1("scrolled");
    }
}

/// Debounced listener: each raw event restarts the quiet period, and
/// `action` runs once the period passes without another event.
///
/// The [`Debounce`] policy owns the deadline; the browser timer is just
/// the clock that wakes us up to ask it.
pub fn bind_debounced<F>(
    bindings: &mut Bindings,
    target: &EventTarget,
    event: &'static str,
    delay_ms: u64,
    mut action: F,
) -> WebResult<()>
where
    F: FnMut() + 'static,
{
    let win = dom::window()?;
    let debounce = Rc::new(RefCell::new(Debounce::new(delay_ms)));
    let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let fire_debounce = debounce.clone();
    let fire = Rc::new(Closure::<dyn FnMut()>::new(move || {
        if fire_debounce.borrow_mut().fire_due(js_sys::Date::now() as u64) {
            action();
        }
    }));

    bindings.listen(target, event, move |_event| {
        let delay = {
            let mut debounce = debounce.borrow_mut();
            debounce.trigger(js_sys::Date::now() as u64);
            debounce.delay_ms()
        };
        if let Some(handle) = pending.take() {
            win.clear_timeout_with_handle(handle);
        }
        if let Ok(handle) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            (*fire).as_ref().unchecked_ref(),
            delay as i32,
        ) {
            pending.set(Some(handle));
        }
    })
}

/// In-page anchors scroll smoothly to their target instead of jumping.
fn init_smooth_scrolling(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let mut bind_error = None;
    dom::for_each_element(doc, "a[href^=\"#\"]", |anchor| {
        let link = anchor.clone();
        let doc = doc.clone();
        if let Err(err) = bindings.listen(&anchor, "click", move |event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let Ok(Some(target)) = doc.query_selector(&href) else {
                return;
            };
            event.prevent_default();
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        }) {
            bind_error = Some(err);
        }
    })?;
    match bind_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Images carrying `data-src` get their real source once they scroll into
/// view, each resolved at most once.
fn init_lazy_loading(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let watcher = Watcher::new(None, |entries, observer| {
        for entry in entries {
            if !entry.is_intersecting() {
                continue;
            }
            let img = entry.target();
            if let Some(src) = img.get_attribute("data-src") {
                let _ = img.set_attribute("src", &src);
                let _ = img.remove_attribute("data-src");
                let _ = img.class_list().remove_1("lazy");
                observer.unobserve(&img);
            }
        }
    })?;
    dom::for_each_element(doc, "img[data-src]", |img| watcher.observe(&img))?;
    bindings.watch(watcher);
    Ok(())
}

/// Wraps known video embeds in a fluid-width container for responsive
/// sizing. Idempotent per iframe via the wrapper-class check.
fn init_video_embeds(doc: &Document) -> WebResult<()> {
    dom::for_each_element(
        doc,
        "iframe[src*=\"youtube\"], iframe[src*=\"vimeo\"]",
        |video| {
            let already_wrapped = video
                .parent_element()
                .map(|parent| parent.class_list().contains("fluid-width-video-wrapper"))
                .unwrap_or(false);
            if already_wrapped {
                return;
            }
            let Some(parent) = video.parent_node() else {
                return;
            };
            let Ok(wrapper) = doc.create_element("div") else {
                return;
            };
            wrapper.set_class_name("fluid-width-video-wrapper");
            if parent.insert_before(&wrapper, Some(&video)).is_ok() {
                let _ = wrapper.append_child(&video);
            }
        },
    )
}

/// Marks off-site links so they open in a new tab without a handle back to
/// the opening page.
pub fn tag_external_links(doc: &Document, hostname: &str) -> WebResult<()> {
    dom::for_each_element(doc, "a[href]", |link| {
        let Some(href) = link.get_attribute("href") else {
            return;
        };
        if links::is_external(&href, hostname) {
            let _ = link.set_attribute("target", "_blank");
            let _ = link.set_attribute("rel", links::EXTERNAL_REL);
            let _ = link.class_list().add_1(links::EXTERNAL_CLASS);
        }
    })
}

/// Observational only; submission handling lives elsewhere.
fn observe_form_submissions(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let mut bind_error = None;
    dom::for_each_element(doc, "form", |form| {
        let name = form
            .get_attribute("id")
            .or_else(|| form.get_attribute("name"))
            .unwrap_or_else(|| "(unnamed)".to_string());
        if let Err(err) = bindings.listen(&form, "submit", move |_event| {
            console_log!("Form submitted: {name}");
        }) {
            bind_error = Some(err);
        }
    })?;
    match bind_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Honors the reduced-motion preference: when set, mark the body and wire
/// no animation observers at all.
fn init_animations(doc: &Document, env: &PageEnv, bindings: &mut Bindings) -> WebResult<()> {
    if env.reduced_motion {
        if let Some(body) = doc.body() {
            let _ = body.class_list().add_1(REDUCE_MOTION_CLASS);
        }
        return Ok(());
    }
    init_fade_ins(doc, bindings)?;
    init_counters(doc, bindings)
}

/// `.fade-in` elements reveal once 10% visible, with a 50px bottom margin.
/// Trigger-once visually; elements stay observed and the repeat class add
/// is a no-op.
fn init_fade_ins(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let watcher = Watcher::new(
        Some(WatchOptions {
            threshold: 0.1,
            root_margin: Some("0px 0px -50px 0px"),
        }),
        |entries, _observer| {
            for entry in entries {
                if entry.is_intersecting() {
                    let _ = entry.target().class_list().add_1("fade-in-visible");
                }
            }
        },
    )?;
    dom::for_each_element(doc, ".fade-in", |el| watcher.observe(&el))?;
    bindings.watch(watcher);
    Ok(())
}

/// `[data-counter]` elements animate from zero when they first enter the
/// viewport, then stop being watched.
fn init_counters(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let watcher = Watcher::new(None, |entries, observer| {
        for entry in entries {
            if !entry.is_intersecting() {
                continue;
            }
            let el = entry.target();
            observer.unobserve(&el);
            let spec = CounterSpec::from_attrs(
                el.get_attribute("data-counter").as_deref(),
                el.get_attribute("data-duration").as_deref(),
            );
            match spec {
                Some(spec) => animate_counter(el, spec),
                None => console_warn!("Ignoring counter with malformed data-counter"),
            }
        }
    })?;
    dom::for_each_element(doc, "[data-counter]", |el| watcher.observe(&el))?;
    bindings.watch(watcher);
    Ok(())
}

/// Runs one requestAnimationFrame-driven counter to completion, then
/// releases its closure.
fn animate_counter(el: Element, spec: CounterSpec) {
    let Ok(win) = dom::window() else { return };

    let start: Rc<Cell<Option<f64>>> = Rc::new(Cell::new(None));
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

    let frame_handle = frame.clone();
    let raf_win = win.clone();
    *frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let started = match start.get() {
            Some(s) => s,
            None => {
                start.set(Some(timestamp));
                timestamp
            }
        };
        let elapsed = timestamp - started;
        let value = spec.sample(elapsed);
        el.set_text_content(Some(&animate::format_count(value)));

        if spec.finished(elapsed) {
            frame_handle.borrow_mut().take();
            return;
        }
        if let Some(callback) = frame_handle.borrow().as_ref() {
            let _ = raf_win.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        let _ = win.request_animation_frame(callback.as_ref().unchecked_ref());
    };
}

/// Shows a dismissible banner. `kind` feeds the `notification-{kind}`
/// class; the banner removes itself after `duration_ms` if still attached,
/// and immediately when its close button is clicked.
pub fn show_notification(message: &str, kind: &str, duration_ms: i32) -> WebResult<()> {
    let doc = dom::document()?;
    let win = dom::window()?;
    let body = doc.body().ok_or(WebError::Context("no document body"))?;

    let banner = doc.create_element("div")?;
    banner.set_class_name(&format!("notification notification-{kind}"));

    let text = doc.create_element("span")?;
    text.set_class_name("notification-message");
    text.set_text_content(Some(message));
    banner.append_child(&text)?;

    let close = doc.create_element("button")?;
    close.set_class_name("notification-close");
    close.set_text_content(Some("\u{d7}"));
    banner.append_child(&close)?;

    // Banners are transient and created on demand, outside any bind phase;
    // their closures ride along with the element.
    let dismiss_target = banner.clone();
    let on_close = Closure::<dyn FnMut(Event)>::new(move |_event| {
        dismiss_target.remove();
    });
    close.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
    on_close.forget();

    body.append_child(&banner)?;

    let expire_target = banner.clone();
    let expire = Closure::<dyn FnMut()>::new(move || {
        if expire_target.is_connected() {
            expire_target.remove();
        }
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        expire.as_ref().unchecked_ref(),
        duration_ms,
    )?;
    expire.forget();

    Ok(())
}
