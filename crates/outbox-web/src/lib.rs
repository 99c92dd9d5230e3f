//! Browser behavior layer for the Outbox site.
//!
//! Compiled to WebAssembly and loaded on every page. On startup it wires
//! the sitewide behaviors, assembles the shared header/footer fragments,
//! and decides which third-party scripts the page needs. A handful of
//! entry points are exported for page scripts (notifications, on-demand
//! widget loading, consent-gated loading).

/// Sitewide behaviors: scroll state, lazy media, animations, notifications
pub mod app;

/// Retained event bindings with explicit teardown
pub mod bind;

/// Fragment loading and page assembly events
pub mod components;

/// Small DOM utilities
pub mod dom;

/// Page environment captured once at startup
pub mod env;

/// Unified error handling
pub mod error;

/// Third-party script loading decisions
pub mod external;

/// Console logging macros
pub mod logging;

/// Viewport visibility watching
pub mod observe;

/// Page assembly driver and fragment init hooks
pub mod page;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use bind::Bindings;
use env::PageEnv;
use error::WebResult;

thread_local! {
    static APP_BINDINGS: RefCell<Bindings> = RefCell::new(Bindings::new());
}

/// Module entry point. Runs immediately if the DOM is already parsed,
/// otherwise waits for `DOMContentLoaded`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let doc = dom::document()?;
    if doc.ready_state() == "loading" {
        let ready = Closure::<dyn FnMut()>::new(|| {
            if let Err(err) = run() {
                console_error!("Startup failed: {err}");
            }
        });
        doc.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())?;
        ready.forget();
    } else {
        run()?;
    }
    Ok(())
}

/// Binds behaviors, kicks off page composition, and requests external
/// scripts. Composition runs in the background; its completion is
/// announced through the `allComponentsLoaded` event.
fn run() -> WebResult<()> {
    let doc = dom::document()?;
    let env = PageEnv::capture()?;

    APP_BINDINGS.with(|bindings| app::init(&doc, &env, &mut bindings.borrow_mut()))?;
    external::init(&doc, &env)?;

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = page::compose().await {
            console_error!("Page composition failed: {err}");
        }
    });
    Ok(())
}

/// Shows a dismissible notification banner. Defaults: kind `info`,
/// auto-dismiss after five seconds.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(
    message: &str,
    kind: Option<String>,
    duration_ms: Option<i32>,
) -> Result<(), JsValue> {
    app::show_notification(
        message,
        kind.as_deref().unwrap_or("info"),
        duration_ms.unwrap_or(5000),
    )
    .map_err(Into::into)
}

/// Loads social SDKs for the widgets present on the page.
#[wasm_bindgen(js_name = loadSocialWidgets)]
pub fn load_social_widgets() -> Result<(), JsValue> {
    let doc = dom::document()?;
    external::load_social_widgets(&doc).map_err(Into::into)
}

/// Loads reCAPTCHA when the page carries a reCAPTCHA form.
#[wasm_bindgen(js_name = loadRecaptcha)]
pub fn load_recaptcha() -> Result<(), JsValue> {
    let doc = dom::document()?;
    external::load_recaptcha(&doc).map_err(Into::into)
}

/// Consent-gated script loading for page scripts; `kind` is `analytics`
/// or `social`.
#[wasm_bindgen(js_name = loadWithConsent)]
pub fn load_with_consent(kind: &str) -> Result<(), JsValue> {
    let doc = dom::document()?;
    let env = PageEnv::capture()?;
    external::load_with_consent(&doc, &env, kind).map_err(Into::into)
}

/// True when the element's bounding box is entirely inside the viewport.
#[wasm_bindgen(js_name = isInViewport)]
pub fn is_in_viewport(element: &web_sys::Element) -> Result<bool, JsValue> {
    dom::is_in_viewport(element).map_err(Into::into)
}
