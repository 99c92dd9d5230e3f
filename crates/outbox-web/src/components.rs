//! Fragment loading and page assembly events.
//!
//! A fragment is a standalone HTML snippet fetched by path and injected
//! verbatim into a placeholder element. Loads are single-attempt; a failed
//! fragment is logged and the page keeps whatever static fallback markup
//! the placeholder held.

use futures::future::join_all;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CustomEvent, CustomEventInit, Document, Response};

use outbox_core::events::{self, ComponentLoaded};

use crate::dom;
use crate::error::{WebError, WebResult};
use crate::{console_error, console_log};

/// One fragment to fetch and inject, with an optional post-injection hook.
pub struct Fragment {
    pub path: &'static str,
    pub target: &'static str,
    pub callback: Option<Box<dyn FnOnce(&Document)>>,
}

impl Fragment {
    pub fn new(path: &'static str, target: &'static str) -> Self {
        Self {
            path,
            target,
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnOnce(&Document) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

/// Fetches the fragment and replaces the contents of the first element
/// matching its target selector.
///
/// The callback runs strictly after injection; the `componentLoaded` event
/// fires after the callback. On any failure nothing is injected and the
/// callback never runs.
pub async fn load_component(fragment: Fragment) -> WebResult<()> {
    let doc = dom::document()?;
    let Fragment {
        path,
        target,
        callback,
    } = fragment;

    let html = fetch_text(path).await?;

    let element = doc
        .query_selector(target)?
        .ok_or_else(|| WebError::MissingTarget(target.to_string()))?;

    element.set_inner_html(&html);

    if let Some(callback) = callback {
        callback(&doc);
    }

    dispatch_component_loaded(&doc, path, target)?;
    console_log!("Component loaded: {path}");
    Ok(())
}

/// Loads every fragment concurrently, then announces completion.
///
/// Individual failures are logged and do not stop the rest of the batch;
/// `allComponentsLoaded` fires exactly once after all loads have settled,
/// whatever their outcomes.
pub async fn load_components(fragments: Vec<Fragment>) -> WebResult<()> {
    let results = join_all(fragments.into_iter().map(load_component)).await;

    let mut failures = 0;
    for err in results.into_iter().filter_map(Result::err) {
        console_error!("Error loading component: {err}");
        failures += 1;
    }
    if failures == 0 {
        console_log!("All components loaded successfully");
    }

    let doc = dom::document()?;
    let event = CustomEvent::new(events::ALL_COMPONENTS_LOADED)?;
    doc.dispatch_event(&event)?;
    Ok(())
}

async fn fetch_text(path: &str) -> WebResult<String> {
    let win = dom::window()?;

    let response = JsFuture::from(win.fetch_with_str(path))
        .await
        .map_err(|err| WebError::Fetch {
            path: path.to_string(),
            reason: format!("{err:?}"),
        })?;
    let response: Response = response.dyn_into().map_err(|_| WebError::Fetch {
        path: path.to_string(),
        reason: "fetch did not yield a Response".to_string(),
    })?;

    if !response.ok() {
        return Err(WebError::Fetch {
            path: path.to_string(),
            reason: format!("status {}", response.status()),
        });
    }

    let text = JsFuture::from(response.text()?).await?;
    text.as_string().ok_or_else(|| WebError::Fetch {
        path: path.to_string(),
        reason: "response body is not text".to_string(),
    })
}

fn dispatch_component_loaded(doc: &Document, path: &str, target: &str) -> WebResult<()> {
    let payload = ComponentLoaded::new(path, target);
    let detail = js_sys::JSON::parse(&payload.to_json()?)?;

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(events::COMPONENT_LOADED, &init)?;
    doc.dispatch_event(&event)?;
    Ok(())
}
