//! Small DOM utilities shared by the behavior modules.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use outbox_core::scripts::ScriptAttrs;

use crate::error::{WebError, WebResult};

pub fn window() -> WebResult<Window> {
    web_sys::window().ok_or(WebError::Context("no window"))
}

pub fn document() -> WebResult<Document> {
    window()?
        .document()
        .ok_or(WebError::Context("no document"))
}

/// Runs `f` for every element matching `selector`.
pub fn for_each_element<F>(doc: &Document, selector: &str, mut f: F) -> WebResult<()>
where
    F: FnMut(Element),
{
    let nodes = doc.query_selector_all(selector)?;
    for i in 0..nodes.length() {
        if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            f(el);
        }
    }
    Ok(())
}

/// Number of elements matching `selector`, zero on selector errors.
pub fn count_matches(doc: &Document, selector: &str) -> u32 {
    doc.query_selector_all(selector)
        .map(|list| list.length())
        .unwrap_or(0)
}

/// Appends a `<link rel="stylesheet">` for `href` to the document head.
pub fn load_css(doc: &Document, href: &str) -> WebResult<()> {
    let link = doc.create_element("link")?;
    link.set_attribute("rel", "stylesheet")?;
    link.set_attribute("type", "text/css")?;
    link.set_attribute("href", href)?;
    link.set_attribute("media", "all")?;
    head_append(doc, &link)
}

/// Appends an async `<script>` for `src`, carrying whatever extra
/// attributes `attrs` asks for, with an optional load callback. The
/// callback closure is handed to the browser for the page lifetime; script
/// loads happen a fixed number of times per page, so nothing accumulates.
pub fn load_script(
    doc: &Document,
    src: &str,
    attrs: ScriptAttrs,
    onload: Option<Box<dyn FnMut()>>,
) -> WebResult<()> {
    let script = doc.create_element("script")?;
    script.set_attribute("type", "text/javascript")?;
    script.set_attribute("src", src)?;
    script.set_attribute("async", "")?;
    if attrs.defer {
        script.set_attribute("defer", "")?;
    }
    if attrs.cross_origin_anonymous {
        script.set_attribute("crossorigin", "anonymous")?;
    }
    if let Some(charset) = attrs.charset {
        script.set_attribute("charset", charset)?;
    }
    if let Some(callback) = onload {
        let closure = Closure::wrap(callback);
        script.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if attrs.append_to_body {
        let body = doc.body().ok_or(WebError::Context("no document body"))?;
        body.append_child(&script)?;
        Ok(())
    } else {
        head_append(doc, &script)
    }
}

/// True when the element's bounding box sits entirely inside the viewport.
pub fn is_in_viewport(el: &Element) -> WebResult<bool> {
    let win = window()?;
    let rect = el.get_bounding_client_rect();
    let height = win.inner_height()?.as_f64().unwrap_or(0.0);
    let width = win.inner_width()?.as_f64().unwrap_or(0.0);
    Ok(rect.top() >= 0.0 && rect.left() >= 0.0 && rect.bottom() <= height && rect.right() <= width)
}

fn head_append(doc: &Document, el: &Element) -> WebResult<()> {
    let head = doc.head().ok_or(WebError::Context("no document head"))?;
    head.append_child(el)?;
    Ok(())
}
