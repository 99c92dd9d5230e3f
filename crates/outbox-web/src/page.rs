//! Page assembly: shared header and footer fragments plus their init hooks.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, ScrollBehavior, ScrollToOptions};

use outbox_core::scroll;

use crate::bind::Bindings;
use crate::components::{self, Fragment};
use crate::dom;
use crate::error::WebResult;
use crate::{console_error, console_log, console_warn};

const HEADER_PATH: &str = "components/header.html";
const HEADER_TARGET: &str = "#header-placeholder";
const FOOTER_PATH: &str = "components/footer.html";
const FOOTER_TARGET: &str = "#footer-placeholder";

thread_local! {
    static COMPOSED: Cell<bool> = const { Cell::new(false) };
    static PAGE_BINDINGS: RefCell<Bindings> = RefCell::new(Bindings::new());
}

/// Fetches the header and footer fragments concurrently and runs their
/// init hooks once each fragment's markup is in place.
///
/// Guarded: a second call is a logged no-op, so fragments are never
/// fetched twice and their listeners never bound twice.
pub async fn compose() -> WebResult<()> {
    if COMPOSED.with(|composed| composed.replace(true)) {
        console_warn!("Page composition already ran; ignoring repeat call");
        return Ok(());
    }

    let fragments = vec![
        Fragment::new(HEADER_PATH, HEADER_TARGET).with_callback(|doc| {
            PAGE_BINDINGS.with(|bindings| {
                if let Err(err) = init_navigation(doc, &mut bindings.borrow_mut()) {
                    console_error!("Navigation init failed: {err}");
                }
            });
        }),
        Fragment::new(FOOTER_PATH, FOOTER_TARGET).with_callback(|doc| {
            PAGE_BINDINGS.with(|bindings| {
                if let Err(err) = init_footer(doc, &mut bindings.borrow_mut()) {
                    console_error!("Footer init failed: {err}");
                }
            });
        }),
    ];

    components::load_components(fragments).await
}

/// Wires the mobile menu toggle. The primary pair and the legacy pair are
/// both optional and wired independently.
pub fn init_navigation(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    let toggle = doc.query_selector(".primary-nav__button-toggle")?;
    let nav = doc.query_selector(".header-nav")?;
    if let (Some(toggle), Some(nav)) = (toggle, nav) {
        let button = toggle.clone();
        bindings.listen(&toggle, "click", move |_event| {
            let expanded = is_expanded(&button);
            set_expanded(&button, !expanded);
            if expanded {
                let _ = nav.class_list().remove_1("active");
                set_display(&nav, "none");
            } else {
                let _ = nav.class_list().add_1("active");
                set_display(&nav, "block");
            }
        })?;
    }

    // Older pages still ship the previous nav markup.
    let toggle = doc.query_selector(".mobile-nav")?;
    let nav = doc.query_selector(".inner-nav")?;
    if let (Some(toggle), Some(nav)) = (toggle, nav) {
        let button = toggle.clone();
        bindings.listen(&toggle, "click", move |_event| {
            let expanded = is_expanded(&button);
            set_expanded(&button, !expanded);
            set_display(&nav, if expanded { "none" } else { "flex" });
        })?;
    }

    console_log!("Navigation initialized");
    Ok(())
}

/// Wires the back-to-top control and stamps the footer year. Both are
/// optional.
pub fn init_footer(doc: &Document, bindings: &mut Bindings) -> WebResult<()> {
    if let Some(back_to_top) = doc.query_selector(".link-to-top")? {
        bindings.listen(&back_to_top, "click", move |event: Event| {
            event.prevent_default();
            if let Ok(win) = dom::window() {
                let options = ScrollToOptions::new();
                options.set_top(0.0);
                options.set_behavior(ScrollBehavior::Smooth);
                win.scroll_to_with_scroll_to_options(&options);
            }
        })?;

        let win = dom::window()?;
        let scroll_win = win.clone();
        let control = back_to_top.clone();
        bindings.listen(&win, "scroll", move |_event| {
            let scroll_top = scroll_win.page_y_offset().unwrap_or(0.0);
            let visible = scroll::back_to_top_visible(scroll_top);
            if let Some(html) = control.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("opacity", if visible { "1" } else { "0" });
                let _ =
                    style.set_property("visibility", if visible { "visible" } else { "hidden" });
            }
        })?;
    }

    set_footer_year(doc);

    console_log!("Footer initialized");
    Ok(())
}

/// Writes the current year into `#current-year` if the footer carries one.
pub fn set_footer_year(doc: &Document) {
    if let Some(span) = doc.get_element_by_id("current-year") {
        let year = js_sys::Date::new_0().get_full_year();
        span.set_text_content(Some(&year.to_string()));
    }
}

fn is_expanded(el: &Element) -> bool {
    el.get_attribute("aria-expanded").as_deref() == Some("true")
}

fn set_expanded(el: &Element, expanded: bool) {
    let _ = el.set_attribute("aria-expanded", if expanded { "true" } else { "false" });
}

fn set_display(el: &Element, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}
