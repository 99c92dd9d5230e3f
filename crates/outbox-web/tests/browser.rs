//! Browser tests for the DOM-touching paths.
//!
//! Run with `wasm-pack test --headless --chrome` (or firefox).

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CustomEvent, Document, Element, Event, HtmlElement};

use outbox_core::consent::Consent;
use outbox_core::events::{self, ComponentLoaded};
use outbox_web::bind::Bindings;
use outbox_web::components::{load_component, load_components, Fragment};
use outbox_web::env::PageEnv;
use outbox_web::error::WebError;
use outbox_web::{app, external, page};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Appends a container div with the given id and inner markup.
fn mount(id: &str, html: &str) -> Element {
    let doc = document();
    let container = doc.create_element("div").unwrap();
    container.set_id(id);
    container.set_inner_html(html);
    doc.body().unwrap().append_child(&container).unwrap();
    container
}

fn click(el: &Element) {
    el.dyn_ref::<HtmlElement>().unwrap().click();
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

struct EventCounter {
    count: Rc<Cell<u32>>,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventCounter {
    fn install(event: &'static str) -> Self {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event| {
            counter.set(counter.get() + 1);
        });
        document()
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .unwrap();
        Self {
            count,
            event,
            closure,
        }
    }

    fn get(&self) -> u32 {
        self.count.get()
    }

    fn remove(self) {
        let _ = document().remove_event_listener_with_callback(
            self.event,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

#[wasm_bindgen_test]
async fn load_component_injects_then_calls_back_then_fires_event() {
    let container = mount("frag-target-a", "");

    let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let detail: Rc<RefCell<Option<ComponentLoaded>>> = Rc::new(RefCell::new(None));

    let listener_order = order.clone();
    let listener_detail = detail.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        listener_order.borrow_mut().push("event");
        if let Some(custom) = event.dyn_ref::<CustomEvent>() {
            let json = js_sys::JSON::stringify(&custom.detail()).unwrap();
            *listener_detail.borrow_mut() =
                ComponentLoaded::from_json(&String::from(json)).ok();
        }
    });
    document()
        .add_event_listener_with_callback(events::COMPONENT_LOADED, listener.as_ref().unchecked_ref())
        .unwrap();

    let callback_order = order.clone();
    let fragment = Fragment::new("data:text/html,<p>hello</p>", "#frag-target-a")
        .with_callback(move |_doc| callback_order.borrow_mut().push("callback"));

    load_component(fragment).await.unwrap();

    assert_eq!(container.inner_html(), "<p>hello</p>");
    assert_eq!(*order.borrow(), vec!["callback", "event"]);
    assert_eq!(
        *detail.borrow(),
        Some(ComponentLoaded::new(
            "data:text/html,<p>hello</p>",
            "#frag-target-a"
        ))
    );

    document()
        .remove_event_listener_with_callback(
            events::COMPONENT_LOADED,
            listener.as_ref().unchecked_ref(),
        )
        .unwrap();
    container.remove();
}

#[wasm_bindgen_test]
async fn missing_target_means_no_injection_and_no_callback() {
    let called = Rc::new(Cell::new(false));
    let callback_called = called.clone();
    let fragment = Fragment::new("data:text/html,ignored", "#no-such-placeholder")
        .with_callback(move |_doc| callback_called.set(true));

    let result = load_component(fragment).await;

    assert!(matches!(result, Err(WebError::MissingTarget(_))));
    assert!(!called.get());
}

#[wasm_bindgen_test]
async fn failed_fetch_is_reported_and_leaves_target_untouched() {
    let container = mount("frag-target-b", "<em>fallback</em>");

    let fragment = Fragment::new("/no-such-fragment-404.html", "#frag-target-b");
    let result = load_component(fragment).await;

    assert!(matches!(result, Err(WebError::Fetch { .. })));
    assert_eq!(container.inner_html(), "<em>fallback</em>");
    container.remove();
}

#[wasm_bindgen_test]
async fn batch_fires_per_fragment_events_and_one_completion_event() {
    let first = mount("frag-batch-a", "");
    let second = mount("frag-batch-b", "");

    let loaded = EventCounter::install(events::COMPONENT_LOADED);
    let all_loaded = EventCounter::install(events::ALL_COMPONENTS_LOADED);

    load_components(vec![
        Fragment::new("data:text/html,one", "#frag-batch-a"),
        Fragment::new("data:text/html,two", "#frag-batch-b"),
    ])
    .await
    .unwrap();

    assert_eq!(first.inner_html(), "one");
    assert_eq!(second.inner_html(), "two");
    assert_eq!(loaded.get(), 2);
    assert_eq!(all_loaded.get(), 1);

    loaded.remove();
    all_loaded.remove();
    first.remove();
    second.remove();
}

#[wasm_bindgen_test]
async fn batch_with_a_failure_still_announces_completion_once() {
    let target = mount("frag-batch-c", "");

    let all_loaded = EventCounter::install(events::ALL_COMPONENTS_LOADED);

    load_components(vec![
        Fragment::new("data:text/html,ok", "#frag-batch-c"),
        Fragment::new("data:text/html,orphan", "#frag-batch-missing"),
    ])
    .await
    .unwrap();

    assert_eq!(target.inner_html(), "ok");
    assert_eq!(all_loaded.get(), 1);

    all_loaded.remove();
    target.remove();
}

#[wasm_bindgen_test]
fn external_links_are_hardened_and_local_links_untouched() {
    let container = mount(
        "links-container",
        "<a id=\"off-site\" href=\"https://other.example/page\">out</a>\
         <a id=\"same-host\" href=\"https://outbox.example/about\">about</a>\
         <a id=\"relative\" href=\"/contact\">contact</a>",
    );
    let doc = document();

    app::tag_external_links(&doc, "outbox.example").unwrap();

    let off_site = doc.get_element_by_id("off-site").unwrap();
    assert_eq!(off_site.get_attribute("target").as_deref(), Some("_blank"));
    let rel = off_site.get_attribute("rel").unwrap();
    assert!(rel.contains("noopener") && rel.contains("noreferrer"));
    assert!(off_site.class_list().contains("external-link"));

    let same_host = doc.get_element_by_id("same-host").unwrap();
    assert_eq!(same_host.get_attribute("target"), None);
    assert_eq!(same_host.get_attribute("rel"), None);

    let relative = doc.get_element_by_id("relative").unwrap();
    assert_eq!(relative.get_attribute("target"), None);

    container.remove();
}

#[wasm_bindgen_test]
fn footer_year_is_stamped() {
    let container = mount("year-container", "<span id=\"current-year\"></span>");
    let doc = document();

    page::set_footer_year(&doc);

    let span = doc.get_element_by_id("current-year").unwrap();
    let expected = js_sys::Date::new_0().get_full_year().to_string();
    assert_eq!(span.text_content().as_deref(), Some(expected.as_str()));

    container.remove();
}

#[wasm_bindgen_test]
fn navigation_toggle_flips_aria_state() {
    let container = mount(
        "nav-container",
        "<button class=\"primary-nav__button-toggle\" aria-expanded=\"false\">menu</button>\
         <nav class=\"header-nav\"></nav>",
    );
    let doc = document();

    let mut bindings = Bindings::new();
    page::init_navigation(&doc, &mut bindings).unwrap();

    let toggle = doc
        .query_selector(".primary-nav__button-toggle")
        .unwrap()
        .unwrap();
    let nav = doc.query_selector(".header-nav").unwrap().unwrap();

    click(&toggle);
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));
    assert!(nav.class_list().contains("active"));

    click(&toggle);
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));
    assert!(!nav.class_list().contains("active"));

    bindings.unbind();
    container.remove();
}

#[wasm_bindgen_test]
fn notification_close_removes_the_banner() {
    let doc = document();
    app::show_notification("saved", "success", 60_000).unwrap();

    let banner = doc.query_selector(".notification").unwrap().unwrap();
    assert!(banner.class_list().contains("notification-success"));

    let close = banner.query_selector(".notification-close").unwrap().unwrap();
    click(&close);

    assert!(doc.query_selector(".notification").unwrap().is_none());
}

#[wasm_bindgen_test]
async fn reduced_motion_skips_fade_ins_and_counters() {
    let container = mount(
        "motion-container",
        "<div class=\"fade-in\">reveal</div><span data-counter=\"500\">start</span>",
    );
    let doc = document();
    let env = PageEnv {
        hostname: "example.com".to_string(),
        reduced_motion: true,
        consent: Consent::NotGiven,
    };

    let mut bindings = Bindings::new();
    app::init(&doc, &env, &mut bindings).unwrap();

    let body = doc.body().unwrap();
    assert!(body.class_list().contains("reduce-motion"));

    // Intersection callbacks arrive asynchronously; give any a chance to run.
    sleep(100).await;

    let fade = doc.query_selector(".fade-in").unwrap().unwrap();
    assert!(!fade.class_list().contains("fade-in-visible"));
    let counter = doc.query_selector("[data-counter]").unwrap().unwrap();
    assert_eq!(counter.text_content().as_deref(), Some("start"));

    bindings.unbind();
    assert!(bindings.is_empty());
    let _ = body.class_list().remove_1("reduce-motion");
    container.remove();
}

#[wasm_bindgen_test]
async fn debounced_binding_fires_once_per_burst() {
    let container = mount("debounce-container", "");
    let hits = Rc::new(Cell::new(0u32));

    let mut bindings = Bindings::new();
    let counter = hits.clone();
    app::bind_debounced(&mut bindings, &container, "ping", 30, move || {
        counter.set(counter.get() + 1);
    })
    .unwrap();

    for _ in 0..3 {
        container.dispatch_event(&Event::new("ping").unwrap()).unwrap();
    }
    sleep(120).await;
    assert_eq!(hits.get(), 1);

    container.dispatch_event(&Event::new("ping").unwrap()).unwrap();
    sleep(120).await;
    assert_eq!(hits.get(), 2);

    bindings.unbind();
    container.remove();
}

#[wasm_bindgen_test]
fn withheld_consent_blocks_gated_script_loads() {
    let container = mount("consent-container", "<div class=\"facebook-widget\"></div>");
    let doc = document();
    let env = PageEnv {
        hostname: "example.com".to_string(),
        reduced_motion: false,
        consent: Consent::NotGiven,
    };

    let scripts_before = doc.query_selector_all("script").unwrap().length();
    external::load_with_consent(&doc, &env, "social").unwrap();
    external::load_with_consent(&doc, &env, "analytics").unwrap();
    external::load_with_consent(&doc, &env, "unknown-kind").unwrap();
    let scripts_after = doc.query_selector_all("script").unwrap().length();

    assert_eq!(scripts_before, scripts_after);
    container.remove();
}
