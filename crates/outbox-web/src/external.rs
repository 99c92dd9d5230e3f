//! Third-party script loading decisions.
//!
//! Fire-and-forget injections driven by what the current document
//! contains, deduplicated through the core script registry. Failed loads
//! are single-attempt; the page degrades visually and keeps working.

use std::cell::RefCell;

use web_sys::Document;

use outbox_core::consent::GatedScript;
use outbox_core::scripts::{is_loopback_host, ScriptId, ScriptRegistry};

use crate::dom;
use crate::env::PageEnv;
use crate::error::WebResult;
use crate::{console_log, console_warn};

thread_local! {
    static REGISTRY: RefCell<ScriptRegistry> = RefCell::new(ScriptRegistry::new());
}

/// Loads the always-on and page-dependent scripts.
pub fn init(doc: &Document, env: &PageEnv) -> WebResult<()> {
    load_fonts(doc)?;
    check_for_youtube_videos(doc)?;
    load_analytics(&env.hostname);
    Ok(())
}

fn load_fonts(doc: &Document) -> WebResult<()> {
    request(doc, ScriptId::GoogleFonts)?;
    // Local fallback so text renders if the CDN is unreachable.
    request(doc, ScriptId::LocalFonts)
}

/// Requests the YouTube iframe API when the page embeds or links YouTube
/// content, plus the local fallback copy.
fn check_for_youtube_videos(doc: &Document) -> WebResult<()> {
    let embeds = dom::count_matches(
        doc,
        "iframe[src*=\"youtube\"], iframe[data-src*=\"youtube\"]",
    );
    let links = dom::count_matches(doc, "a[href*=\"youtube.com/watch\"], a[href*=\"youtu.be/\"]");
    if embeds == 0 && links == 0 {
        return Ok(());
    }
    request(doc, ScriptId::YouTubeApi)?;
    request(doc, ScriptId::YouTubeApiFallback)
}

/// Analytics stays off on development hosts. The production injection is
/// an intentional placeholder, matching the deployed site.
fn load_analytics(hostname: &str) {
    if is_loopback_host(hostname) {
        console_log!("Analytics disabled for local development");
    }
}

/// Loads social SDKs for whichever widgets the page carries.
pub fn load_social_widgets(doc: &Document) -> WebResult<()> {
    if dom::count_matches(doc, ".facebook-widget") > 0 {
        request(doc, ScriptId::FacebookSdk)?;
    }
    if dom::count_matches(doc, ".twitter-widget") > 0 {
        request(doc, ScriptId::TwitterWidgets)?;
    }
    Ok(())
}

/// Loads reCAPTCHA only when a form on the page asks for it.
pub fn load_recaptcha(doc: &Document) -> WebResult<()> {
    if dom::count_matches(doc, ".g-recaptcha") > 0 {
        request(doc, ScriptId::Recaptcha)?;
    }
    Ok(())
}

/// Consent-gated dispatch. Anything but accepted consent logs the
/// requirement and loads nothing; nothing is queued for later.
pub fn load_with_consent(doc: &Document, env: &PageEnv, kind: &str) -> WebResult<()> {
    let script: GatedScript = match kind.parse() {
        Ok(script) => script,
        Err(err) => {
            console_warn!("{err}");
            return Ok(());
        }
    };

    if !env.consent.allows_gated_scripts() {
        console_log!("User consent required for: {script}");
        return Ok(());
    }

    match script {
        GatedScript::Analytics => {
            load_analytics(&env.hostname);
            Ok(())
        }
        GatedScript::Social => load_social_widgets(doc),
    }
}

/// Injects `id` unless the registry says a request already happened.
fn request(doc: &Document, id: ScriptId) -> WebResult<()> {
    let claimed = REGISTRY.with(|registry| registry.borrow_mut().begin(id));
    if !claimed {
        console_log!("Script already requested: {id}");
        return Ok(());
    }

    if id.is_stylesheet() {
        dom::load_css(doc, id.url())?;
        // Stylesheets apply as they arrive; no completion tracking needed.
        mark_loaded(id);
    } else {
        dom::load_script(
            doc,
            id.url(),
            id.injection(),
            Some(Box::new(move || {
                mark_loaded(id);
                console_log!("Script loaded: {id}");
            })),
        )?;
    }
    Ok(())
}

fn mark_loaded(id: ScriptId) {
    REGISTRY.with(|registry| registry.borrow_mut().mark_loaded(id));
}
