//! Page environment captured once at startup.
//!
//! Hostname, reduced-motion preference, and the stored consent flag are
//! read here and threaded through as plain values, so the behaviors never
//! re-query hidden browser state and stay testable.

use web_sys::Window;

use outbox_core::consent::{Consent, CONSENT_STORAGE_KEY};

use crate::dom;
use crate::error::WebResult;

/// Inputs the behavior layer needs from the surrounding page.
#[derive(Debug, Clone)]
pub struct PageEnv {
    pub hostname: String,
    pub reduced_motion: bool,
    pub consent: Consent,
}

impl PageEnv {
    /// Reads the environment from the live page.
    pub fn capture() -> WebResult<Self> {
        let win = dom::window()?;
        let hostname = win.location().hostname().unwrap_or_default();
        let reduced_motion = win
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false);
        let consent = read_consent(&win);
        Ok(Self {
            hostname,
            reduced_motion,
            consent,
        })
    }
}

fn read_consent(win: &Window) -> Consent {
    let stored = win
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(CONSENT_STORAGE_KEY).ok().flatten());
    Consent::from_stored(stored.as_deref())
}
