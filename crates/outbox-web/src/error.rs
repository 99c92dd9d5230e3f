//! Unified error handling for the behavior layer.

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error type for DOM and network operations.
///
/// Nothing here is fatal to the page: callers log the error and the
/// affected feature degrades while the rest keeps working.
#[derive(Error, Debug)]
pub enum WebError {
    /// Browser context (window, document, head) not available.
    #[error("browser context unavailable: {0}")]
    Context(&'static str),

    /// Fragment fetch failed or returned a non-success status.
    #[error("failed to load {path}: {reason}")]
    Fetch { path: String, reason: String },

    /// Placeholder selector matched no element.
    #[error("target element not found: {0}")]
    MissingTarget(String),

    /// Event payload serialization error.
    #[error(transparent)]
    Serialization(#[from] outbox_core::events::EventCodecError),

    /// JavaScript interop error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),
}

impl From<JsValue> for WebError {
    fn from(js_val: JsValue) -> Self {
        let message = js_val
            .as_string()
            .unwrap_or_else(|| format!("{js_val:?}"));
        WebError::JavaScript(message)
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Result type for DOM operations.
pub type WebResult<T> = Result<T, WebError>;
