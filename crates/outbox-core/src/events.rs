//! In-page pub/sub event names and payloads.
//!
//! Page assembly announces progress through DOM custom events so page
//! scripts outside this layer can react without polling.

use serde::{Deserialize, Serialize};

/// Dispatched on `document` after each fragment lands in its placeholder.
pub const COMPONENT_LOADED: &str = "componentLoaded";

/// Dispatched on `document` once the whole fragment batch has settled.
pub const ALL_COMPONENTS_LOADED: &str = "allComponentsLoaded";

/// Detail payload carried by a [`COMPONENT_LOADED`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLoaded {
    /// Path the fragment was fetched from.
    pub component: String,
    /// Selector of the placeholder that received it.
    pub target: String,
}

impl ComponentLoaded {
    pub fn new(component: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            target: target.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, EventCodecError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, EventCodecError> {
        Ok(serde_json::from_str(data)?)
    }
}

/// Event payload failed to encode or decode.
#[derive(Debug, thiserror::Error)]
#[error("event payload codec error: {0}")]
pub struct EventCodecError(#[from] serde_json::Error);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips() {
        let payload = ComponentLoaded::new("components/header.html", "#header-placeholder");
        let json = payload.to_json().unwrap();
        let back = ComponentLoaded::from_json(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn payload_uses_the_wire_field_names() {
        let payload = ComponentLoaded::new("a.html", "#b");
        let json = payload.to_json().unwrap();
        assert!(json.contains("\"component\""));
        assert!(json.contains("\"target\""));
    }
}
