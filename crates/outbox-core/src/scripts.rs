//! Third-party script registry and loading decisions.
//!
//! Replaces "is the SDK global already defined" checks with an explicit
//! load-state map, so duplicate injections cannot happen and tests need no
//! third-party globals.

use std::collections::HashMap;
use std::fmt;

/// Every third-party resource this layer may request, with its fixed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptId {
    GoogleFonts,
    LocalFonts,
    YouTubeApi,
    YouTubeApiFallback,
    FacebookSdk,
    TwitterWidgets,
    Recaptcha,
}

impl ScriptId {
    /// URL the resource is requested from. Local paths are fallbacks
    /// shipped with the site.
    pub fn url(self) -> &'static str {
        match self {
            ScriptId::GoogleFonts => {
                "https://fonts.googleapis.com/css2?family=DM+Sans:wght@400;500;700&display=swap"
            }
            ScriptId::LocalFonts => "assets/css/fonts.css",
            ScriptId::YouTubeApi => "https://www.youtube.com/iframe_api",
            ScriptId::YouTubeApiFallback => "assets/js/iframe-api.js",
            ScriptId::FacebookSdk => {
                "https://connect.facebook.net/en_US/sdk.js#xfbml=1&version=v18.0"
            }
            ScriptId::TwitterWidgets => "https://platform.twitter.com/widgets.js",
            ScriptId::Recaptcha => "https://www.google.com/recaptcha/api.js",
        }
    }

    /// True for stylesheet resources, false for scripts.
    pub fn is_stylesheet(self) -> bool {
        matches!(self, ScriptId::GoogleFonts | ScriptId::LocalFonts)
    }

    /// Injection details for the script element, matching what each vendor
    /// documents. Every script is also `async`.
    pub fn injection(self) -> ScriptAttrs {
        match self {
            ScriptId::FacebookSdk => ScriptAttrs {
                defer: true,
                cross_origin_anonymous: true,
                append_to_body: true,
                ..ScriptAttrs::default()
            },
            ScriptId::TwitterWidgets => ScriptAttrs {
                charset: Some("utf-8"),
                ..ScriptAttrs::default()
            },
            ScriptId::Recaptcha => ScriptAttrs {
                defer: true,
                ..ScriptAttrs::default()
            },
            _ => ScriptAttrs::default(),
        }
    }
}

/// Extra attributes for an injected script element. The default is a plain
/// async script appended to the document head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptAttrs {
    pub defer: bool,
    pub cross_origin_anonymous: bool,
    pub charset: Option<&'static str>,
    pub append_to_body: bool,
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ScriptId::GoogleFonts => "google-fonts",
                ScriptId::LocalFonts => "local-fonts",
                ScriptId::YouTubeApi => "youtube-api",
                ScriptId::YouTubeApiFallback => "youtube-api-fallback",
                ScriptId::FacebookSdk => "facebook-sdk",
                ScriptId::TwitterWidgets => "twitter-widgets",
                ScriptId::Recaptcha => "recaptcha",
            }
        )
    }
}

/// Lifecycle of one registered resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Tracks which third-party resources have been requested.
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    states: HashMap<ScriptId, LoadState>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: ScriptId) -> LoadState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    /// Claims the right to inject `id`. Returns false when a request is
    /// already in flight or finished, in which case the caller must not
    /// inject again.
    pub fn begin(&mut self, id: ScriptId) -> bool {
        match self.state(id) {
            LoadState::Unloaded => {
                self.states.insert(id, LoadState::Loading);
                true
            }
            LoadState::Loading | LoadState::Loaded => false,
        }
    }

    pub fn mark_loaded(&mut self, id: ScriptId) {
        self.states.insert(id, LoadState::Loaded);
    }
}

/// Development hosts where analytics stays off.
pub fn is_loopback_host(hostname: &str) -> bool {
    hostname == "localhost" || hostname == "127.0.0.1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_claims_exactly_once() {
        let mut registry = ScriptRegistry::new();
        assert_eq!(registry.state(ScriptId::YouTubeApi), LoadState::Unloaded);
        assert!(registry.begin(ScriptId::YouTubeApi));
        assert_eq!(registry.state(ScriptId::YouTubeApi), LoadState::Loading);
        assert!(!registry.begin(ScriptId::YouTubeApi));

        registry.mark_loaded(ScriptId::YouTubeApi);
        assert_eq!(registry.state(ScriptId::YouTubeApi), LoadState::Loaded);
        assert!(!registry.begin(ScriptId::YouTubeApi));
    }

    #[test]
    fn ids_are_tracked_independently() {
        let mut registry = ScriptRegistry::new();
        assert!(registry.begin(ScriptId::FacebookSdk));
        assert!(registry.begin(ScriptId::TwitterWidgets));
        assert_eq!(registry.state(ScriptId::Recaptcha), LoadState::Unloaded);
    }

    #[test]
    fn loopback_hosts_are_recognized() {
        assert!(is_loopback_host("localhost"));
        assert!(is_loopback_host("127.0.0.1"));
        assert!(!is_loopback_host("example.com"));
        assert!(!is_loopback_host("localhost.example.com"));
    }

    #[test]
    fn injection_attributes_follow_the_vendor_snippets() {
        let facebook = ScriptId::FacebookSdk.injection();
        assert!(facebook.defer);
        assert!(facebook.cross_origin_anonymous);
        assert!(facebook.append_to_body);
        assert_eq!(facebook.charset, None);

        let twitter = ScriptId::TwitterWidgets.injection();
        assert_eq!(twitter.charset, Some("utf-8"));
        assert!(!twitter.defer);
        assert!(!twitter.append_to_body);

        let recaptcha = ScriptId::Recaptcha.injection();
        assert!(recaptcha.defer);
        assert!(!recaptcha.cross_origin_anonymous);

        assert_eq!(ScriptId::YouTubeApi.injection(), ScriptAttrs::default());
    }

    #[test]
    fn stylesheets_and_scripts_are_distinguished() {
        assert!(ScriptId::GoogleFonts.is_stylesheet());
        assert!(ScriptId::LocalFonts.is_stylesheet());
        assert!(!ScriptId::YouTubeApi.is_stylesheet());
        assert!(!ScriptId::Recaptcha.is_stylesheet());
    }
}
