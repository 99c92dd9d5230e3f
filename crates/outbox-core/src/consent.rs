//! Cookie-consent gating for privacy-sensitive scripts.
//!
//! The consent banner (outside this layer) writes a single value to local
//! storage; this module owns the interpretation of that value.

use std::fmt;
use std::str::FromStr;

/// Local storage key written by the consent banner.
pub const CONSENT_STORAGE_KEY: &str = "cookie-consent";

const ACCEPTED_VALUE: &str = "accepted";

/// Interpretation of the stored consent flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    /// The stored value is exactly `"accepted"`.
    Accepted,
    /// Absent, rejected, or any unrecognized stored value.
    NotGiven,
}

impl Consent {
    /// Parses the raw stored value. Anything but the exact accepted marker
    /// is treated as consent not given.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some(ACCEPTED_VALUE) => Consent::Accepted,
            _ => Consent::NotGiven,
        }
    }

    /// True when gated scripts may load.
    pub fn allows_gated_scripts(self) -> bool {
        self == Consent::Accepted
    }
}

/// Script groups that sit behind the consent flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedScript {
    Analytics,
    Social,
}

impl fmt::Display for GatedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GatedScript::Analytics => "analytics",
                GatedScript::Social => "social",
            }
        )
    }
}

/// Requested script kind did not match any gated group.
#[derive(Debug, thiserror::Error)]
#[error("unknown script type: {0}")]
pub struct UnknownScriptKind(pub String);

impl FromStr for GatedScript {
    type Err = UnknownScriptKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analytics" => Ok(GatedScript::Analytics),
            "social" => Ok(GatedScript::Social),
            other => Err(UnknownScriptKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_accepted_value_counts() {
        assert_eq!(Consent::from_stored(Some("accepted")), Consent::Accepted);
        assert_eq!(Consent::from_stored(Some("Accepted")), Consent::NotGiven);
        assert_eq!(Consent::from_stored(Some("rejected")), Consent::NotGiven);
        assert_eq!(Consent::from_stored(Some("")), Consent::NotGiven);
        assert_eq!(Consent::from_stored(None), Consent::NotGiven);
    }

    #[test]
    fn gating_follows_consent() {
        assert!(Consent::Accepted.allows_gated_scripts());
        assert!(!Consent::NotGiven.allows_gated_scripts());
    }

    #[test]
    fn gated_script_parses_known_kinds() {
        assert_eq!("analytics".parse::<GatedScript>().ok(), Some(GatedScript::Analytics));
        assert_eq!("social".parse::<GatedScript>().ok(), Some(GatedScript::Social));
        assert!("ads".parse::<GatedScript>().is_err());
    }
}
