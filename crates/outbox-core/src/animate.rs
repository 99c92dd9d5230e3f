//! Counter animation math.
//!
//! The wasm layer drives a requestAnimationFrame loop; everything it needs
//! per frame (eased value, completion check, display text) is computed here.

/// Duration used when `data-duration` is absent or malformed.
pub const DEFAULT_COUNTER_DURATION_MS: f64 = 2000.0;

/// Ease-out quartic curve. Maps progress in `[0, 1]` to `[0, 1]`, front-loaded.
pub fn ease_out_quart(t: f64) -> f64 {
    let u = t - 1.0;
    1.0 - u * u * u * u
}

/// One counter element's animation parameters, parsed from its attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterSpec {
    /// Final value the displayed count settles on.
    pub target: i64,
    /// Total animation duration in milliseconds.
    pub duration_ms: f64,
}

impl CounterSpec {
    /// Builds a spec from raw `data-counter` / `data-duration` values.
    ///
    /// A target that does not parse as an integer means the element is
    /// skipped entirely. A missing or malformed duration falls back to
    /// [`DEFAULT_COUNTER_DURATION_MS`].
    pub fn from_attrs(target: Option<&str>, duration: Option<&str>) -> Option<Self> {
        let target = target?.trim().parse::<i64>().ok()?;
        let duration_ms = duration
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_COUNTER_DURATION_MS);
        Some(Self { target, duration_ms })
    }

    /// Value to display `elapsed_ms` into the run.
    pub fn sample(&self, elapsed_ms: f64) -> i64 {
        let progress = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        (self.target as f64 * ease_out_quart(progress)).floor() as i64
    }

    /// True once the final frame has been reached.
    pub fn finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

/// Formats a count with thousands separators: `1234567` becomes `"1,234,567"`.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_both_endpoints() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
    }

    #[test]
    fn easing_is_front_loaded() {
        // Half the time should cover well over half the distance.
        assert!(ease_out_quart(0.5) > 0.9);
        assert!(ease_out_quart(0.25) < ease_out_quart(0.75));
    }

    #[test]
    fn sample_starts_at_zero_and_ends_at_target() {
        let spec = CounterSpec {
            target: 100,
            duration_ms: 1000.0,
        };
        assert_eq!(spec.sample(0.0), 0);
        assert_eq!(spec.sample(1000.0), 100);
        assert_eq!(spec.sample(5000.0), 100);
        assert!(spec.finished(1000.0));
        assert!(!spec.finished(999.0));
    }

    #[test]
    fn from_attrs_defaults_duration() {
        let spec = CounterSpec::from_attrs(Some("250"), None).unwrap();
        assert_eq!(spec.target, 250);
        assert_eq!(spec.duration_ms, DEFAULT_COUNTER_DURATION_MS);

        let spec = CounterSpec::from_attrs(Some("250"), Some("not-a-number")).unwrap();
        assert_eq!(spec.duration_ms, DEFAULT_COUNTER_DURATION_MS);

        let spec = CounterSpec::from_attrs(Some("250"), Some("500")).unwrap();
        assert_eq!(spec.duration_ms, 500.0);
    }

    #[test]
    fn from_attrs_rejects_malformed_target() {
        assert_eq!(CounterSpec::from_attrs(None, None), None);
        assert_eq!(CounterSpec::from_attrs(Some("plenty"), None), None);
        assert_eq!(CounterSpec::from_attrs(Some(""), Some("500")), None);
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(100), "100");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-45678), "-45,678");
    }
}
