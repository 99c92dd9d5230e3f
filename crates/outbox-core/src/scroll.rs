//! Scroll-position thresholds.

/// Offset past which the main nav picks up its `scrolled` class.
pub const NAV_SCROLLED_THRESHOLD_PX: f64 = 100.0;

/// Offset past which the back-to-top control becomes visible.
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 300.0;

pub fn nav_is_scrolled(scroll_top: f64) -> bool {
    scroll_top > NAV_SCROLLED_THRESHOLD_PX
}

pub fn back_to_top_visible(scroll_top: f64) -> bool {
    scroll_top > BACK_TO_TOP_THRESHOLD_PX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert!(!nav_is_scrolled(100.0));
        assert!(nav_is_scrolled(100.5));
        assert!(!back_to_top_visible(300.0));
        assert!(back_to_top_visible(301.0));
    }

    #[test]
    fn top_of_page_shows_nothing() {
        assert!(!nav_is_scrolled(0.0));
        assert!(!back_to_top_visible(0.0));
    }
}
