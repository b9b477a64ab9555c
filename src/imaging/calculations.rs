//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside a `max_edge` x `max_edge` box.
///
/// Aspect ratio is preserved and images are never upscaled: a source that
/// already fits is returned unchanged. Neither edge drops below 1px.
///
/// ```
/// # use sitekit::imaging::fit_within;
/// assert_eq!(fit_within((4000, 3000), 1200), (1200, 900));
/// assert_eq!(fit_within((3000, 4000), 200), (150, 200));
/// assert_eq!(fit_within((640, 480), 1200), (640, 480));
/// ```
pub fn fit_within(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w <= max_edge && src_h <= max_edge {
        return source;
    }

    let scale = max_edge as f64 / src_w.max(src_h) as f64;
    let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).max(1);

    if src_w >= src_h {
        (max_edge, scaled(src_h))
    } else {
        (scaled(src_w), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_scales_width_to_box() {
        assert_eq!(fit_within((4000, 3000), 1200), (1200, 900));
    }

    #[test]
    fn portrait_scales_height_to_box() {
        assert_eq!(fit_within((3000, 4000), 200), (150, 200));
    }

    #[test]
    fn square_fills_box() {
        assert_eq!(fit_within((1000, 1000), 200), (200, 200));
    }

    #[test]
    fn smaller_source_is_not_upscaled() {
        assert_eq!(fit_within((150, 100), 200), (150, 100));
    }

    #[test]
    fn exact_fit_unchanged() {
        assert_eq!(fit_within((1200, 800), 1200), (1200, 800));
    }

    #[test]
    fn one_edge_over_limit() {
        // 1300x500 → 1200 x 461.5 → 462
        assert_eq!(fit_within((1300, 500), 1200), (1200, 462));
    }

    #[test]
    fn extreme_panorama_keeps_one_pixel() {
        assert_eq!(fit_within((10000, 10), 200), (200, 1));
    }
}
