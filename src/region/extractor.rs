//! One-shot scan of the coverage mask after a completed stroke.

use super::PendingRegion;
use crate::geometry::BufferPoint;
use crate::surface::{coverage_units, Surface};

/// Collects every coordinate whose accumulated coverage reaches
/// `threshold_fraction` of saturation. A full O(width × height) scan, run
/// once per completed stroke rather than per frame.
pub fn extract(surface: &Surface, threshold_fraction: f32) -> PendingRegion {
    let threshold = coverage_units(threshold_fraction).max(1);
    let mut pixels = Vec::new();

    for y in 0..surface.height() {
        for x in 0..surface.width() {
            if surface.coverage(x, y).unwrap_or(0) >= threshold {
                pixels.push(BufferPoint::new(x, y));
            }
        }
    }

    tracing::debug!(pixels = pixels.len(), threshold, "mask scan complete");
    PendingRegion { pixels }
}
