//! Pixel stamping for stroke segments and pen fills.

use imageproc::drawing::BresenhamLineIter;

use crate::geometry::CanvasPoint;
use crate::surface::Surface;

/// Rasterizes the straight segment between two path points, both endpoints
/// inclusive.
fn segment_points(from: CanvasPoint, to: CanvasPoint) -> impl Iterator<Item = (i64, i64)> {
    BresenhamLineIter::new(
        (from.x as f32, from.y as f32),
        (to.x as f32, to.y as f32),
    )
    .map(|(x, y)| (i64::from(x), i64::from(y)))
}

/// Pen segment: a 1-unit opaque line. Every line pixel saturates the mask so
/// the outline belongs to the extracted region.
pub(super) fn stamp_pen_segment(
    surface: &mut Surface,
    from: CanvasPoint,
    to: CanvasPoint,
    color: [u8; 3],
) {
    for (x, y) in segment_points(from, to) {
        surface.blend_pixel(x, y, color, 1.0);
        surface.fill_coverage(x, y);
    }
}

/// Brush segment: a disk stamped at every rasterized line point. Each stamp
/// blends a faint glaze onto the color buffer and adds one coverage step to
/// the mask; only accumulation across overlapping stamps reaches the
/// extraction threshold.
pub(super) fn stamp_brush_segment(
    surface: &mut Surface,
    from: CanvasPoint,
    to: CanvasPoint,
    color: [u8; 3],
    width: u32,
    glaze_alpha: f32,
    coverage_step: u16,
) {
    let radius = f64::from(width) / 2.0;
    let reach = radius.ceil() as i64;
    let radius_sq = radius * radius;

    for (cx, cy) in segment_points(from, to) {
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f64 <= radius_sq {
                    surface.blend_pixel(cx + dx, cy + dy, color, glaze_alpha);
                    surface.add_coverage(cx + dx, cy + dy, coverage_step);
                }
            }
        }
    }
}

/// Even-odd scanline fill of the closed stroke polygon, tinting the color
/// buffer and saturating the mask. Paths with fewer than three points
/// enclose nothing and are skipped.
pub(super) fn fill_stroke_polygon(
    surface: &mut Surface,
    path: &[CanvasPoint],
    color: [u8; 3],
    fill_alpha: f32,
) {
    if path.len() < 3 {
        return;
    }

    let min_y = path.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = path.iter().map(|p| p.y).max().unwrap_or(0);

    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y..=max_y {
        let scanline = f64::from(y) + 0.5;
        crossings.clear();

        for index in 0..path.len() {
            let start = path[index];
            let end = path[(index + 1) % path.len()];
            let (y0, y1) = (f64::from(start.y), f64::from(end.y));
            if (y0 <= scanline) == (y1 <= scanline) {
                continue;
            }
            let t = (scanline - y0) / (y1 - y0);
            crossings.push(f64::from(start.x) + t * f64::from(end.x - start.x));
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let left = pair[0].ceil() as i64;
            let right = pair[1].floor() as i64;
            for x in left..=right {
                surface.blend_pixel(x, i64::from(y), color, fill_alpha);
                surface.fill_coverage(x, i64::from(y));
            }
        }
    }
}
