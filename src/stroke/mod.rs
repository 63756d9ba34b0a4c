//! Converts pointer motion into pixels on the surface.

mod raster;

use crate::config::EngineConfig;
use crate::geometry::{CanvasPoint, Color};
use crate::surface::{coverage_units, Surface};

/// The active tool reported by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    None,
    Pen,
    Brush,
}

impl ToolKind {
    pub const fn is_drawing(self) -> bool {
        matches!(self, Self::Pen | Self::Brush)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOptions {
    pub pen_color: Color,
    pub brush_color: Color,
    pub brush_width: u32,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            pen_color: Color::new(0, 0, 0),
            brush_color: Color::new(0, 0, 0),
            brush_width: 10,
        }
    }
}

/// Owns the open stroke path and stamps it onto the surface as it grows.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    config: EngineConfig,
    active_tool: ToolKind,
    options: ToolOptions,
    path: Option<Vec<CanvasPoint>>,
}

impl StrokeRenderer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            active_tool: ToolKind::None,
            options: ToolOptions::default(),
            path: None,
        }
    }

    pub const fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    pub const fn options(&self) -> ToolOptions {
        self.options
    }

    pub const fn is_stroke_open(&self) -> bool {
        self.path.is_some()
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.active_tool = tool;
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.options.pen_color = color;
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.options.brush_color = color;
    }

    pub fn set_brush_width(&mut self, width: u32) {
        self.options.brush_width =
            width.clamp(self.config.brush_width_min, self.config.brush_width_max);
    }

    /// The color a region drawn with the current tool will display as.
    pub fn active_color(&self) -> Color {
        match self.active_tool {
            ToolKind::Brush => self.options.brush_color,
            _ => self.options.pen_color,
        }
    }

    /// Opens a path at `point`. Not having a drawing tool active is a silent
    /// no-op, as is a pointer-down while a path is already open.
    pub fn begin_stroke(&mut self, point: CanvasPoint) {
        if !self.active_tool.is_drawing() {
            return;
        }
        if self.path.is_some() {
            tracing::debug!("pointer-down with a stroke already open; keeping existing path");
            return;
        }
        self.path = Some(vec![point]);
    }

    /// Appends a segment to the open path and stamps it immediately. With
    /// `restart` set (the viewport changed zoom mid-stroke), the path is
    /// restarted at `point` instead, so no segment bridges pre-zoom and
    /// post-zoom coordinates.
    pub fn extend_stroke(&mut self, point: CanvasPoint, restart: bool, surface: &mut Surface) {
        let Some(path) = self.path.as_mut() else {
            tracing::debug!("pointer-move without an open stroke; ignoring");
            return;
        };

        if restart {
            path.clear();
            path.push(point);
            return;
        }

        let last = *path.last().expect("an open path always has a point");
        path.push(point);

        match self.active_tool {
            ToolKind::Pen => raster::stamp_pen_segment(
                surface,
                last,
                point,
                [
                    self.options.pen_color.r,
                    self.options.pen_color.g,
                    self.options.pen_color.b,
                ],
            ),
            ToolKind::Brush => raster::stamp_brush_segment(
                surface,
                last,
                point,
                [
                    self.options.brush_color.r,
                    self.options.brush_color.g,
                    self.options.brush_color.b,
                ],
                self.options.brush_width,
                self.config.brush_glaze_alpha,
                coverage_units(self.config.brush_coverage_step),
            ),
            ToolKind::None => {}
        }
    }

    /// Closes the path. For the pen the enclosed polygon is filled (tint on
    /// the color buffer, saturation on the mask). Returns whether a stroke
    /// was actually open, so callers can skip extraction otherwise.
    pub fn end_stroke(&mut self, surface: &mut Surface) -> bool {
        let Some(path) = self.path.take() else {
            tracing::debug!("pointer-up without an open stroke; ignoring");
            return false;
        };

        if self.active_tool == ToolKind::Pen {
            raster::fill_stroke_polygon(
                surface,
                &path,
                [
                    self.options.pen_color.r,
                    self.options.pen_color.g,
                    self.options.pen_color.b,
                ],
                self.config.pen_fill_alpha,
            );
        }

        tracing::debug!(points = path.len(), tool = ?self.active_tool, "stroke ended");
        true
    }

    /// Drops the open path without stamping anything further. Used when the
    /// source image is discarded mid-stroke.
    pub fn abort_stroke(&mut self) {
        self.path = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::COVERAGE_MAX;

    fn surface() -> Surface {
        Surface::new(30, 30).expect("dimensions are non-zero")
    }

    fn renderer(tool: ToolKind) -> StrokeRenderer {
        let mut renderer = StrokeRenderer::new(EngineConfig::default());
        renderer.select_tool(tool);
        renderer
    }

    #[test]
    fn begin_stroke_requires_a_drawing_tool() {
        let mut renderer = renderer(ToolKind::None);
        renderer.begin_stroke(CanvasPoint::new(5, 5));
        assert!(!renderer.is_stroke_open());

        renderer.select_tool(ToolKind::Pen);
        renderer.begin_stroke(CanvasPoint::new(5, 5));
        assert!(renderer.is_stroke_open());
    }

    #[test]
    fn extend_and_end_without_open_stroke_are_no_ops() {
        let mut surface = surface();
        let mut renderer = renderer(ToolKind::Pen);

        renderer.extend_stroke(CanvasPoint::new(9, 9), false, &mut surface);
        assert!(!renderer.end_stroke(&mut surface));
        assert_eq!(surface.coverage(9, 9).expect("in bounds"), 0);
    }

    #[test]
    fn pen_stroke_stamps_opaque_line_and_fills_enclosure_on_end() {
        let mut surface = surface();
        let mut renderer = renderer(ToolKind::Pen);
        renderer.set_pen_color(Color::new(200, 0, 0));

        renderer.begin_stroke(CanvasPoint::new(5, 5));
        renderer.extend_stroke(CanvasPoint::new(20, 5), false, &mut surface);
        renderer.extend_stroke(CanvasPoint::new(20, 20), false, &mut surface);
        renderer.extend_stroke(CanvasPoint::new(5, 20), false, &mut surface);
        assert!(renderer.end_stroke(&mut surface));

        // Outline pixel, stamped opaque.
        let outline = surface.read_pixel(10, 5).expect("in bounds");
        assert_eq!(outline.0[..3], [200, 0, 0]);
        assert_eq!(outline.0[3], 255);
        // Interior pixel, saturated by the closing fill.
        assert_eq!(surface.coverage(12, 12).expect("in bounds"), COVERAGE_MAX);
    }

    #[test]
    fn zero_length_stroke_ends_cleanly_with_empty_coverage() {
        let mut surface = surface();
        let mut renderer = renderer(ToolKind::Pen);

        renderer.begin_stroke(CanvasPoint::new(7, 7));
        assert!(renderer.end_stroke(&mut surface));
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                assert_eq!(surface.coverage(x, y).expect("in bounds"), 0);
            }
        }
    }

    #[test]
    fn single_brush_pass_stays_below_threshold_for_narrow_brush() {
        let mut surface = surface();
        let config = EngineConfig::default();
        let mut renderer = renderer(ToolKind::Brush);
        renderer.set_brush_width(1);

        renderer.begin_stroke(CanvasPoint::new(2, 15));
        renderer.extend_stroke(CanvasPoint::new(27, 15), false, &mut surface);
        renderer.end_stroke(&mut surface);

        let threshold = coverage_units(config.extraction_threshold);
        let center = surface.coverage(15, 15).expect("in bounds");
        assert!(
            center < threshold,
            "one width-1 pass ({center}) must stay under the threshold ({threshold})"
        );
    }

    #[test]
    fn repeated_brush_passes_cross_the_threshold() {
        let mut surface = surface();
        let config = EngineConfig::default();
        let mut renderer = renderer(ToolKind::Brush);
        renderer.set_brush_width(1);

        for _ in 0..12 {
            renderer.begin_stroke(CanvasPoint::new(2, 15));
            renderer.extend_stroke(CanvasPoint::new(27, 15), false, &mut surface);
            renderer.end_stroke(&mut surface);
        }

        let threshold = coverage_units(config.extraction_threshold);
        assert!(surface.coverage(15, 15).expect("in bounds") >= threshold);
    }

    #[test]
    fn restart_flag_prevents_a_bridging_segment() {
        let mut surface = surface();
        let mut renderer = renderer(ToolKind::Pen);

        renderer.begin_stroke(CanvasPoint::new(2, 2));
        renderer.extend_stroke(CanvasPoint::new(3, 2), false, &mut surface);
        // Zoom changed; next move restarts the path far away.
        renderer.extend_stroke(CanvasPoint::new(25, 25), true, &mut surface);
        renderer.extend_stroke(CanvasPoint::new(26, 25), false, &mut surface);
        renderer.end_stroke(&mut surface);

        // A pixel on the straight line between (3, 2) and (25, 25) stays
        // untouched because no bridging segment was stamped.
        assert_eq!(surface.coverage(14, 13).expect("in bounds"), 0);
    }

    #[test]
    fn brush_width_is_clamped_to_configured_bounds() {
        let mut renderer = renderer(ToolKind::Brush);
        renderer.set_brush_width(0);
        assert_eq!(renderer.options().brush_width, 1);
        renderer.set_brush_width(500);
        assert_eq!(renderer.options().brush_width, 50);
    }
}
