//! Device-to-buffer coordinate mapping under zoom.

use crate::config::EngineConfig;
use crate::geometry::{CanvasPoint, DevicePoint, ScreenRect};

/// Tracks the zoom scale and the "first point after zoom" flag. The flag
/// makes the stroke renderer restart its path on the next move event, so no
/// segment is stamped between pre-zoom and post-zoom coordinates.
#[derive(Debug, Clone)]
pub struct ViewportController {
    zoom_min: f32,
    zoom_max: f32,
    zoom_step: f32,
    scale: f32,
    restart_stroke: bool,
}

impl ViewportController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
            zoom_step: config.zoom_step,
            scale: config.zoom_min,
            restart_stroke: false,
        }
    }

    pub const fn scale(&self) -> f32 {
        self.scale
    }

    pub fn zoom_in(&mut self) {
        self.apply_zoom(self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.apply_zoom(-self.zoom_step);
    }

    fn apply_zoom(&mut self, delta: f32) {
        self.scale = (self.scale + delta).clamp(self.zoom_min, self.zoom_max);
        // Every wheel event marks the next move as a path restart, even at
        // the clamp boundary, matching pointer/viewport event ordering the
        // host UI delivers.
        self.restart_stroke = true;
        tracing::trace!(scale = self.scale, "zoom changed");
    }

    /// Returns and clears the restart flag. Consumed by the session on each
    /// stroke-move event.
    pub fn take_restart_flag(&mut self) -> bool {
        std::mem::take(&mut self.restart_stroke)
    }

    /// Maps a device-space point into buffer space through the canvas's
    /// on-screen rectangle (which already reflects the zoom scale).
    pub fn to_buffer_coordinates(
        &self,
        device: DevicePoint,
        rect: ScreenRect,
        surface_width: u32,
        surface_height: u32,
    ) -> CanvasPoint {
        let rect_width = rect.width.max(f64::EPSILON);
        let rect_height = rect.height.max(f64::EPSILON);
        let scale_x = f64::from(surface_width) / rect_width;
        let scale_y = f64::from(surface_height) / rect_height;
        let x = (device.x - rect.left) * scale_x;
        let y = (device.y - rect.top) * scale_y;
        CanvasPoint::new(x.floor() as i32, y.floor() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ViewportController {
        ViewportController::new(&EngineConfig::default())
    }

    #[test]
    fn zoom_steps_and_clamps_within_bounds() {
        let mut viewport = controller();
        assert_eq!(viewport.scale(), 1.0);

        viewport.zoom_in();
        assert!((viewport.scale() - 1.1).abs() < 1e-6);

        for _ in 0..100 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale(), 3.0);

        for _ in 0..100 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn zoom_sets_restart_flag_and_take_clears_it() {
        let mut viewport = controller();
        assert!(!viewport.take_restart_flag());

        viewport.zoom_in();
        assert!(viewport.take_restart_flag());
        assert!(!viewport.take_restart_flag());
    }

    #[test]
    fn device_points_map_through_the_screen_rect() {
        let viewport = controller();
        let rect = ScreenRect::new(100.0, 50.0, 400.0, 300.0);

        let origin = viewport.to_buffer_coordinates(DevicePoint::new(100.0, 50.0), rect, 200, 150);
        assert_eq!(origin, CanvasPoint::new(0, 0));

        // The rect is twice the buffer size, so device deltas halve.
        let inner = viewport.to_buffer_coordinates(DevicePoint::new(140.0, 70.0), rect, 200, 150);
        assert_eq!(inner, CanvasPoint::new(20, 10));
    }

    #[test]
    fn points_left_of_the_rect_map_negative() {
        let viewport = controller();
        let rect = ScreenRect::new(10.0, 10.0, 100.0, 100.0);
        let outside = viewport.to_buffer_coordinates(DevicePoint::new(0.0, 0.0), rect, 100, 100);
        assert_eq!(outside, CanvasPoint::new(-10, -10));
    }
}
