//! Full clear-and-repaint of the visible buffer.
//!
//! Regions may overlap and be deleted in any order; incremental patching
//! cannot un-paint a deleted or overlapped region without re-deriving the
//! visible state from the full list, so every render starts from scratch.

use image::RgbaImage;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::region::LabeledRegion;
use crate::surface::Surface;

#[derive(Debug, Error)]
pub enum CompositorError {
    #[error("cannot render before a base image is loaded")]
    MissingSource,
}

pub type CompositorResult<T> = std::result::Result<T, CompositorError>;

/// The single authoritative repaint routine. Fixed order: clear, base image,
/// stored regions in store order (highlight color for the selected one),
/// then the selected region again at marker size so it stays visible under
/// dense overlap from later-drawn regions.
pub fn render(
    surface: &mut Surface,
    base: Option<&RgbaImage>,
    regions: &[LabeledRegion],
    selected_id: Option<&str>,
    config: &EngineConfig,
) -> CompositorResult<()> {
    let base = base.ok_or(CompositorError::MissingSource)?;

    surface.clear();
    surface.draw_base_image(base);

    for region in regions {
        let selected = selected_id == Some(region.id.as_str());
        let color = if selected {
            config.highlight_color
        } else {
            [region.color.r, region.color.g, region.color.b]
        };
        for pixel in &region.pixels {
            surface.blend_pixel(
                i64::from(pixel.x),
                i64::from(pixel.y),
                color,
                config.overlay_alpha,
            );
        }
    }

    if let Some(selected) = selected_id.and_then(|id| regions.iter().find(|r| r.id == id)) {
        let marker = i64::from(config.selection_marker_size);
        for pixel in &selected.pixels {
            for dy in 0..marker {
                for dx in 0..marker {
                    surface.blend_pixel(
                        i64::from(pixel.x) + dx,
                        i64::from(pixel.y) + dy,
                        config.highlight_color,
                        config.overlay_alpha,
                    );
                }
            }
        }
    }

    tracing::trace!(regions = regions.len(), ?selected_id, "surface repainted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BufferPoint, Color};
    use image::Rgba;

    fn region(id: &str, color: Color, points: &[(u32, u32)]) -> LabeledRegion {
        LabeledRegion {
            id: id.to_string(),
            label: id.to_string(),
            pixels: points
                .iter()
                .map(|&(x, y)| BufferPoint::new(x, y))
                .collect(),
            color,
        }
    }

    fn opaque_config() -> EngineConfig {
        EngineConfig {
            overlay_alpha: 1.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn render_declines_without_a_base_image() {
        let mut surface = Surface::new(4, 4).expect("dimensions are non-zero");
        let err = render(&mut surface, None, &[], None, &EngineConfig::default())
            .expect_err("missing base must decline");
        assert!(matches!(err, CompositorError::MissingSource));
    }

    #[test]
    fn later_added_region_wins_on_shared_pixels() {
        let mut surface = Surface::new(8, 8).expect("dimensions are non-zero");
        let base = RgbaImage::new(8, 8);
        let first = region("region-1", Color::new(255, 0, 0), &[(2, 2), (3, 3)]);
        let second = region("region-2", Color::new(0, 0, 255), &[(3, 3), (4, 4)]);

        render(
            &mut surface,
            Some(&base),
            &[first, second],
            None,
            &opaque_config(),
        )
        .expect("render should succeed");

        let shared = surface.read_pixel(3, 3).expect("in bounds");
        assert_eq!(shared.0[..3], [0, 0, 255]);
        let only_first = surface.read_pixel(2, 2).expect("in bounds");
        assert_eq!(only_first.0[..3], [255, 0, 0]);
    }

    #[test]
    fn selected_region_paints_highlight_and_enlarged_marker() {
        let mut surface = Surface::new(8, 8).expect("dimensions are non-zero");
        let base = RgbaImage::new(8, 8);
        let config = opaque_config();
        let selected = region("region-1", Color::new(255, 0, 0), &[(2, 2)]);

        render(
            &mut surface,
            Some(&base),
            &[selected],
            Some("region-1"),
            &config,
        )
        .expect("render should succeed");

        let highlight = config.highlight_color;
        assert_eq!(
            surface.read_pixel(2, 2).expect("in bounds").0[..3],
            highlight
        );
        // The marker pass spills into the neighbor cell.
        assert_eq!(
            surface.read_pixel(3, 3).expect("in bounds").0[..3],
            highlight
        );
    }

    #[test]
    fn rerender_after_delete_restores_the_base_image() {
        let mut surface = Surface::new(8, 8).expect("dimensions are non-zero");
        let mut base = RgbaImage::new(8, 8);
        for pixel in base.pixels_mut() {
            *pixel = Rgba([7, 7, 7, 255]);
        }
        let config = opaque_config();
        let doomed = region("region-1", Color::new(255, 0, 0), &[(5, 5)]);

        render(&mut surface, Some(&base), &[doomed], None, &config).expect("first render");
        assert_eq!(surface.read_pixel(5, 5).expect("in bounds").0[..3], [255, 0, 0]);

        render(&mut surface, Some(&base), &[], None, &config).expect("second render");
        assert_eq!(surface.read_pixel(5, 5).expect("in bounds").0[..3], [7, 7, 7]);
    }
}
