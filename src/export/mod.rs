//! Flat export artifacts handed to the external packaging collaborator.

use thiserror::Error;

use crate::region::LabeledRegion;
use crate::surface::{Surface, SurfaceError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot export before a base image is loaded")]
    MissingSource,
    #[error("failed to encode export image: {0}")]
    Image(#[from] SurfaceError),
    #[error("failed to encode label records: {0}")]
    Labels(#[from] serde_json::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// The two flat artifacts the engine produces: the composited bitmap as a
/// PNG byte stream and the label records as structured text. Bundling them
/// into an archive is the packager's job, not the engine's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifacts {
    pub image_png: Vec<u8>,
    pub labels_json: String,
}

pub fn export_artifacts(
    surface: &Surface,
    regions: &[LabeledRegion],
) -> ExportResult<ExportArtifacts> {
    let image_png = surface.encode_png()?;
    let labels_json = serde_json::to_string_pretty(regions)?;
    tracing::info!(
        image_bytes = image_png.len(),
        regions = regions.len(),
        "export artifacts produced"
    );
    Ok(ExportArtifacts {
        image_png,
        labels_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BufferPoint, Color};

    #[test]
    fn artifacts_carry_a_decodable_png_and_the_label_records() {
        let surface = Surface::new(5, 5).expect("dimensions are non-zero");
        let regions = vec![LabeledRegion {
            id: "region-1".to_string(),
            label: "tree".to_string(),
            pixels: vec![BufferPoint::new(1, 2), BufferPoint::new(2, 2)],
            color: Color::new(0, 128, 0),
        }];

        let artifacts =
            export_artifacts(&surface, &regions).expect("export should succeed");

        let decoded = image::load_from_memory(&artifacts.image_png)
            .expect("exported image should decode")
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (5, 5));

        let records: serde_json::Value =
            serde_json::from_str(&artifacts.labels_json).expect("records should parse");
        assert_eq!(records[0]["id"], "region-1");
        assert_eq!(records[0]["label"], "tree");
        assert_eq!(records[0]["pixels"][0]["x"], 1);
    }

    #[test]
    fn empty_store_exports_an_empty_record_list() {
        let surface = Surface::new(2, 2).expect("dimensions are non-zero");
        let artifacts = export_artifacts(&surface, &[]).expect("export should succeed");
        assert_eq!(artifacts.labels_json.trim(), "[]");
    }
}
