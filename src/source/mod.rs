use image::RgbaImage;
use thiserror::Error;

/// A decoded base image handed to the engine by the archive/decode
/// collaborator. The engine never parses archive or container formats
/// itself; this artifact is the whole input boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSource {
    pub pixels: RgbaImage,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("input is not a decodable image: {message}")]
    UnsupportedInput { message: String },
    #[error("decoded image has empty dimensions")]
    EmptyImage,
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

impl DecodedSource {
    /// Wraps an already-decoded bitmap provided by an external decoder.
    pub fn from_rgba(pixels: RgbaImage, byte_len: usize) -> SourceResult<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(SourceError::EmptyImage);
        }
        Ok(Self {
            pixels,
            width,
            height,
            byte_len,
        })
    }
}

/// Decodes a raw byte buffer into a source artifact. Failure here is the one
/// condition surfaced to the user, as a rejection of the input file.
pub fn decode_source(bytes: &[u8]) -> SourceResult<DecodedSource> {
    let decoded = image::load_from_memory(bytes).map_err(|err| {
        tracing::warn!(byte_len = bytes.len(), %err, "rejected undecodable input");
        SourceError::UnsupportedInput {
            message: err.to_string(),
        }
    })?;
    let source = DecodedSource::from_rgba(decoded.to_rgba8(), bytes.len())?;
    tracing::debug!(
        width = source.width,
        height = source.height,
        byte_len = source.byte_len,
        "decoded source image"
    );
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn decode_source_rejects_non_image_bytes() {
        let err = decode_source(b"definitely not an image").expect_err("garbage should fail");
        assert!(matches!(err, SourceError::UnsupportedInput { .. }));
    }

    #[test]
    fn decode_source_accepts_png_bytes_and_records_byte_len() {
        let mut image = RgbaImage::new(4, 3);
        image.put_pixel(1, 1, Rgba([200, 10, 30, 255]));

        let mut bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .expect("in-memory png encoding should work");

        let source = decode_source(&bytes).expect("png bytes should decode");
        assert_eq!((source.width, source.height), (4, 3));
        assert_eq!(source.byte_len, bytes.len());
        assert_eq!(source.pixels.get_pixel(1, 1), &Rgba([200, 10, 30, 255]));
    }

    #[test]
    fn from_rgba_rejects_empty_dimensions() {
        let err = DecodedSource::from_rgba(RgbaImage::new(0, 5), 0)
            .expect_err("zero-width bitmap should fail");
        assert!(matches!(err, SourceError::EmptyImage));
    }
}
