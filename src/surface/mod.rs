use image::{imageops, Rgba, RgbaImage};
use thiserror::Error;

/// Coverage value meaning "fully covered" in the extraction mask.
pub const COVERAGE_MAX: u16 = u16::MAX;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel ({x}, {y}) is outside the {width}x{height} surface")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("failed to encode surface: {0}")]
    Encode(#[from] image::ImageError),
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Converts a 0..=1 coverage fraction into mask units.
pub fn coverage_units(fraction: f32) -> u16 {
    (f32::from(COVERAGE_MAX) * fraction.clamp(0.0, 1.0)).round() as u16
}

/// The drawing surface: a visible RGBA buffer plus a parallel coverage mask.
/// The mask is the extraction signal; visible styling never feeds back into
/// region capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    color: RgbaImage,
    mask: Vec<u16>,
    width: u32,
    height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> SurfaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            color: RgbaImage::new(width, height),
            mask: vec![0; width as usize * height as usize],
            width,
            height,
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn color_buffer(&self) -> &RgbaImage {
        &self.color
    }

    fn bounds_check(&self, x: u32, y: u32) -> SurfaceResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(SurfaceError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    pub fn read_pixel(&self, x: u32, y: u32) -> SurfaceResult<Rgba<u8>> {
        self.bounds_check(x, y)?;
        Ok(*self.color.get_pixel(x, y))
    }

    /// Fills the visible buffer with transparent black. The mask is left
    /// untouched; use [`Surface::clear_coverage`] for that.
    pub fn clear(&mut self) {
        for pixel in self.color.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Blits a base image scaled to the surface dimensions.
    pub fn draw_base_image(&mut self, base: &RgbaImage) {
        if base.dimensions() == (self.width, self.height) {
            self.color.copy_from_slice(base.as_raw());
            return;
        }
        let scaled = imageops::resize(base, self.width, self.height, imageops::FilterType::Triangle);
        self.color.copy_from_slice(scaled.as_raw());
    }

    /// Alpha-blends `color` over the pixel at (x, y). Stamps that fall
    /// outside the surface are clipped, matching how a canvas clips strokes
    /// that wander off its edge.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let alpha = alpha.clamp(0.0, 1.0);
        let dst = self.color.get_pixel_mut(x, y);
        for channel in 0..3 {
            let src = f32::from(color[channel]);
            let old = f32::from(dst[channel]);
            dst[channel] = (src * alpha + old * (1.0 - alpha)).round() as u8;
        }
        let old_alpha = f32::from(dst[3]) / 255.0;
        let new_alpha = alpha + old_alpha * (1.0 - alpha);
        dst[3] = (new_alpha * 255.0).round() as u8;
    }

    /// Adds `amount` coverage at (x, y), saturating at [`COVERAGE_MAX`].
    /// Out-of-surface stamps are clipped like [`Surface::blend_pixel`].
    pub fn add_coverage(&mut self, x: i64, y: i64, amount: u16) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.mask[index] = self.mask[index].saturating_add(amount);
    }

    /// Saturates coverage at (x, y).
    pub fn fill_coverage(&mut self, x: i64, y: i64) {
        self.add_coverage(x, y, COVERAGE_MAX);
    }

    pub fn coverage(&self, x: u32, y: u32) -> SurfaceResult<u16> {
        let index = self.bounds_check(x, y)?;
        Ok(self.mask[index])
    }

    pub fn clear_coverage(&mut self) {
        self.mask.fill(0);
    }

    /// Encodes the current visible buffer as a PNG byte stream.
    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.color
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}
