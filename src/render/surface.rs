use std::path::Path;

use crate::foundation::error::{StampError, StampResult};

/// Largest width or height the rasterizer can address.
pub const MAX_SURFACE_DIM: u32 = u16::MAX as u32;

/// In-memory raster that labels are drawn onto.
///
/// Pixels are stored as row-major straight-alpha RGBA8, exactly as decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSurface {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl ImageSurface {
    /// Decode an image file; the format is guessed from the file contents.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> StampResult<Self> {
        let reader = image::ImageReader::open(path)
            .map_err(|err| unreadable(path, err))?
            .with_guessed_format()
            .map_err(|err| unreadable(path, err))?;
        let decoded = reader.decode().map_err(|err| unreadable(path, err))?;

        let surface = Self::from_rgba_image(decoded.to_rgba8()).map_err(|err| match err {
            StampError::InputImageUnreadable(msg) => unreadable(path, msg),
            other => other,
        })?;
        tracing::info!(
            width = surface.width,
            height = surface.height,
            "decoded input image"
        );
        Ok(surface)
    }

    /// Build a surface from straight-alpha RGBA8 pixels.
    pub fn from_rgba_image(image: image::RgbaImage) -> StampResult<Self> {
        let (width, height) = image.dimensions();
        if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return Err(StampError::input_image_unreadable(format!(
                "{width}x{height} exceeds the {MAX_SURFACE_DIM}px limit per side"
            )));
        }

        Ok(Self {
            width,
            height,
            rgba8: image.into_raw(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight-alpha RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba8
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.rgba8
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba8[i..i + 4]);
        Some(px)
    }

    /// Copy the surface out as a straight-alpha RGBA8 image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> StampError {
    StampError::input_image_unreadable(format!("'{}': {err}", path.display()))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
