use std::{
    fs::File,
    io::{BufWriter, Seek, Write},
    path::Path,
};

use crate::{
    foundation::error::{StampError, StampResult},
    render::surface::ImageSurface,
};

/// Pixel layout an encoder accepts; the surface is converted to it before encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 8-bit RGB, alpha dropped.
    Rgb8,
    /// 8-bit RGBA.
    Rgba8,
    /// 16-bit RGBA.
    Rgba16,
    /// 32-bit float RGBA.
    Rgba32F,
}

/// One registered output codec.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    /// Lowercase filename suffixes routed to this encoder.
    pub suffixes: &'static [&'static str],
    /// Codec used to write the file.
    pub format: image::ImageFormat,
    /// Pixel layout handed to the codec.
    pub layout: PixelLayout,
}

const BUILTIN_ENCODERS: &[Encoder] = &[
    Encoder {
        suffixes: &["png"],
        format: image::ImageFormat::Png,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["jpg", "jpeg", "jpe", "jfif"],
        format: image::ImageFormat::Jpeg,
        layout: PixelLayout::Rgb8,
    },
    Encoder {
        suffixes: &["gif"],
        format: image::ImageFormat::Gif,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["bmp"],
        format: image::ImageFormat::Bmp,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["ico"],
        format: image::ImageFormat::Ico,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["tif", "tiff"],
        format: image::ImageFormat::Tiff,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["webp"],
        format: image::ImageFormat::WebP,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["tga"],
        format: image::ImageFormat::Tga,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["qoi"],
        format: image::ImageFormat::Qoi,
        layout: PixelLayout::Rgba8,
    },
    Encoder {
        suffixes: &["pbm", "pgm", "ppm", "pnm"],
        format: image::ImageFormat::Pnm,
        layout: PixelLayout::Rgb8,
    },
    Encoder {
        suffixes: &["ff", "farbfeld"],
        format: image::ImageFormat::Farbfeld,
        layout: PixelLayout::Rgba16,
    },
    Encoder {
        suffixes: &["exr"],
        format: image::ImageFormat::OpenExr,
        layout: PixelLayout::Rgba32F,
    },
];

impl Encoder {
    /// Encode `surface` into `sink` with the codec's default settings.
    pub fn encode<W: Write + Seek>(&self, surface: &ImageSurface, sink: &mut W) -> StampResult<()> {
        let rgba = image::DynamicImage::ImageRgba8(surface.to_rgba_image());
        let converted = match self.layout {
            PixelLayout::Rgba8 => rgba,
            PixelLayout::Rgb8 => image::DynamicImage::ImageRgb8(rgba.to_rgb8()),
            PixelLayout::Rgba16 => image::DynamicImage::ImageRgba16(rgba.to_rgba16()),
            PixelLayout::Rgba32F => image::DynamicImage::ImageRgba32F(rgba.to_rgba32f()),
        };
        converted
            .write_to(sink, self.format)
            .map_err(|err| StampError::output_unwritable(format!("{:?} encoder: {err}", self.format)))
    }
}

/// Suffix-keyed lookup of output encoders.
#[derive(Clone, Copy, Debug)]
pub struct EncoderRegistry {
    encoders: &'static [Encoder],
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EncoderRegistry {
    /// Registry of every encoder compiled into the `image` crate's default formats.
    pub fn builtin() -> Self {
        Self {
            encoders: BUILTIN_ENCODERS,
        }
    }

    /// Every registered suffix, in registration order.
    pub fn suffixes(&self) -> Vec<&'static str> {
        self.encoders
            .iter()
            .flat_map(|e| e.suffixes.iter().copied())
            .collect()
    }

    /// Find the encoder for a suffix, ignoring ASCII case.
    pub fn lookup(&self, suffix: &str) -> Option<&'static Encoder> {
        let encoders: &'static [Encoder] = self.encoders;
        encoders
            .iter()
            .find(|e| e.suffixes.iter().any(|s| s.eq_ignore_ascii_case(suffix)))
    }

    /// Resolve the encoder for an output path from the text after its final `.`.
    pub fn for_path(&self, path: &Path) -> StampResult<(&'static str, &'static Encoder)> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = match file_name.rfind('.') {
            Some(dot) if dot + 1 < file_name.len() => &file_name[dot + 1..],
            _ => {
                return Err(StampError::unknown_output_format(format!(
                    "'{}' has no file extension (supported: {})",
                    path.display(),
                    self.suffixes().join(", ")
                )));
            }
        };

        let encoder = self.lookup(suffix).ok_or_else(|| {
            StampError::unknown_output_format(format!(
                "no encoder for '.{suffix}' in '{}' (supported: {})",
                path.display(),
                self.suffixes().join(", ")
            ))
        })?;
        let canonical = encoder
            .suffixes
            .iter()
            .copied()
            .find(|s| s.eq_ignore_ascii_case(suffix))
            .unwrap_or(encoder.suffixes[0]);
        Ok((canonical, encoder))
    }

    /// Encode `surface` to `path` with the encoder chosen by its suffix.
    ///
    /// Returns the matched suffix. A partially written file is removed on failure.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn write_surface(&self, surface: &ImageSurface, path: &Path) -> StampResult<&'static str> {
        let (suffix, encoder) = self.for_path(path)?;

        let file = File::create(path).map_err(|err| {
            StampError::output_unwritable(format!("create '{}': {err}", path.display()))
        })?;
        let mut sink = BufWriter::new(file);

        let written = encoder.encode(surface, &mut sink).and_then(|()| {
            sink.flush().map_err(|err| {
                StampError::output_unwritable(format!("flush '{}': {err}", path.display()))
            })
        });
        if let Err(err) = written {
            drop(sink);
            std::fs::remove_file(path).ok();
            return Err(match err {
                StampError::OutputUnwritable(msg) => {
                    StampError::output_unwritable(format!("'{}': {msg}", path.display()))
                }
                other => other,
            });
        }

        tracing::info!(format = suffix, "wrote output image");
        Ok(suffix)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/registry.rs"]
mod tests;
