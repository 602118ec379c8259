//! Raster side of the pipeline: the image surface and the glyph rasterizer that draws on it.

/// `vello_cpu` glyph canvas.
pub mod cpu;
/// Decoded image surface.
pub mod surface;
