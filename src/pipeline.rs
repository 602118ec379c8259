use std::path::{Path, PathBuf};

use crate::{
    encode::registry::EncoderRegistry,
    foundation::error::StampResult,
    labels::resolve::{LabelBinding, LabelSource, resolve_labels},
    metadata::sidecar::load_sidecar,
    render::{cpu::GlyphCanvas, surface::ImageSurface},
    text::{
        font::{DEFAULT_FONT, LoadedFont, TextLayoutEngine},
        layout::{TextBlock, composite_label},
    },
};

/// Output path used when none is given.
pub const DEFAULT_OUTPUT: &str = "out.jpeg";

/// Label font size in points when none is given.
pub const DEFAULT_FONT_SIZE: f32 = 48.0;

/// Everything one labeling run needs.
#[derive(Clone, Debug)]
pub struct StampJob {
    /// Raster image to label; its sidecar sits next to it.
    pub input: PathBuf,
    /// Destination file; the suffix selects the encoder.
    pub output: PathBuf,
    /// Where label text comes from.
    pub labels: LabelSource,
    /// Font size in points (one point per pixel).
    pub font_size: f32,
    /// Logical name of the embedded font.
    pub font_name: String,
}

impl StampJob {
    /// Job with the default output path, font and font size.
    pub fn new(input: impl Into<PathBuf>, labels: LabelSource) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            labels,
            font_size: DEFAULT_FONT_SIZE,
            font_name: DEFAULT_FONT.to_string(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct StampReport {
    /// File that was written.
    pub output: PathBuf,
    /// Suffix of the encoder that wrote it.
    pub format: &'static str,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Placement of every composited label, in drawing order.
    pub blocks: Vec<TextBlock>,
}

/// Label one image: decode, read the sidecar, resolve labels, load the font, composite, encode.
///
/// Steps run in that fixed order and the first failure aborts the run.
#[tracing::instrument(skip_all, fields(input = %job.input.display(), output = %job.output.display()))]
pub fn run(job: &StampJob) -> StampResult<StampReport> {
    let mut surface = ImageSurface::open(&job.input)?;
    let anchors = load_sidecar(&job.input)?;
    let bindings = resolve_labels(&anchors, &job.labels)?;
    tracing::info!(
        anchors = anchors.len(),
        labels = bindings.len(),
        "resolved labels"
    );

    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(&job.font_name, job.font_size)?;

    let blocks = stamp_labels(&mut surface, &mut engine, &font, &bindings)?;

    let format = write_output(&surface, &job.output)?;
    Ok(StampReport {
        output: job.output.clone(),
        format,
        width: surface.width(),
        height: surface.height(),
        blocks,
    })
}

/// Composite every binding onto `surface` with `font`, returning the placed blocks.
pub fn stamp_labels(
    surface: &mut ImageSurface,
    engine: &mut TextLayoutEngine,
    font: &LoadedFont,
    bindings: &[LabelBinding],
) -> StampResult<Vec<TextBlock>> {
    let (width, height) = (surface.width(), surface.height());
    let mut canvas = GlyphCanvas::new(surface, engine, font)?;

    let blocks = bindings
        .iter()
        .map(|binding| composite_label(&mut canvas, width, height, binding))
        .collect::<StampResult<Vec<_>>>()?;

    canvas.finish()?;
    Ok(blocks)
}

fn write_output(surface: &ImageSurface, path: &Path) -> StampResult<&'static str> {
    EncoderRegistry::builtin().write_surface(surface, path)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
