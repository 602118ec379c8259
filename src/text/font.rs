use crate::foundation::error::{StampError, StampResult};

/// Logical name of the font shipped with the tool.
pub const DEFAULT_FONT: &str = "DejaVuSans.ttf";

/// Return the bytes of an embedded font by logical name.
pub fn embedded_font(name: &str) -> Option<&'static [u8]> {
    match name {
        "DejaVuSans.ttf" => Some(include_bytes!("../../assets/fonts/DejaVuSans.ttf")),
        _ => None,
    }
}

/// Parley brush for label text. Labels are always opaque black, so it carries no data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InkBrush;

/// Vertical metrics of the loaded face at its configured size, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of a line to its baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of a line.
    pub descent: f32,
    /// Extra spacing between lines.
    pub leading: f32,
}

impl LineMetrics {
    /// Inter-baseline spacing including leading.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// A font loaded at a fixed pixel size, ready for layout and rasterization.
#[derive(Clone)]
pub struct LoadedFont {
    name: String,
    bytes: &'static [u8],
    family: String,
    size_px: f32,
    metrics: LineMetrics,
    data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl LoadedFont {
    /// Logical asset name the font was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Family name registered for the face.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Configured size in pixels (one point maps to one pixel).
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Line metrics at the configured size.
    pub fn metrics(&self) -> LineMetrics {
        self.metrics
    }

    /// Inter-baseline spacing at the configured size.
    pub fn line_height(&self) -> f32 {
        self.metrics.line_height()
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

/// Stateful helper for shaping single lines with Parley.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<InkBrush>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register an embedded font and load it at `size_pt` points.
    pub fn load_embedded_font(&mut self, name: &str, size_pt: f32) -> StampResult<LoadedFont> {
        let bytes = embedded_font(name).ok_or_else(|| {
            StampError::font_unavailable(format!("no embedded font named '{name}'"))
        })?;
        self.load_font_bytes(name, bytes, size_pt)
    }

    fn load_font_bytes(
        &mut self,
        name: &str,
        bytes: &'static [u8],
        size_pt: f32,
    ) -> StampResult<LoadedFont> {
        if !size_pt.is_finite() || size_pt <= 0.0 {
            return Err(StampError::font_unavailable(format!(
                "font size must be finite and > 0, got {size_pt}"
            )));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            StampError::font_unavailable(format!("'{name}' is not a loadable TrueType face"))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                StampError::font_unavailable(format!("'{name}' registered a family with no name"))
            })?
            .to_string();

        let mut font = LoadedFont {
            name: name.to_string(),
            bytes,
            family,
            size_px: size_pt,
            metrics: LineMetrics {
                ascent: 0.0,
                descent: 0.0,
                leading: 0.0,
            },
            data: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(bytes.to_vec()),
                0,
            ),
        };

        // Metrics are per face, so any line with a glyph in the face will do.
        let probe = self.layout_line(&font, "Hg");
        let metrics = probe
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                LineMetrics {
                    ascent: m.ascent,
                    descent: m.descent,
                    leading: m.leading,
                }
            })
            .filter(|m| m.line_height() > 0.0)
            .ok_or_else(|| {
                StampError::font_unavailable(format!("'{name}' produced no line metrics"))
            })?;
        font.metrics = metrics;

        tracing::info!(
            font = %font.name,
            family = %font.family,
            size_px = font.size_px,
            line_height = font.line_height(),
            "loaded font"
        );
        Ok(font)
    }

    /// Shape one line of text without wrapping.
    pub fn layout_line(&mut self, font: &LoadedFont, line: &str) -> parley::Layout<InkBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, line, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(InkBrush));

        let mut layout: parley::Layout<InkBrush> = builder.build(line);
        layout.break_all_lines(None);
        layout
    }

    /// Advance width of a single line in pixels, trailing whitespace included.
    pub fn measure(&mut self, font: &LoadedFont, line: &str) -> f32 {
        if line.is_empty() {
            return 0.0;
        }
        self.layout_line(font, line)
            .lines()
            .map(|l| l.metrics().advance)
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
