//! Multi-line label placement.
//!
//! A label's text is split at every `\n` into lines. The block is as wide as its widest line and
//! `line_height * lines` tall, and its center sits on the anchor's pixel position:
//!
//! ```text
//! cx = W * anchor.x            left     = cx - width / 2
//! cy = H * anchor.y            top      = cy - height / 2
//!                              baseline = top + line_height * (i + 1)
//! ```
//!
//! Every line starts at the block's left edge, so shorter lines are left-aligned within the
//! block rather than centered individually.

use kurbo::{Point, Rect};

use crate::{foundation::error::StampResult, labels::resolve::LabelBinding};

/// Text metrics and glyph drawing as consumed by the compositor.
///
/// Coordinates are device pixels with the origin at the top-left and y growing downward.
pub trait TextPainter {
    /// Advance width of `line` in pixels.
    fn measure(&mut self, line: &str) -> f64;

    /// Inter-baseline spacing in pixels, leading included.
    fn line_height(&self) -> f64;

    /// Draw `line` in opaque black with its baseline starting at `(x, baseline_y)`.
    fn draw(&mut self, line: &str, x: f64, baseline_y: f64) -> StampResult<()>;
}

/// One line of a placed text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLine {
    /// Line text, without the separator.
    pub text: String,
    /// Left edge of the line (equal for every line of a block).
    pub x: f64,
    /// Baseline y coordinate.
    pub baseline: f64,
    /// Measured advance width.
    pub width: f64,
}

/// Placement of one label's text block on the surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextBlock {
    /// Name of the anchor the block is centered on.
    pub label: String,
    /// Anchor position in device pixels.
    pub center: Point,
    /// Block rectangle: widest line by `line_height * lines`.
    pub bounds: Rect,
    /// Spacing between consecutive baselines.
    pub line_height: f64,
    /// Lines in top-to-bottom order.
    pub lines: Vec<PlacedLine>,
}

/// Split label text into lines at every `\n`, keeping empty lines.
///
/// Text with `k` separators always yields `k + 1` lines; empty text yields one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Compute where each line of `binding` goes on a `width` x `height` surface.
pub fn layout_block(
    painter: &mut impl TextPainter,
    width: u32,
    height: u32,
    binding: &LabelBinding,
) -> TextBlock {
    let lines = split_lines(&binding.text);
    let widths: Vec<f64> = lines.iter().map(|line| painter.measure(line)).collect();
    let line_height = painter.line_height();

    let block_w = widths.iter().copied().fold(0.0, f64::max);
    let block_h = line_height * lines.len() as f64;

    let center = Point::new(
        f64::from(width) * binding.anchor.x,
        f64::from(height) * binding.anchor.y,
    );
    let left = center.x - block_w / 2.0;
    let top = center.y - block_h / 2.0;

    let placed = lines
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (line, w))| PlacedLine {
            text: (*line).to_string(),
            x: left,
            baseline: top + line_height * (i as f64 + 1.0),
            width: w,
        })
        .collect();

    TextBlock {
        label: binding.anchor.name.clone(),
        center,
        bounds: Rect::new(left, top, left + block_w, top + block_h),
        line_height,
        lines: placed,
    }
}

/// Lay out `binding` and draw every line of it through `painter`.
///
/// Off-surface geometry is not an error; whatever falls outside the surface is clipped by the
/// painter.
pub fn composite_label(
    painter: &mut impl TextPainter,
    width: u32,
    height: u32,
    binding: &LabelBinding,
) -> StampResult<TextBlock> {
    let block = layout_block(painter, width, height, binding);
    tracing::debug!(
        label = %block.label,
        lines = block.lines.len(),
        x0 = block.bounds.x0,
        y0 = block.bounds.y0,
        x1 = block.bounds.x1,
        y1 = block.bounds.y1,
        "placing label"
    );

    for line in &block.lines {
        painter.draw(&line.text, line.x, line.baseline)?;
    }
    Ok(block)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
