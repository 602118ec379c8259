use crate::{
    foundation::{
        blend::over_straight_in_place,
        error::{StampError, StampResult},
    },
    render::surface::ImageSurface,
    text::{
        font::{LoadedFont, TextLayoutEngine},
        layout::TextPainter,
    },
};

/// Drawing context that rasterizes glyphs with `vello_cpu` onto an [`ImageSurface`].
///
/// Glyphs accumulate in a transparent overlay; [`GlyphCanvas::finish`] composites the overlay onto
/// the surface. Dropping the canvas without finishing leaves the surface untouched.
pub struct GlyphCanvas<'a> {
    surface: &'a mut ImageSurface,
    engine: &'a mut TextLayoutEngine,
    font: &'a LoadedFont,
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    glyph_runs: usize,
}

impl<'a> GlyphCanvas<'a> {
    /// Open a drawing context on `surface` with `font` selected, black paint and anti-aliasing on.
    pub fn new(
        surface: &'a mut ImageSurface,
        engine: &'a mut TextLayoutEngine,
        font: &'a LoadedFont,
    ) -> StampResult<Self> {
        let width: u16 = surface.width().try_into().map_err(|_| {
            StampError::input_image_unreadable("surface width exceeds the rasterizer limit")
        })?;
        let height: u16 = surface.height().try_into().map_err(|_| {
            StampError::input_image_unreadable("surface height exceeds the rasterizer limit")
        })?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_aliasing_threshold(None);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));

        Ok(Self {
            surface,
            engine,
            font,
            ctx,
            width,
            height,
            glyph_runs: 0,
        })
    }

    /// Rasterize everything drawn so far and composite it onto the surface.
    pub fn finish(mut self) -> StampResult<()> {
        if self.glyph_runs == 0 || self.width == 0 || self.height == 0 {
            return Ok(());
        }

        self.ctx.flush();
        let mut overlay = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut overlay);
        over_straight_in_place(self.surface.data_mut(), overlay.data_as_u8_slice())?;

        tracing::debug!(glyph_runs = self.glyph_runs, "composited text overlay");
        Ok(())
    }
}

impl TextPainter for GlyphCanvas<'_> {
    fn measure(&mut self, line: &str) -> f64 {
        f64::from(self.engine.measure(self.font, line))
    }

    fn line_height(&self) -> f64 {
        f64::from(self.font.line_height())
    }

    fn draw(&mut self, line: &str, x: f64, baseline_y: f64) -> StampResult<()> {
        if line.is_empty() {
            return Ok(());
        }

        let layout = self.engine.layout_line(self.font, line);
        for layout_line in layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                // Positioned glyphs sit on the run's own baseline; move it onto the requested one.
                let dy = baseline_y - f64::from(run.baseline());
                self.ctx
                    .set_transform(vello_cpu::kurbo::Affine::translate((x, dy)));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(self.font.font_data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
                self.glyph_runs += 1;
            }
        }
        self.ctx.reset_transform();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
