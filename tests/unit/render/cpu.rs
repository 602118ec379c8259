use crate::{
    labels::resolve::LabelBinding,
    metadata::sidecar::Anchor,
    text::{font::DEFAULT_FONT, layout::composite_label},
};

use super::*;

fn white_surface(w: u32, h: u32) -> ImageSurface {
    ImageSurface::from_rgba_image(image::RgbaImage::from_pixel(
        w,
        h,
        image::Rgba([255, 255, 255, 255]),
    ))
    .unwrap()
}

fn binding(x: f64, y: f64, text: &str) -> LabelBinding {
    LabelBinding {
        anchor: Anchor {
            name: "a".to_string(),
            x,
            y,
        },
        text: text.to_string(),
    }
}

/// Bounding box `(x0, y0, x1, y1)` of clearly darkened pixels, inclusive.
fn ink_bbox(surface: &ImageSurface) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let px = surface.pixel(x, y).unwrap();
            if px[0] < 128 {
                bbox = Some(match bbox {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
    }
    bbox
}

#[test]
fn single_line_ink_is_centered_horizontally_and_inside_block() {
    let mut surface = white_surface(600, 400);
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 48.0).unwrap();

    let block = {
        let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
        let block = composite_label(&mut canvas, 600, 400, &binding(0.5, 0.5, "HOH")).unwrap();
        canvas.finish().unwrap();
        block
    };

    let (x0, y0, x1, y1) = ink_bbox(&surface).expect("text should leave ink");
    let ink_cx = (f64::from(x0) + f64::from(x1) + 1.0) / 2.0;
    assert!((ink_cx - 300.0).abs() <= 4.0, "ink center x {ink_cx}");

    let b = block.bounds;
    assert!(f64::from(x0) >= b.x0 - 1.0 && f64::from(x1) <= b.x1 + 1.0);
    assert!(f64::from(y0) >= b.y0 - 1.0 && f64::from(y1) <= b.y1 + 1.0);
}

#[test]
fn text_is_drawn_in_black() {
    let mut surface = white_surface(200, 100);
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 64.0).unwrap();

    let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
    composite_label(&mut canvas, 200, 100, &binding(0.5, 0.5, "I")).unwrap();
    canvas.finish().unwrap();

    let darkest = (0..surface.height())
        .flat_map(|y| (0..surface.width()).map(move |x| (x, y)))
        .filter_map(|(x, y)| surface.pixel(x, y))
        .min_by_key(|px| u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]))
        .unwrap();
    assert_eq!(darkest, [0, 0, 0, 255]);
}

#[test]
fn empty_text_leaves_surface_untouched() {
    let mut surface = white_surface(64, 64);
    let before = surface.clone();
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 48.0).unwrap();

    let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
    composite_label(&mut canvas, 64, 64, &binding(0.5, 0.5, "")).unwrap();
    canvas.finish().unwrap();

    assert_eq!(surface, before);
}

#[test]
fn unfinished_canvas_leaves_surface_untouched() {
    let mut surface = white_surface(64, 64);
    let before = surface.clone();
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 48.0).unwrap();

    {
        let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
        composite_label(&mut canvas, 64, 64, &binding(0.5, 0.5, "X")).unwrap();
    }

    assert_eq!(surface, before);
}

#[test]
fn fully_off_surface_text_is_clipped_without_error() {
    let mut surface = white_surface(64, 64);
    let before = surface.clone();
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 24.0).unwrap();

    let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
    composite_label(&mut canvas, 64, 64, &binding(-5.0, 7.0, "far away")).unwrap();
    canvas.finish().unwrap();

    assert_eq!(surface, before);
}

#[test]
fn stacked_lines_share_a_left_edge() {
    let mut surface = white_surface(400, 300);
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 32.0).unwrap();

    let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
    let block =
        composite_label(&mut canvas, 400, 300, &binding(0.5, 0.5, "Hello\nWorld")).unwrap();
    canvas.finish().unwrap();

    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.lines[0].x, block.lines[1].x);
    assert!(
        (block.lines[1].baseline - block.lines[0].baseline - f64::from(font.line_height())).abs()
            < 1e-9
    );
    assert!(ink_bbox(&surface).is_some());
}

#[test]
fn pixels_away_from_ink_keep_translucent_bytes() {
    let src = image::RgbaImage::from_pixel(200, 100, image::Rgba([200, 100, 50, 10]));
    let mut surface = ImageSurface::from_rgba_image(src.clone()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 24.0).unwrap();

    let mut canvas = GlyphCanvas::new(&mut surface, &mut engine, &font).unwrap();
    composite_label(&mut canvas, 200, 100, &binding(0.1, 0.2, "T")).unwrap();
    canvas.finish().unwrap();

    let out = surface.to_rgba_image();
    assert_ne!(out, src, "text should change some pixels");
    for y in 60..100 {
        for x in 100..200 {
            assert_eq!(out.get_pixel(x, y), src.get_pixel(x, y), "({x}, {y})");
        }
    }
}
