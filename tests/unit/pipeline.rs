use crate::metadata::sidecar::Anchor;

use super::*;

fn white_surface(w: u32, h: u32) -> ImageSurface {
    ImageSurface::from_rgba_image(image::RgbaImage::from_pixel(
        w,
        h,
        image::Rgba([255, 255, 255, 255]),
    ))
    .unwrap()
}

fn binding(name: &str, x: f64, y: f64, text: &str) -> LabelBinding {
    LabelBinding {
        anchor: Anchor {
            name: name.to_string(),
            x,
            y,
        },
        text: text.to_string(),
    }
}

#[test]
fn job_defaults() {
    let job = StampJob::new("cat.png", LabelSource::TestLabels);
    assert_eq!(job.output, PathBuf::from("out.jpeg"));
    assert_eq!(job.font_size, 48.0);
    assert_eq!(job.font_name, DEFAULT_FONT);
}

#[test]
fn stamp_labels_returns_blocks_in_binding_order() {
    let mut surface = white_surface(200, 100);
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 16.0).unwrap();

    let bindings = [
        binding("a", 0.25, 0.5, "one"),
        binding("b", 0.75, 0.5, "two\nlines"),
    ];
    let blocks = stamp_labels(&mut surface, &mut engine, &font, &bindings).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].label, "a");
    assert_eq!(blocks[0].center, kurbo::Point::new(50.0, 50.0));
    assert_eq!(blocks[1].lines.len(), 2);
    assert_eq!(blocks[1].center, kurbo::Point::new(150.0, 50.0));

    let dark = surface
        .to_rgba_image()
        .pixels()
        .filter(|p| p.0[0] < 128)
        .count();
    assert!(dark > 0, "no ink composited");
}

#[test]
fn stamp_labels_with_no_bindings_leaves_surface_untouched() {
    let mut surface = white_surface(32, 32);
    let before = surface.data().to_vec();
    let mut engine = TextLayoutEngine::new();
    let font = engine.load_embedded_font(DEFAULT_FONT, 16.0).unwrap();

    let blocks = stamp_labels(&mut surface, &mut engine, &font, &[]).unwrap();
    assert!(blocks.is_empty());
    assert_eq!(surface.data(), before.as_slice());
}
