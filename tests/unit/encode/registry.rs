use std::io::Cursor;

use super::*;

fn unique_tmp_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "labelstamp_encode_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn gray_surface() -> ImageSurface {
    ImageSurface::from_rgba_image(image::RgbaImage::from_pixel(
        8,
        6,
        image::Rgba([90, 90, 90, 255]),
    ))
    .unwrap()
}

#[test]
fn lookup_is_case_insensitive() {
    let registry = EncoderRegistry::builtin();
    assert_eq!(
        registry.lookup("PNG").map(|e| e.format),
        Some(image::ImageFormat::Png)
    );
    assert_eq!(
        registry.lookup("Jpeg").map(|e| e.format),
        Some(image::ImageFormat::Jpeg)
    );
    assert!(registry.lookup("xyz").is_none());
}

#[test]
fn suffix_is_text_after_final_dot() {
    let registry = EncoderRegistry::builtin();
    let (suffix, encoder) = registry.for_path(Path::new("dir.v1/out.final.JPG")).unwrap();
    assert_eq!(suffix, "jpg");
    assert_eq!(encoder.layout, PixelLayout::Rgb8);
}

#[test]
fn missing_or_unknown_suffix_is_unknown_format() {
    let registry = EncoderRegistry::builtin();
    for path in ["out", "out.", "out.xyz", "dir.png/out"] {
        let err = registry.for_path(Path::new(path)).unwrap_err();
        assert!(matches!(err, StampError::UnknownOutputFormat(_)), "{path}");
    }
    let err = registry.for_path(Path::new("out.xyz")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("xyz"));
    assert!(msg.contains("png"));
}

#[test]
fn suffixes_cover_common_formats() {
    let suffixes = EncoderRegistry::builtin().suffixes();
    for s in ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"] {
        assert!(suffixes.contains(&s), "{s}");
    }
}

#[test]
fn encode_png_to_memory_decodes_back() {
    let registry = EncoderRegistry::builtin();
    let encoder = registry.lookup("png").unwrap();
    let mut buf = Cursor::new(Vec::new());
    encoder.encode(&gray_surface(), &mut buf).unwrap();

    let decoded = image::load_from_memory(buf.get_ref()).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (8, 6));
    assert_eq!(decoded.get_pixel(3, 3).0, [90, 90, 90, 255]);
}

#[test]
fn write_surface_jpeg_and_png() {
    let dir = unique_tmp_dir("write");
    let registry = EncoderRegistry::builtin();
    let surface = gray_surface();

    let jpeg = dir.join("out.jpeg");
    assert_eq!(registry.write_surface(&surface, &jpeg).unwrap(), "jpeg");
    assert_eq!(
        image::ImageReader::open(&jpeg)
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format(),
        Some(image::ImageFormat::Jpeg)
    );

    let png = dir.join("out.PNG");
    assert_eq!(registry.write_surface(&surface, &png).unwrap(), "png");
    let decoded = image::ImageReader::open(&png)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .decode()
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [90, 90, 90, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn write_into_missing_directory_is_unwritable() {
    let dir = unique_tmp_dir("unwritable");
    let path = dir.join("no_such_dir").join("out.png");

    let err = EncoderRegistry::builtin()
        .write_surface(&gray_surface(), &path)
        .unwrap_err();
    assert!(matches!(err, StampError::OutputUnwritable(_)));
    assert!(err.to_string().contains("out.png"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_format_does_not_create_a_file() {
    let dir = unique_tmp_dir("unknown");
    let path = dir.join("out.xyz");

    assert!(EncoderRegistry::builtin()
        .write_surface(&gray_surface(), &path)
        .is_err());
    assert!(!path.exists());

    std::fs::remove_dir_all(&dir).ok();
}
