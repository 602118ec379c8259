//! labelstamp draws text labels onto a raster image at named anchor points.
//!
//! Anchors come from a `.properties` sidecar stored next to the image (`cat.png` ->
//! `cat.properties`), one `name=x,y` entry per anchor with coordinates normalized to the image
//! size. A run:
//!
//! - decodes the image into an [`ImageSurface`]
//! - reads the sidecar into an [`AnchorSet`]
//! - pairs anchors with text ([`LabelSource`], [`resolve_labels`])
//! - centers each label's text block on its anchor and rasterizes it in black
//! - writes the result with the encoder picked by the output suffix ([`EncoderRegistry`])
//!
//! [`run`] performs all of it for a [`StampJob`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Output encoders.
pub mod encode;
/// Errors and pixel helpers.
pub mod foundation;
/// Label text resolution.
pub mod labels;
/// Sidecar metadata parsing.
pub mod metadata;
/// End-to-end labeling run.
pub mod pipeline;
/// Image surface and glyph rasterization.
pub mod render;
/// Fonts and text block layout.
pub mod text;

pub use crate::encode::registry::{Encoder, EncoderRegistry, PixelLayout};
pub use crate::foundation::error::{StampError, StampErrorKind, StampResult};
pub use crate::labels::args::{parse_label_arg, unescape_label_text};
pub use crate::labels::resolve::{LabelBinding, LabelSource, resolve_labels};
pub use crate::metadata::sidecar::{Anchor, AnchorSet, load_sidecar, sidecar_path};
pub use crate::pipeline::{
    DEFAULT_FONT_SIZE, DEFAULT_OUTPUT, StampJob, StampReport, run, stamp_labels,
};
pub use crate::render::cpu::GlyphCanvas;
pub use crate::render::surface::ImageSurface;
pub use crate::text::font::{DEFAULT_FONT, LoadedFont, TextLayoutEngine};
pub use crate::text::layout::{PlacedLine, TextBlock, TextPainter};
