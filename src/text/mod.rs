//! Text: embedded font loading, measurement, and label block placement.

/// Embedded font assets and the Parley-backed layout engine.
pub mod font;
/// Block layout arithmetic and the painter seam.
pub mod layout;
