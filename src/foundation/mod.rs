//! Error taxonomy and pixel helpers shared by every stage.

/// Premultiplied RGBA8 compositing.
pub mod blend;
/// Error and result types.
pub mod error;
