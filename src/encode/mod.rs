//! Output encoding: suffix-keyed encoder lookup and file writing.

/// Encoder registry keyed by filename suffix.
pub mod registry;
