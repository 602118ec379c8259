//! Sidecar metadata: the property-file reader and the anchor set built from it.

/// ISO-8859-1 property-file reader.
pub mod properties;
/// Sidecar location and anchor parsing.
pub mod sidecar;
