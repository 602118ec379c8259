//! Label resolution: which anchors get drawn, and with what text.

/// Parsing of `name=text` label arguments.
pub mod args;
/// Joins anchors with caller-supplied or self-named text.
pub mod resolve;
