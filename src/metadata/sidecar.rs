use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{StampError, StampResult},
    metadata::properties::parse_properties,
};

/// Suffix of the sidecar file stored next to each input image.
pub const SIDECAR_EXTENSION: &str = "properties";

/// A named, normalized point on the image.
///
/// `x` and `y` are conventionally in `[0, 1]` but are not clamped; values outside that range place
/// text partly or wholly off the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    /// Anchor name, unique within a sidecar.
    pub name: String,
    /// Horizontal position as a fraction of the image width.
    pub x: f64,
    /// Vertical position as a fraction of the image height.
    pub y: f64,
}

impl Anchor {
    /// Return `true` when both coordinates lie in `[0, 1]`.
    pub fn is_within_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Anchors parsed from one sidecar, keyed by name.
///
/// Iteration is in ascending name order; callers must not attach meaning to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnchorSet {
    anchors: BTreeMap<String, Anchor>,
}

impl AnchorSet {
    /// Build a set from anchors; a later anchor replaces an earlier one with the same name.
    pub fn from_anchors(anchors: impl IntoIterator<Item = Anchor>) -> Self {
        Self {
            anchors: anchors.into_iter().map(|a| (a.name.clone(), a)).collect(),
        }
    }

    /// Look up an anchor by name.
    pub fn get(&self, name: &str) -> Option<&Anchor> {
        self.anchors.get(name)
    }

    /// Iterate over all anchors.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.values()
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Return `true` when the sidecar defined no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Derive the sidecar path for an image: same directory, with everything from the last `.` of the
/// file name replaced by `.properties` (appended when the name has no `.`).
///
/// A dotfile such as `.cat` has an empty base name and maps to `.properties`.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = file_name
        .rfind('.')
        .map_or(file_name.as_str(), |dot| &file_name[..dot]);
    image_path.with_file_name(format!("{base}.{SIDECAR_EXTENSION}"))
}

/// Read and parse the sidecar that belongs to `image_path`.
#[tracing::instrument(level = "debug", skip_all, fields(image = %image_path.display()))]
pub fn load_sidecar(image_path: &Path) -> StampResult<AnchorSet> {
    let path = sidecar_path(image_path);
    if !path.exists() {
        return Err(StampError::missing_metadata(format!(
            "expected sidecar '{}' next to '{}'",
            path.display(),
            image_path.display()
        )));
    }

    let bytes =
        std::fs::read(&path).with_context(|| format!("read sidecar '{}'", path.display()))?;
    let anchors = parse_anchor_set(&bytes).map_err(|err| match err {
        StampError::MalformedAnchor(msg) => {
            StampError::malformed_anchor(format!("{msg} (in '{}')", path.display()))
        }
        other => other,
    })?;

    tracing::info!(sidecar = %path.display(), anchors = anchors.len(), "loaded sidecar");
    Ok(anchors)
}

/// Parse raw sidecar bytes into an [`AnchorSet`].
pub fn parse_anchor_set(bytes: &[u8]) -> StampResult<AnchorSet> {
    let props = parse_properties(bytes)?;
    let mut anchors = Vec::with_capacity(props.len());
    for (name, value) in props {
        if name.is_empty() {
            return Err(StampError::malformed_anchor(format!(
                "anchor with empty name (value '{value}')"
            )));
        }
        let (x, y) = parse_anchor_value(&name, &value)?;
        let anchor = Anchor { name, x, y };
        if !anchor.is_within_unit_square() {
            tracing::debug!(
                anchor = %anchor.name,
                x = anchor.x,
                y = anchor.y,
                "anchor lies outside the unit square"
            );
        }
        anchors.push(anchor);
    }
    Ok(AnchorSet::from_anchors(anchors))
}

/// Parse an `<x>,<y>` value; whitespace around either component is ignored.
pub fn parse_anchor_value(name: &str, value: &str) -> StampResult<(f64, f64)> {
    let parts: Vec<&str> = value.split(',').collect();
    let [x, y] = parts.as_slice() else {
        return Err(StampError::malformed_anchor(format!(
            "anchor '{name}' has value '{value}', expected '<x>,<y>'"
        )));
    };
    Ok((
        parse_coordinate(name, value, x)?,
        parse_coordinate(name, value, y)?,
    ))
}

fn parse_coordinate(name: &str, value: &str, component: &str) -> StampResult<f64> {
    component
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            StampError::malformed_anchor(format!(
                "anchor '{name}' has value '{value}': '{}' is not a finite number",
                component.trim()
            ))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/sidecar.rs"]
mod tests;
