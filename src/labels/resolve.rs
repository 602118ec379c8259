use std::collections::BTreeMap;

use crate::{
    foundation::error::{StampError, StampResult},
    metadata::sidecar::{Anchor, AnchorSet},
};

/// Where label text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelSource {
    /// Render every anchor's own name as its text.
    TestLabels,
    /// Render caller-supplied text for the anchors named in the map.
    Explicit(BTreeMap<String, String>),
}

/// An anchor paired with the text to draw at it.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBinding {
    /// The anchor the text block is centered on.
    pub anchor: Anchor,
    /// Text to draw; `\n` separates lines.
    pub text: String,
}

/// Join anchors with label text.
///
/// Bindings are returned in ascending anchor-name order. In explicit mode, anchors without an entry
/// contribute nothing and map keys without an anchor are ignored; a non-empty map that matches no
/// anchor yields an empty binding list, not an error.
pub fn resolve_labels(anchors: &AnchorSet, source: &LabelSource) -> StampResult<Vec<LabelBinding>> {
    match source {
        LabelSource::TestLabels => Ok(anchors
            .iter()
            .map(|anchor| LabelBinding {
                anchor: anchor.clone(),
                text: anchor.name.clone(),
            })
            .collect()),
        LabelSource::Explicit(labels) => {
            if labels.is_empty() {
                return Err(StampError::no_labels_requested(
                    "pass at least one -l name=text binding or --test-labels",
                ));
            }

            for name in labels.keys().filter(|name| anchors.get(name).is_none()) {
                tracing::debug!(label = %name, "ignoring label with no matching anchor");
            }

            Ok(anchors
                .iter()
                .filter_map(|anchor| {
                    labels.get(&anchor.name).map(|text| LabelBinding {
                        anchor: anchor.clone(),
                        text: text.clone(),
                    })
                })
                .collect())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/labels/resolve.rs"]
mod tests;
