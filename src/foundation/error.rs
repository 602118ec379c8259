/// Convenience result type used across labelstamp.
pub type StampResult<T> = Result<T, StampError>;

/// Top-level error taxonomy. Every variant is fatal to a run.
#[derive(thiserror::Error, Debug)]
pub enum StampError {
    /// Input path missing, unreadable, or not a decodable image.
    #[error("input image unreadable: {0}")]
    InputImageUnreadable(String),

    /// The sidecar `.properties` file next to the input does not exist.
    #[error("missing metadata: {0}")]
    MissingMetadata(String),

    /// A sidecar entry is not a valid `<x>,<y>` pair of real numbers.
    #[error("malformed anchor: {0}")]
    MalformedAnchor(String),

    /// Explicit label mode was selected without any `name=text` bindings.
    #[error("no labels requested: {0}")]
    NoLabelsRequested(String),

    /// The embedded font asset is missing or cannot be loaded.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// The output filename has no suffix or no encoder is registered for it.
    #[error("unknown output format: {0}")]
    UnknownOutputFormat(String),

    /// Encoding or writing the output file failed.
    #[error("output unwritable: {0}")]
    OutputUnwritable(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Discriminant of a [`StampError`], for matching without inspecting messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StampErrorKind {
    /// See [`StampError::InputImageUnreadable`].
    InputImageUnreadable,
    /// See [`StampError::MissingMetadata`].
    MissingMetadata,
    /// See [`StampError::MalformedAnchor`].
    MalformedAnchor,
    /// See [`StampError::NoLabelsRequested`].
    NoLabelsRequested,
    /// See [`StampError::FontUnavailable`].
    FontUnavailable,
    /// See [`StampError::UnknownOutputFormat`].
    UnknownOutputFormat,
    /// See [`StampError::OutputUnwritable`].
    OutputUnwritable,
    /// See [`StampError::Other`].
    Other,
}

impl StampError {
    /// Build a [`StampError::InputImageUnreadable`] value.
    pub fn input_image_unreadable(msg: impl Into<String>) -> Self {
        Self::InputImageUnreadable(msg.into())
    }

    /// Build a [`StampError::MissingMetadata`] value.
    pub fn missing_metadata(msg: impl Into<String>) -> Self {
        Self::MissingMetadata(msg.into())
    }

    /// Build a [`StampError::MalformedAnchor`] value.
    pub fn malformed_anchor(msg: impl Into<String>) -> Self {
        Self::MalformedAnchor(msg.into())
    }

    /// Build a [`StampError::NoLabelsRequested`] value.
    pub fn no_labels_requested(msg: impl Into<String>) -> Self {
        Self::NoLabelsRequested(msg.into())
    }

    /// Build a [`StampError::FontUnavailable`] value.
    pub fn font_unavailable(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`StampError::UnknownOutputFormat`] value.
    pub fn unknown_output_format(msg: impl Into<String>) -> Self {
        Self::UnknownOutputFormat(msg.into())
    }

    /// Build a [`StampError::OutputUnwritable`] value.
    pub fn output_unwritable(msg: impl Into<String>) -> Self {
        Self::OutputUnwritable(msg.into())
    }

    /// Return the kind of this error.
    pub fn kind(&self) -> StampErrorKind {
        match self {
            Self::InputImageUnreadable(_) => StampErrorKind::InputImageUnreadable,
            Self::MissingMetadata(_) => StampErrorKind::MissingMetadata,
            Self::MalformedAnchor(_) => StampErrorKind::MalformedAnchor,
            Self::NoLabelsRequested(_) => StampErrorKind::NoLabelsRequested,
            Self::FontUnavailable(_) => StampErrorKind::FontUnavailable,
            Self::UnknownOutputFormat(_) => StampErrorKind::UnknownOutputFormat,
            Self::OutputUnwritable(_) => StampErrorKind::OutputUnwritable,
            Self::Other(_) => StampErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
