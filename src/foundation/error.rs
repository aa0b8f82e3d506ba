/// Result alias used across the crate.
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Coarse error taxonomy, used to decide how an error is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing caption, missing image or an invalid control value.
    InputValidation,
    /// Start while recording, or stop while idle.
    StateConflict,
    /// Rasterizing the preview region failed.
    Snapshot,
    /// The video encoder failed to start, accept a frame or finalize.
    Encode,
    /// Anything else (I/O, decode, ...).
    Other,
}

/// Errors produced by quotecast.
#[derive(thiserror::Error, Debug)]
pub enum QuoteError {
    #[error("validation error: caption text is empty")]
    EmptyInput,

    #[error("validation error: a background image is required")]
    MissingImage,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("state conflict: a recording is already in progress")]
    AlreadyRecording,

    #[error("state conflict: no recording in progress")]
    NotRecording,

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuoteError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Map this error onto the user-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::MissingImage | Self::Validation(_) => {
                ErrorKind::InputValidation
            }
            Self::AlreadyRecording | Self::NotRecording => ErrorKind::StateConflict,
            Self::Snapshot(_) => ErrorKind::Snapshot,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
