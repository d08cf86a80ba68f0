/// Convenience result type used across Segue.
pub type SegueResult<T> = Result<T, SegueError>;

/// Top-level error taxonomy used by engine APIs.
///
/// None of these are fatal: callers degrade to "no-op + reported condition" and keep
/// whatever consistent state existed before the call.
#[derive(thiserror::Error, Debug)]
pub enum SegueError {
    /// No project store could be located (recovered by queuing and retrying).
    #[error("project store unavailable")]
    Unavailable,

    /// A transition type id did not resolve in the catalog.
    #[error("unknown transition type '{0}'")]
    UnknownType(String),

    /// A preset name did not resolve in the catalog.
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    /// The clip has no following clip in its track to transition into.
    #[error("clip '{0}' has no following clip in its track")]
    NoSuccessor(String),

    /// Invalid user-provided or project data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SegueError {
    /// Build a [`SegueError::UnknownType`] value.
    pub fn unknown_type(type_id: impl Into<String>) -> Self {
        Self::UnknownType(type_id.into())
    }

    /// Build a [`SegueError::NoSuccessor`] value.
    pub fn no_successor(clip_id: impl Into<String>) -> Self {
        Self::NoSuccessor(clip_id.into())
    }

    /// Build a [`SegueError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SegueError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for [`SegueError::Unavailable`], the one condition callers retry.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
