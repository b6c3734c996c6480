/// Convenience result type used throughout captionfx.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Error taxonomy for caption compositing.
///
/// Configuration errors (`InvalidColor`, `InvalidDuration`, `Validation`) are raised while the job
/// is being built, before any frame is read. I/O errors (`SourceOpen`, `OutputWrite`) abort the
/// whole run; nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// A color spec is neither a known name nor `#RRGGBB`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A caption duration is zero, negative, or not finite.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// The source video could not be opened, probed, or decoded.
    #[error("source open error: {0}")]
    SourceOpen(String),

    /// The output video could not be created or written.
    #[error("output write error: {0}")]
    OutputWrite(String),

    /// Any other invalid input (empty timeline, bad style value, size mismatch, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Text shaping or rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped foreign error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    /// Build an [`CaptionError::InvalidColor`].
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build an [`CaptionError::InvalidDuration`].
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    /// Build a [`CaptionError::SourceOpen`].
    pub fn source_open(msg: impl Into<String>) -> Self {
        Self::SourceOpen(msg.into())
    }

    /// Build an [`CaptionError::OutputWrite`].
    pub fn output_write(msg: impl Into<String>) -> Self {
        Self::OutputWrite(msg.into())
    }

    /// Build a [`CaptionError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CaptionError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
