// ============================================================
// Error Taxonomy
// ============================================================
// Every failure the model layer can report. Construction-time
// problems (bad pooling strategy, missing encoder capability,
// zero-sized heads) surface from `init`; forward-time failures
// are limited to malformed input batches.
//
// Nothing here is retried or recovered internally — callers
// get the error as soon as it is detected.

use thiserror::Error;

/// Result alias used across the library layers.
pub type Result<T> = std::result::Result<T, EncoderError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncoderError {
    /// The pooling strategy string is not one of the known strategies.
    #[error("invalid pooling strategy '{0}': choose from [\"cls\", \"mean\"]")]
    InvalidPoolingStrategy(String),

    /// The strategy needs something the configured encoder does not expose.
    #[error("pooling strategy '{strategy}' is unsupported: {reason}")]
    UnsupportedPooling { strategy: String, reason: String },

    /// Input tensors disagree with each other or with configured dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl EncoderError {
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
