// ============================================================
// Layer 3 — Pooling Strategy
// ============================================================
// How per-token hidden states collapse into one sentence vector.
//
//   "cls"  → the encoder's own summary vector, untouched
//   "mean" → masked average over the real (non-padding) tokens
//
// Parsing happens when a model is built, so an unknown name
// fails before any forward pass is attempted.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::EncoderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolingStrategy {
    /// Use the encoder's pooled summary (first-token representation)
    Cls,
    /// Attention-mask weighted mean of the token hidden states
    Mean,
}

impl PoolingStrategy {
    pub const VALID: [&'static str; 2] = ["cls", "mean"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolingStrategy::Cls  => "cls",
            PoolingStrategy::Mean => "mean",
        }
    }

    /// True when the strategy reads the encoder's pooled summary
    pub fn needs_pooled_summary(&self) -> bool {
        matches!(self, PoolingStrategy::Cls)
    }
}

impl FromStr for PoolingStrategy {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cls"  => Ok(PoolingStrategy::Cls),
            "mean" => Ok(PoolingStrategy::Mean),
            other  => Err(EncoderError::InvalidPoolingStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for PoolingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
