// ============================================================
// Layer 5 — Sentence Pooler
// ============================================================
// Reduces per-token hidden states to one vector per sequence.
//
//   cls:  pooled_summary, returned as-is
//   mean: Σ_i hidden[i] · mask[i] / max(Σ_i mask[i], ε)
//
// ε keeps the division finite for a sequence that is all
// padding: the numerator is zero there too, so the result is
// an exact zero vector rather than NaN.

use burn::prelude::*;

use crate::domain::PoolingStrategy;
use crate::error::{EncoderError, Result};
use crate::ml::encoder::{Encoder, EncoderOutput};

/// Lower bound on the real-token count in mean pooling
pub const MEAN_POOL_EPSILON: f32 = 1e-9;

/// Masked mean over the sequence axis.
///
/// hidden: [batch, L, H], attention_mask: [batch, L] → [batch, H]
pub fn mean_pool<B: Backend>(
    hidden:         Tensor<B, 3>,
    attention_mask: Tensor<B, 2, Int>,
) -> Result<Tensor<B, 2>> {
    let [batch_size, seq_len, hidden_size] = hidden.dims();
    if attention_mask.dims() != [batch_size, seq_len] {
        return Err(EncoderError::shape(format!(
            "attention_mask {:?} does not cover hidden states {:?}",
            attention_mask.dims(),
            hidden.dims()
        )));
    }

    // [batch, L] → [batch, L, 1] so it broadcasts across H
    let mask = attention_mask.float().reshape([batch_size, seq_len, 1]);

    let summed = (hidden * mask.clone())
        .sum_dim(1)
        .reshape([batch_size, hidden_size]);
    let counts = mask
        .sum_dim(1)
        .reshape([batch_size, 1])
        .clamp_min(MEAN_POOL_EPSILON);

    Ok(summed / counts)
}

// ─── SentencePooler ───────────────────────────────────────────────────────────
/// Strategy-bound pooler. Holds no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentencePooler {
    strategy: PoolingStrategy,
}

impl SentencePooler {
    /// Bind a strategy to an encoder, failing if the encoder cannot
    /// serve it (cls without a pooled summary).
    pub fn new<B: Backend, E: Encoder<B>>(strategy: PoolingStrategy, encoder: &E) -> Result<Self> {
        if strategy.needs_pooled_summary() && !encoder.has_pooled_summary() {
            return Err(EncoderError::UnsupportedPooling {
                strategy: strategy.to_string(),
                reason:   "the encoder does not produce a pooled summary".to_string(),
            });
        }
        Ok(Self { strategy })
    }

    pub fn strategy(&self) -> PoolingStrategy {
        self.strategy
    }

    /// output: encoder output for the batch, attention_mask: [batch, L]
    /// → sentence vectors [batch, H]
    pub fn pool<B: Backend>(
        &self,
        output:         &EncoderOutput<B>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Result<Tensor<B, 2>> {
        match self.strategy {
            PoolingStrategy::Cls => output.pooled_summary.clone().ok_or_else(|| {
                EncoderError::UnsupportedPooling {
                    strategy: self.strategy.to_string(),
                    reason:   "encoder output carries no pooled summary".to_string(),
                }
            }),
            PoolingStrategy::Mean => mean_pool(output.hidden_states.clone(), attention_mask),
        }
    }
}
