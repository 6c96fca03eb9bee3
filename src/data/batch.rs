// ============================================================
// Layer 4 — Token Batch
// ============================================================
// A rectangular batch of already-tokenised sequences, plus the
// conversion into Burn tensors.
//
// How batching works here:
//   Input:  N sequences of token ids and N attention masks,
//           each right-padded to the same length L
//   Output: two Int tensors of shape [N, L]
//
//   We flatten all rows into one long Vec, then reshape:
//   [s1_t1, s1_t2, ..., s1_tL, s2_t1, ..., sN_tL] → [N, L]
//
// The reshape is only valid when every row has the same length,
// so `TokenBatch::new` checks that before anything reaches a
// tensor. Ragged input is a ShapeMismatch, never a panic.

use burn::prelude::*;

use crate::error::{EncoderError, Result};

// ─── TokenBatch ───────────────────────────────────────────────────────────────
/// Token ids and attention masks for one forward call.
/// 1 = real token, 0 = padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBatch {
    token_ids:      Vec<Vec<u32>>,
    attention_mask: Vec<Vec<u32>>,
    seq_len:        usize,
}

impl TokenBatch {
    /// Validate and wrap a batch.
    ///
    /// Rejected with ShapeMismatch:
    ///   - empty batch or zero-length sequences
    ///   - different number of id rows and mask rows
    ///   - an item whose mask length differs from its id length
    ///   - rows of different lengths (L must be uniform)
    ///   - mask values other than 0 or 1
    pub fn new(token_ids: Vec<Vec<u32>>, attention_mask: Vec<Vec<u32>>) -> Result<Self> {
        if token_ids.is_empty() {
            return Err(EncoderError::shape("batch contains no sequences"));
        }
        if token_ids.len() != attention_mask.len() {
            return Err(EncoderError::shape(format!(
                "{} token id rows but {} attention mask rows",
                token_ids.len(),
                attention_mask.len()
            )));
        }

        let seq_len = token_ids[0].len();
        if seq_len == 0 {
            return Err(EncoderError::shape("sequences have length 0"));
        }

        for (i, (ids, mask)) in token_ids.iter().zip(&attention_mask).enumerate() {
            if ids.len() != mask.len() {
                return Err(EncoderError::shape(format!(
                    "item {i}: token_ids has length {} but attention_mask has length {}",
                    ids.len(),
                    mask.len()
                )));
            }
            if ids.len() != seq_len {
                return Err(EncoderError::shape(format!(
                    "item {i}: length {} differs from batch length {seq_len}",
                    ids.len()
                )));
            }
            if let Some(bad) = mask.iter().find(|&&m| m > 1) {
                return Err(EncoderError::shape(format!(
                    "item {i}: attention_mask value {bad} is not 0 or 1"
                )));
            }
        }

        Ok(Self { token_ids, attention_mask, seq_len })
    }

    pub fn batch_size(&self) -> usize { self.token_ids.len() }

    pub fn seq_len(&self) -> usize { self.seq_len }

    pub fn token_ids(&self) -> &[Vec<u32>] { &self.token_ids }

    pub fn attention_mask(&self) -> &[Vec<u32>] { &self.attention_mask }

    /// Number of real (unpadded) tokens in each sequence
    pub fn real_lengths(&self) -> Vec<usize> {
        self.attention_mask
            .iter()
            .map(|m| m.iter().filter(|&&x| x == 1).count())
            .collect()
    }

    /// Stack into `[batch, L]` Int tensors on the given device.
    /// Returns (token_ids, attention_mask).
    pub fn to_tensors<B: Backend>(
        &self,
        device: &B::Device,
    ) -> (Tensor<B, 2, Int>, Tensor<B, 2, Int>) {
        let shape = [self.batch_size(), self.seq_len];

        // ── Flatten rows (Burn Int tensors are built from i32/i64) ────────────
        let ids_flat: Vec<i32> = self
            .token_ids
            .iter()
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();
        let mask_flat: Vec<i32> = self
            .attention_mask
            .iter()
            .flat_map(|row| row.iter().map(|&x| x as i32))
            .collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let token_ids      = Tensor::<B, 2, Int>::from_data(TensorData::new(ids_flat, shape), device);
        let attention_mask = Tensor::<B, 2, Int>::from_data(TensorData::new(mask_flat, shape), device);

        (token_ids, attention_mask)
    }
}
