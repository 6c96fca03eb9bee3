// ============================================================
// Layer 5 — Input Shape Checks
// ============================================================
// Forward-time validation shared by both top-level models.
// These are the only failures a forward call can produce.

use burn::prelude::*;

use crate::error::{EncoderError, Result};

/// Check that ids and mask describe the same `[batch, L]` grid and
/// that L fits the encoder's position table.
pub fn validate_inputs(
    ids_dims:    [usize; 2],
    mask_dims:   [usize; 2],
    max_seq_len: usize,
) -> Result<()> {
    let [batch, seq_len] = ids_dims;

    if ids_dims != mask_dims {
        return Err(EncoderError::shape(format!(
            "token_ids {ids_dims:?} and attention_mask {mask_dims:?} differ"
        )));
    }
    if batch == 0 || seq_len == 0 {
        return Err(EncoderError::shape(format!("empty input {ids_dims:?}")));
    }
    if seq_len > max_seq_len {
        return Err(EncoderError::shape(format!(
            "sequence length {seq_len} exceeds encoder max_seq_len {max_seq_len}"
        )));
    }
    Ok(())
}

/// Check that every token id indexes into the embedding table.
pub fn validate_token_ids<B: Backend>(token_ids: &Tensor<B, 2, Int>, vocab_size: usize) -> Result<()> {
    let min: i64 = token_ids.clone().min().into_scalar().elem();
    let max: i64 = token_ids.clone().max().into_scalar().elem();

    if min < 0 || max as usize >= vocab_size {
        return Err(EncoderError::shape(format!(
            "token ids span [{min}, {max}] but vocab_size is {vocab_size}"
        )));
    }
    Ok(())
}

/// Check that the mask holds only 0 (padding) and 1 (real token).
pub fn validate_attention_mask<B: Backend>(attention_mask: &Tensor<B, 2, Int>) -> Result<()> {
    let min: i64 = attention_mask.clone().min().into_scalar().elem();
    let max: i64 = attention_mask.clone().max().into_scalar().elem();

    if min < 0 || max > 1 {
        return Err(EncoderError::shape(format!(
            "attention_mask values span [{min}, {max}], expected only 0 and 1"
        )));
    }
    Ok(())
}

/// Full forward-time check used by `embed` and `forward`.
pub fn validate_batch<B: Backend>(
    token_ids:      &Tensor<B, 2, Int>,
    attention_mask: &Tensor<B, 2, Int>,
    max_seq_len:    usize,
    vocab_size:     usize,
) -> Result<()> {
    validate_inputs(token_ids.dims(), attention_mask.dims(), max_seq_len)?;
    validate_attention_mask(attention_mask)?;
    validate_token_ids(token_ids, vocab_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_matching_shapes_pass() {
        assert!(validate_inputs([2, 6], [2, 6], 16).is_ok());
    }

    #[test]
    fn test_sequence_length_mismatch() {
        let err = validate_inputs([2, 6], [2, 5], 16).unwrap_err();
        assert!(matches!(err, EncoderError::ShapeMismatch(_)));
    }

    #[test]
    fn test_batch_size_mismatch() {
        assert!(validate_inputs([3, 6], [2, 6], 16).is_err());
    }

    #[test]
    fn test_too_long_for_encoder() {
        let err = validate_inputs([1, 17], [1, 17], 16).unwrap_err();
        assert!(err.to_string().contains("max_seq_len"));
    }

    #[test]
    fn test_empty_input() {
        assert!(validate_inputs([0, 4], [0, 4], 16).is_err());
    }

    #[test]
    fn test_token_ids_out_of_vocab() {
        let device = Default::default();
        let ids = Tensor::<TestBackend, 2, Int>::from_ints([[1, 2, 50]], &device);
        assert!(validate_token_ids(&ids, 50).is_err());
        assert!(validate_token_ids(&ids, 51).is_ok());
    }

    #[test]
    fn test_attention_mask_must_be_binary() {
        let device = Default::default();
        let ok  = Tensor::<TestBackend, 2, Int>::from_ints([[1, 1, 0]], &device);
        let big = Tensor::<TestBackend, 2, Int>::from_ints([[5, 1, 0]], &device);
        let neg = Tensor::<TestBackend, 2, Int>::from_ints([[1, 1, -3]], &device);

        assert!(validate_attention_mask(&ok).is_ok());
        assert!(matches!(validate_attention_mask(&big), Err(EncoderError::ShapeMismatch(_))));
        assert!(validate_attention_mask(&neg).is_err());
    }

    #[test]
    fn test_validate_batch_checks_mask_values() {
        let device = Default::default();
        let ids  = Tensor::<TestBackend, 2, Int>::from_ints([[2, 5, 9]], &device);
        let mask = Tensor::<TestBackend, 2, Int>::from_ints([[5, 1, -3]], &device);
        assert!(validate_batch(&ids, &mask, 16, 64).is_err());
    }
}
