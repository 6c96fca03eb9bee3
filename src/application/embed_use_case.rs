// ============================================================
// Layer 2 — Embed Use Case
// ============================================================
// Sentences in, sentence embeddings out:
//
//   Step 1: Prepare inputs                  (tokenizer + encoder config)
//   Step 2: Build the SingleTaskEncoder     (Layer 5 - ml)
//   Step 3: Embed the batch                 (Layer 5 - ml)
//   Step 4: Copy the tensor back to rows    (for printing / JSON)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::inputs::{prepare_inputs, InferBackend, InputConfig};
use crate::domain::PoolingStrategy;
use crate::ml::single_task::SingleTaskEncoderConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    pub inputs:     InputConfig,
    /// "cls" or "mean"
    pub pooling:    String,
    /// None keeps the encoder hidden size (no projection)
    pub output_dim: Option<usize>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            inputs:     InputConfig::default(),
            pooling:    "cls".to_string(),
            output_dim: None,
        }
    }
}

/// Embedding rows in sentence order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedReport {
    pub shape:      [usize; 2],
    pub pooling:    PoolingStrategy,
    pub embeddings: Vec<Vec<f32>>,
}

pub struct EmbedUseCase {
    config: EmbedConfig,
}

impl EmbedUseCase {
    pub fn new(config: EmbedConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<EmbedReport> {
        let cfg = &self.config;
        let device = Default::default();

        // ── Step 1: Tokenise ──────────────────────────────────────────────────
        let prepared = prepare_inputs(&cfg.inputs)?;
        let output_dim = cfg.output_dim.unwrap_or(prepared.encoder.hidden_size);

        // ── Step 2: Build model (fails fast on a bad pooling name) ────────────
        let model = SingleTaskEncoderConfig::new(prepared.encoder, output_dim, cfg.pooling.clone())
            .init::<InferBackend>(&device)?;

        // ── Step 3: Embed ─────────────────────────────────────────────────────
        let embeddings = model.embed_batch(&prepared.batch, &device)?;
        let shape = embeddings.dims();

        // ── Step 4: Tensor → rows ─────────────────────────────────────────────
        let flat: Vec<f32> = embeddings
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("{e:?}"))
            .context("Cannot read embeddings back from the device")?;
        let embeddings = flat.chunks(shape[1]).map(<[f32]>::to_vec).collect();

        Ok(EmbedReport { shape, pooling: model.strategy(), embeddings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncoderError;

    fn sentences() -> Vec<String> {
        vec![
            "Hello world!".to_string(),
            "Sentence Transformers provide powerful sentence embeddings.".to_string(),
            "Transformers are great for NLP tasks.".to_string(),
        ]
    }

    fn config(pooling: &str, output_dim: Option<usize>) -> EmbedConfig {
        EmbedConfig {
            inputs: InputConfig { sentences: sentences(), max_seq_len: 32, ..Default::default() },
            pooling: pooling.to_string(),
            output_dim,
        }
    }

    #[test]
    fn test_embed_three_sentences() {
        let report = EmbedUseCase::new(config("cls", None)).execute().unwrap();
        assert_eq!(report.shape, [3, 128]);
        assert_eq!(report.embeddings.len(), 3);
        assert!(report.embeddings.iter().all(|row| row.len() == 128));
    }

    #[test]
    fn test_mean_pooling_with_projection() {
        let report = EmbedUseCase::new(config("mean", Some(32))).execute().unwrap();
        assert_eq!(report.shape, [3, 32]);
        assert_eq!(report.pooling, PoolingStrategy::Mean);
        assert!(report.embeddings.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bad_pooling_surfaces_library_error() {
        let err = EmbedUseCase::new(config("max", None)).execute().unwrap_err();
        assert_eq!(
            err.downcast_ref::<EncoderError>(),
            Some(&EncoderError::InvalidPoolingStrategy("max".into()))
        );
    }

    #[test]
    fn test_report_json_names_the_strategy() {
        let report = EmbedUseCase::new(config("cls", Some(4))).execute().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pooling"], "cls");

        let back: EmbedReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.pooling, PoolingStrategy::Cls);
        assert_eq!(back.shape, [3, 4]);
    }
}
