// ============================================================
// Layer 2 — Shared Input Preparation
// ============================================================
// Both use cases start the same way:
//
//   Step 1: Pick the encoder architecture   (config file or defaults)
//   Step 2: Load / build the tokenizer      (Layer 6 - infra)
//   Step 3: Tokenise into a TokenBatch      (Layer 4 - data)
//   Step 4: Optionally write the architecture back out (Layer 6 - infra)
//
// When no config file is given the encoder's vocabulary is sized
// to the tokenizer, so every produced id has an embedding row.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::TokenBatch;
use crate::infra::{model_config::ModelConfigStore, tokenizer_store::TokenizerStore};
use crate::ml::encoder::TransformerEncoderConfig;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;
#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

/// Where the inputs and encoder architecture come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub sentences:      Vec<String>,
    pub tokenizer_path: Option<String>,
    pub config_path:    Option<String>,
    /// Where to write the resolved encoder architecture, if anywhere
    pub save_config:    Option<String>,
    pub max_seq_len:    usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sentences:      Vec::new(),
            tokenizer_path: None,
            config_path:    None,
            save_config:    None,
            max_seq_len:    128,
        }
    }
}

/// Tokenised sentences plus the encoder config they were sized for
pub struct PreparedInputs {
    pub batch:   TokenBatch,
    pub encoder: TransformerEncoderConfig,
}

pub fn prepare_inputs(cfg: &InputConfig) -> Result<PreparedInputs> {
    ensure!(!cfg.sentences.is_empty(), "At least one sentence is required");

    // ── Step 1: Encoder architecture ──────────────────────────────────────────
    let file_config = cfg
        .config_path
        .as_deref()
        .map(|p| ModelConfigStore::new(p).load())
        .transpose()?;

    let max_seq_len = file_config
        .as_ref()
        .map_or(cfg.max_seq_len, |e| e.max_seq_len.min(cfg.max_seq_len));

    // ── Step 2: Tokenizer ─────────────────────────────────────────────────────
    let store = TokenizerStore::load_or_build(
        cfg.tokenizer_path.as_deref().map(Path::new),
        &cfg.sentences,
        max_seq_len,
    )?;

    let encoder = match file_config {
        Some(e) => {
            ensure!(
                store.vocab_size() <= e.vocab_size,
                "Tokenizer ids reach {} but the encoder vocab_size is {}",
                store.vocab_size(),
                e.vocab_size
            );
            e
        }
        None => {
            let mut e = TransformerEncoderConfig::small(store.vocab_size());
            e.max_seq_len = max_seq_len;
            e
        }
    };

    // ── Step 3: Tokenise ──────────────────────────────────────────────────────
    let batch = store.encode_batch(&cfg.sentences)?;
    tracing::info!(
        "Prepared {} sentences, padded length {}",
        batch.batch_size(),
        batch.seq_len()
    );

    // ── Step 4: Persist the architecture for reruns ───────────────────────────
    if let Some(path) = cfg.save_config.as_deref() {
        ModelConfigStore::new(path).save(&encoder)?;
    }

    Ok(PreparedInputs { batch, encoder })
}
