// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Turns raw sentences into a TokenBatch. Tokenisation itself is
// delegated to the HuggingFace `tokenizers` crate; this store only
// decides where the tokenizer comes from and how batches are shaped:
//
//   • [CLS] sentence [SEP]
//   • right-padded with [PAD] (id 0) to the longest sentence
//   • truncated at max_seq_len
//
// Source of the tokenizer:
//   1. a tokenizer.json file (e.g. a pretrained BERT vocabulary)
//   2. otherwise a word-level vocabulary built from the input
//      sentences themselves, written as tokenizer JSON and loaded
//      back in memory
//
// Reference: Sennrich et al. (2016) BPE paper

use anyhow::{Context, Result};
use std::{collections::HashMap, path::Path, str::FromStr};
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy,
    Tokenizer, TruncationParams,
};

use crate::data::TokenBatch;

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;
pub const MASK_ID: u32 = 103;

/// First id handed to corpus words in a built vocabulary
const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
}

impl TokenizerStore {
    /// Load a tokenizer from a tokenizer.json file
    pub fn load(path: impl AsRef<Path>, max_seq_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;
        tracing::info!("Loaded tokenizer from '{}'", path.display());
        Self::configure(tokenizer, max_seq_len)
    }

    /// Load from `path` if given, otherwise build from the texts
    pub fn load_or_build(
        path:        Option<&Path>,
        texts:       &[String],
        max_seq_len: usize,
    ) -> Result<Self> {
        match path {
            Some(p) => Self::load(p, max_seq_len),
            None    => Self::build(texts, max_seq_len),
        }
    }

    /// Build a word-level tokenizer whose vocabulary is the words in `texts`
    pub fn build(texts: &[String], max_seq_len: usize) -> Result<Self> {
        let json = word_level_tokenizer_json(texts);
        let tokenizer = Tokenizer::from_str(&json.to_string())
            .map_err(|e| anyhow::anyhow!("Cannot build tokenizer: {e}"))?;
        tracing::info!(
            "Built word-level tokenizer with {} entries",
            tokenizer.get_vocab_size(true)
        );
        Self::configure(tokenizer, max_seq_len)
    }

    /// Attach batch padding and truncation settings
    fn configure(mut tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self> {
        tokenizer.with_padding(Some(PaddingParams {
            strategy:  PaddingStrategy::BatchLongest,
            direction: PaddingDirection::Right,
            pad_id:    PAD_ID,
            pad_token: "[PAD]".to_string(),
            ..Default::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Invalid truncation settings: {e}"))?;
        Ok(Self { tokenizer, max_seq_len })
    }

    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// Size of the id space the model's embedding table must cover.
    /// Ids are not contiguous ([CLS] is 101), so this is max id + 1.
    pub fn vocab_size(&self) -> usize {
        self.tokenizer
            .get_vocab(true)
            .values()
            .max()
            .map_or(0, |&id| id as usize + 1)
    }

    /// Tokenise sentences into a padded, validated batch
    pub fn encode_batch(&self, sentences: &[String]) -> Result<TokenBatch> {
        let inputs: Vec<&str> = sentences.iter().map(String::as_str).collect();
        let encodings = self
            .tokenizer
            .encode_batch(inputs, true)
            .map_err(|e| anyhow::anyhow!("Tokenisation failed: {e}"))?;

        let token_ids: Vec<Vec<u32>> = encodings.iter().map(|e| e.get_ids().to_vec()).collect();
        let attention_mask: Vec<Vec<u32>> = encodings
            .iter()
            .map(|e| e.get_attention_mask().to_vec())
            .collect();

        let batch = TokenBatch::new(token_ids, attention_mask)
            .context("Tokenizer produced a malformed batch")?;
        tracing::debug!(
            "Tokenised {} sentences to length {}",
            batch.batch_size(),
            batch.seq_len()
        );
        Ok(batch)
    }
}

/// Word-level tokenizer definition in HuggingFace JSON format.
/// Special tokens get fixed ids matching the BERT convention.
fn word_level_tokenizer_json(texts: &[String]) -> serde_json::Value {
    // ── Step 1: Collect words, most frequent first ────────────────────────────
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text.split_whitespace() {
            let w = word.to_lowercase();
            let w = w.trim_matches(|c: char| !c.is_alphanumeric());
            if !w.is_empty() {
                *freq.entry(w.to_string()).or_insert(0) += 1;
            }
        }
    }
    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    // Ties broken alphabetically so the same texts always give the same ids
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    // ── Step 2: Vocabulary ────────────────────────────────────────────────────
    let mut vocab = serde_json::json!({
        "[PAD]":  PAD_ID,
        "[UNK]":  UNK_ID,
        "[CLS]":  CLS_ID,
        "[SEP]":  SEP_ID,
        "[MASK]": MASK_ID,
    });
    for (i, (word, _)) in words.iter().enumerate() {
        vocab[word.as_str()] = serde_json::json!(FIRST_WORD_ID + i);
    }

    let special = |id: u32, content: &str| serde_json::json!({
        "id": id, "content": content, "single_word": false, "lstrip": false,
        "rstrip": false, "normalized": false, "special": true
    });

    // ── Step 3: Tokenizer JSON ────────────────────────────────────────────────
    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            special(PAD_ID, "[PAD]"),
            special(UNK_ID, "[UNK]"),
            special(CLS_ID, "[CLS]"),
            special(SEP_ID, "[SEP]"),
            special(MASK_ID, "[MASK]"),
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", SEP_ID],
            "cls": ["[CLS]", CLS_ID]
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    })
}
