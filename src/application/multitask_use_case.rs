// ============================================================
// Layer 2 — Multi-Task Use Case
// ============================================================
// Sentences in, both task outputs out, from one encoder pass:
//
//   Step 1: Prepare inputs                  (tokenizer + encoder config)
//   Step 2: Build the MultiTaskEncoder      (Layer 5 - ml)
//   Step 3: Forward once                    (Layer 5 - ml)
//   Step 4: Argmax decode both tasks, padding masked out of task B

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::application::inputs::{prepare_inputs, InferBackend, InputConfig};
use crate::ml::multi_task::MultiTaskEncoderConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTaskConfig {
    pub inputs:      InputConfig,
    pub num_classes: usize,
    pub num_labels:  usize,
}

impl Default for MultiTaskConfig {
    fn default() -> Self {
        Self {
            inputs:      InputConfig::default(),
            num_classes: 3,
            num_labels:  5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTaskReport {
    /// [batch, C]
    pub task_a_shape:       [usize; 2],
    /// [batch, L, K]
    pub task_b_shape:       [usize; 3],
    /// One class per sentence
    pub sentence_classes:   Vec<i64>,
    /// One label per real token; padding positions dropped
    pub token_labels:       Vec<Vec<i64>>,
}

pub struct MultiTaskUseCase {
    config: MultiTaskConfig,
}

impl MultiTaskUseCase {
    pub fn new(config: MultiTaskConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<MultiTaskReport> {
        let cfg = &self.config;
        let device = Default::default();

        // ── Step 1: Tokenise ──────────────────────────────────────────────────
        let prepared = prepare_inputs(&cfg.inputs)?;

        // ── Step 2: Build model ───────────────────────────────────────────────
        let model = MultiTaskEncoderConfig::new(prepared.encoder, cfg.num_classes, cfg.num_labels)
            .init::<InferBackend>(&device)?;

        // ── Step 3: One shared forward pass ───────────────────────────────────
        let output = model.forward_batch(&prepared.batch, &device)?;
        let task_a_shape = output.task_a_logits.dims();
        let task_b_shape = output.task_b_logits.dims();

        // ── Step 4: Decode ────────────────────────────────────────────────────
        let (_, mask) = prepared.batch.to_tensors::<InferBackend>(&device);
        let sentence_classes: Vec<i64> = output
            .task_a_predictions()
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read task A predictions: {e:?}"))?;
        let token_flat: Vec<i64> = output
            .task_b_predictions(mask)?
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read task B predictions: {e:?}"))?;

        let token_labels = token_flat
            .chunks(task_b_shape[1])
            .zip(prepared.batch.real_lengths())
            .map(|(row, len)| row[..len].to_vec())
            .collect();

        Ok(MultiTaskReport { task_a_shape, task_b_shape, sentence_classes, token_labels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sentences_three_classes_five_labels() {
        let cfg = MultiTaskConfig {
            inputs: InputConfig {
                sentences: vec![
                    "John lives in New York.".to_string(),
                    "I love using Transformers for NLP!".to_string(),
                ],
                max_seq_len: 32,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = MultiTaskUseCase::new(cfg).execute().unwrap();

        // [CLS] + 7 tokens + [SEP] for the longer sentence
        assert_eq!(report.task_a_shape, [2, 3]);
        assert_eq!(report.task_b_shape, [2, 9, 5]);
        assert_eq!(report.sentence_classes.len(), 2);
        assert_eq!(report.token_labels[0].len(), 8);
        assert_eq!(report.token_labels[1].len(), 9);
        assert!(report.token_labels.iter().flatten().all(|&l| (0..5).contains(&l)));
    }
}
