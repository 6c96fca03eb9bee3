// ============================================================
// Layer 5 — Multi-Task Encoder
// ============================================================
// One encoder pass, two task heads:
//
//                  ┌─► ClassificationHead(pooled_summary)  → task A [batch, C]
//   Encoder ───────┤
//   (called once)  └─► TokenLabelingHead(hidden_states)    → task B [batch, L, K]
//
// Both heads read the same EncoderOutput and never touch each
// other. The two logit tensors come back together in one
// MultiTaskOutput, or not at all.
//
// Task B covers every position, padding included. Consumers mask
// with the attention mask before loss or metrics;
// `task_b_predictions` does that for argmax decoding.

use burn::prelude::*;

use crate::data::TokenBatch;
use crate::domain::RunMode;
use crate::error::{self, EncoderError};
use crate::ml::{
    encoder::{Encoder, TransformerEncoder, TransformerEncoderConfig},
    heads::{
        ClassificationHead, ClassificationHeadConfig,
        TokenLabelingHead, TokenLabelingHeadConfig,
    },
    shapes,
};

/// Label written into task-B predictions at padding positions
pub const PADDING_LABEL: i64 = -1;

#[derive(Config, Debug)]
pub struct MultiTaskEncoderConfig {
    pub encoder:            TransformerEncoderConfig,
    /// C — sentence-level classes (task A)
    pub num_classes_task_a: usize,
    /// K — token-level labels (task B)
    pub num_labels_task_b:  usize,
    #[config(default = 0.1)]
    pub classifier_dropout: f64,
}

impl MultiTaskEncoderConfig {
    pub fn init<B: Backend>(
        &self,
        device: &B::Device,
    ) -> error::Result<MultiTaskEncoder<B, TransformerEncoder<B>>> {
        self.encoder.validate()?;
        check_head_sizes(self.num_classes_task_a, self.num_labels_task_b)?;

        MultiTaskEncoder::from_encoder(
            self.encoder.init(device),
            self.num_classes_task_a,
            self.num_labels_task_b,
            self.classifier_dropout,
            device,
        )
    }
}

fn check_head_sizes(num_classes: usize, num_labels: usize) -> error::Result<()> {
    if num_classes == 0 || num_labels == 0 {
        return Err(EncoderError::shape(format!(
            "task heads need at least one output (classes={num_classes}, labels={num_labels})"
        )));
    }
    Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct MultiTaskOutput<B: Backend> {
    /// Sentence classification logits — shape: [batch, C]
    pub task_a_logits: Tensor<B, 2>,

    /// Token labeling logits — shape: [batch, L, K], padding not masked
    pub task_b_logits: Tensor<B, 3>,
}

impl<B: Backend> MultiTaskOutput<B> {
    /// Argmax class per sentence — shape: [batch]
    pub fn task_a_predictions(&self) -> Tensor<B, 1, Int> {
        let [batch_size, _] = self.task_a_logits.dims();
        self.task_a_logits.clone().argmax(1).reshape([batch_size])
    }

    /// Argmax label per token — shape: [batch, L].
    /// Positions where attention_mask == 0 hold PADDING_LABEL.
    pub fn task_b_predictions(
        &self,
        attention_mask: Tensor<B, 2, Int>,
    ) -> error::Result<Tensor<B, 2, Int>> {
        let [batch_size, seq_len, _] = self.task_b_logits.dims();
        if attention_mask.dims() != [batch_size, seq_len] {
            return Err(EncoderError::shape(format!(
                "attention_mask {:?} does not cover task B logits {:?}",
                attention_mask.dims(),
                self.task_b_logits.dims()
            )));
        }

        Ok(self
            .task_b_logits
            .clone()
            .argmax(2)
            .reshape([batch_size, seq_len])
            .mask_fill(attention_mask.equal_elem(0), PADDING_LABEL))
    }
}

// ─── MultiTaskEncoder ─────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct MultiTaskEncoder<B: Backend, E> {
    pub backbone:   E,
    pub classifier: ClassificationHead<B>,
    pub token_head: TokenLabelingHead<B>,
}

impl<B: Backend, E: Encoder<B>> MultiTaskEncoder<B, E> {
    /// Put both task heads on an already-built encoder, which must
    /// produce a pooled summary for task A.
    pub fn from_encoder(
        backbone:           E,
        num_classes:        usize,
        num_labels:         usize,
        classifier_dropout: f64,
        device:             &B::Device,
    ) -> error::Result<Self> {
        check_head_sizes(num_classes, num_labels)?;
        if !backbone.has_pooled_summary() {
            return Err(EncoderError::UnsupportedPooling {
                strategy: "cls".to_string(),
                reason:   "sentence classification reads the pooled summary, \
                           but the encoder does not produce one".to_string(),
            });
        }

        let hidden = backbone.hidden_size();
        let classifier = ClassificationHeadConfig::new(hidden, num_classes)
            .with_dropout(classifier_dropout)
            .init(device);
        let token_head = TokenLabelingHeadConfig::new(hidden, num_labels).init(device);

        tracing::info!(
            "MultiTaskEncoder: hidden={}, task A classes={}, task B labels={}",
            hidden, num_classes, num_labels
        );

        Ok(Self { backbone, classifier, token_head })
    }

    /// Deterministic forward pass (classifier dropout bypassed).
    pub fn forward(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> error::Result<MultiTaskOutput<B>> {
        self.forward_with_mode(token_ids, attention_mask, RunMode::Inference)
    }

    /// token_ids, attention_mask: [batch, L] → task A [batch, C] + task B [batch, L, K]
    pub fn forward_with_mode(
        &self,
        token_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        mode:           RunMode,
    ) -> error::Result<MultiTaskOutput<B>> {
        shapes::validate_batch(
            &token_ids,
            &attention_mask,
            self.backbone.max_seq_len(),
            self.backbone.vocab_size(),
        )?;

        // ── Shared encoder pass ───────────────────────────────────────────────
        let output = self.backbone.encode(token_ids, attention_mask);
        let pooled = output.pooled_summary.ok_or_else(|| EncoderError::UnsupportedPooling {
            strategy: "cls".to_string(),
            reason:   "encoder output carries no pooled summary".to_string(),
        })?;

        // ── Fan out to the task heads ─────────────────────────────────────────
        let task_a_logits = self.classifier.forward(pooled, mode);
        let task_b_logits = self.token_head.forward(output.hidden_states);

        tracing::debug!(
            "multitask forward ({:?}): task A {:?}, task B {:?}",
            mode, task_a_logits.dims(), task_b_logits.dims()
        );

        Ok(MultiTaskOutput { task_a_logits, task_b_logits })
    }

    /// Run a validated TokenBatch on the given device
    pub fn forward_batch(&self, batch: &TokenBatch, device: &B::Device) -> error::Result<MultiTaskOutput<B>> {
        let (token_ids, attention_mask) = batch.to_tensors::<B>(device);
        self.forward(token_ids, attention_mask)
    }

    pub fn num_classes(&self) -> usize {
        self.classifier.linear.weight.val().dims()[1]
    }

    pub fn num_labels(&self) -> usize {
        self.token_head.linear.weight.val().dims()[1]
    }
}
