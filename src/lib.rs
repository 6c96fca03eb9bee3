// ============================================================
// sentence-heads
// ============================================================
// Fixed-length sentence embeddings and shared-encoder multi-task
// heads on top of a transformer encoder, built with Burn.
//
// Layers (each only depends on the ones below it):
//
//   cli          Layer 1 — argument parsing, printing
//   application  Layer 2 — use cases (embed, multitask)
//   domain       Layer 3 — pooling strategy, run mode
//   data         Layer 4 — validated token batches → tensors
//   ml           Layer 5 — Burn modules
//   infra        Layer 6 — tokenizer and config files
//
// Library entry points:
//
//   SingleTaskEncoderConfig::new(encoder, output_dim, pooling).init(&device)?
//       .embed(token_ids, attention_mask)?          → [batch, D]
//
//   MultiTaskEncoderConfig::new(encoder, num_classes, num_labels).init(&device)?
//       .forward(token_ids, attention_mask)?        → [batch, C] + [batch, L, K]
//
// Both configs build the in-crate TransformerEncoder. Any other
// `Encoder` goes through SingleTaskEncoder::from_encoder or
// MultiTaskEncoder::from_encoder instead.

#![recursion_limit = "256"]

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ml;

pub use data::TokenBatch;
pub use domain::{PoolingStrategy, RunMode};
pub use error::{EncoderError, Result};
pub use ml::{
    encoder::{Encoder, EncoderOutput, TransformerEncoder, TransformerEncoderConfig},
    multi_task::{MultiTaskEncoder, MultiTaskEncoderConfig, MultiTaskOutput},
    pooler::{mean_pool, SentencePooler},
    projection::{ProjectionHead, ProjectionHeadConfig},
    single_task::{SingleTaskEncoder, SingleTaskEncoderConfig},
};
