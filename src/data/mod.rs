// ============================================================
// Layer 4 — Data
// ============================================================
// Everything between "token ids from the tokenizer" and
// "Int tensors on a device".
//
//   tokenizer output (Vec<Vec<u32>> ids + masks)
//       │
//       ▼
//   TokenBatch        → validates the rectangular batch contract
//       │
//       ▼
//   to_tensors()      → [batch, L] Int tensors for the model

/// Validated token batch and its tensor conversion
pub mod batch;

pub use batch::TokenBatch;
