// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn module code.
//
// What's in this layer:
//
//   encoder.rs     — Encoder trait + the transformer backbone
//                    (hidden states + pooled summary)
//
//   pooler.rs      — cls / masked-mean sentence pooling
//
//   projection.rs  — optional H → D affine map (identity if equal)
//
//   heads.rs       — classification head (dropout + linear) and
//                    per-token labeling head (linear)
//
//   single_task.rs — Encoder → Pooler → Projection  (embed)
//
//   multi_task.rs  — Encoder once → both task heads (forward)
//
//   shapes.rs      — forward-time input validation
//
// Reference: Burn Book §3 (Building Blocks)
//            Devlin et al. (2019) BERT
//            Reimers & Gurevych (2019) Sentence-BERT

/// Encoder trait and transformer backbone
pub mod encoder;

/// Sentence pooling strategies
pub mod pooler;

/// Optional output projection
pub mod projection;

/// Task-specific output heads
pub mod heads;

/// Sentence-embedding model
pub mod single_task;

/// Shared-backbone multi-task model
pub mod multi_task;

/// Input shape validation
pub mod shapes;
