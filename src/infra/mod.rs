// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Collaborators that sit outside the model itself:
//
//   tokenizer_store.rs — Sentences → TokenBatch
//                        Loads a tokenizer.json or builds a
//                        word-level vocabulary from the input,
//                        then pads and truncates batches.
//
//   model_config.rs    — Encoder architecture as JSON
//                        Lets a run pick its dimensions from a
//                        file instead of CLI flags.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Tokenizer loading/building and batch encoding
pub mod tokenizer_store;

/// Encoder configuration JSON files
pub mod model_config;
