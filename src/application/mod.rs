// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (embedding sentences or running both tasks).
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Tokenizer + encoder config shared by both workflows
pub mod inputs;

// The sentence-embedding workflow
pub mod embed_use_case;

// The shared-encoder multi-task workflow
pub mod multitask_use_case;
