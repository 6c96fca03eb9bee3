// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the choices a caller makes
// when building or running a model.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust enums and their parsing rules

/// Sentence pooling strategy ("cls" / "mean")
pub mod pooling;

/// Training vs inference flag read at forward time
pub mod run_mode;

pub use pooling::PoolingStrategy;
pub use run_mode::RunMode;
