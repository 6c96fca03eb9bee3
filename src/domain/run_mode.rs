// ============================================================
// Layer 3 — Run Mode
// ============================================================
// Training-only behaviour (dropout in the classification head)
// is switched by a flag passed at call time. The module graph
// is the same in both modes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Dropout active (only takes effect on an autodiff backend)
    Training,
    /// Deterministic: every stochastic layer is bypassed
    #[default]
    Inference,
}

impl RunMode {
    pub fn is_training(&self) -> bool {
        matches!(self, RunMode::Training)
    }
}
