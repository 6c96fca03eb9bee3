// ============================================================
// Layer 6 — Model Config Store
// ============================================================
// Reads and writes the encoder architecture as JSON so a run
// can be reproduced with the same dimensions:
//
//   {
//     "vocab_size": 30522, "max_seq_len": 128, "hidden_size": 128,
//     "num_heads": 4, "num_layers": 2, "d_ff": 512,
//     "dropout": 0.0, "pooler": true
//   }
//
// Only the architecture is stored — weights are never persisted.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::ml::encoder::TransformerEncoderConfig;

pub struct ModelConfigStore {
    path: PathBuf,
}

impl ModelConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the encoder configuration as pretty JSON
    pub fn save(&self, cfg: &TransformerEncoderConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;
        tracing::info!("Saved encoder config to '{}'", self.path.display());
        Ok(())
    }

    /// Read the encoder configuration back and check its dimensions
    pub fn load(&self) -> Result<TransformerEncoderConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;
        let cfg: TransformerEncoderConfig = serde_json::from_str(&json)
            .with_context(|| format!("Malformed encoder config in '{}'", self.path.display()))?;
        cfg.validate()?;
        tracing::info!("Loaded encoder config from '{}'", self.path.display());
        Ok(cfg)
    }
}
