// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `embed` and `multitask`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{
    embed_use_case::EmbedConfig,
    inputs::InputConfig,
    multitask_use_case::MultiTaskConfig,
};

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute one fixed-length embedding per sentence
    Embed(EmbedArgs),

    /// Run sentence classification and token labeling from one encoder pass
    Multitask(MultiTaskArgs),
}

/// Arguments shared by both commands
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Sentence to encode (repeat the flag for a batch)
    #[arg(long = "sentence", short = 's', required = true)]
    pub sentences: Vec<String>,

    /// HuggingFace tokenizer.json; a word-level vocabulary is built
    /// from the sentences when omitted
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Encoder architecture as JSON; a small default encoder is
    /// used when omitted
    #[arg(long)]
    pub config: Option<String>,

    /// Write the encoder architecture used for this run as JSON
    #[arg(long)]
    pub save_config: Option<String>,

    /// Truncate tokenised sentences beyond this many tokens
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,
}

impl From<InputArgs> for InputConfig {
    fn from(a: InputArgs) -> Self {
        InputConfig {
            sentences:      a.sentences,
            tokenizer_path: a.tokenizer,
            config_path:    a.config,
            save_config:    a.save_config,
            max_seq_len:    a.max_seq_len,
        }
    }
}

/// All arguments for the `embed` command
#[derive(Args, Debug)]
pub struct EmbedArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Pooling strategy: "cls" (encoder summary) or "mean" (masked average)
    #[arg(long, default_value = "cls")]
    pub pooling: String,

    /// Embedding size; defaults to the encoder hidden size (no projection)
    #[arg(long)]
    pub output_dim: Option<usize>,

    /// Print every embedding as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Convert CLI EmbedArgs into the application-layer EmbedConfig.
/// The application layer never sees clap types.
impl From<EmbedArgs> for EmbedConfig {
    fn from(a: EmbedArgs) -> Self {
        EmbedConfig {
            inputs:     a.inputs.into(),
            pooling:    a.pooling,
            output_dim: a.output_dim,
        }
    }
}

/// All arguments for the `multitask` command
#[derive(Args, Debug)]
pub struct MultiTaskArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Number of sentence-level classes (task A)
    #[arg(long, default_value_t = 3)]
    pub num_classes: usize,

    /// Number of token-level labels (task B)
    #[arg(long, default_value_t = 5)]
    pub num_labels: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<MultiTaskArgs> for MultiTaskConfig {
    fn from(a: MultiTaskArgs) -> Self {
        MultiTaskConfig {
            inputs:      a.inputs.into(),
            num_classes: a.num_classes,
            num_labels:  a.num_labels,
        }
    }
}
