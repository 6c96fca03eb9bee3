// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `embed`     — sentence embeddings (cls or mean pooling)
//   2. `multitask` — classification + token labeling logits
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EmbedArgs, MultiTaskArgs};

/// Number of leading values shown per embedding in summary output
const PREVIEW_LEN: usize = 8;

#[derive(Parser, Debug)]
#[command(
    name = "sentence-heads",
    version,
    about = "Sentence embeddings and shared-encoder multi-task heads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Embed(args)     => run_embed(args),
            Commands::Multitask(args) => run_multitask(args),
        }
    }
}

fn run_embed(args: EmbedArgs) -> Result<()> {
    use crate::application::embed_use_case::EmbedUseCase;

    let json = args.json;
    let report = EmbedUseCase::new(args.into()).execute()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Embeddings shape: {:?} (pooling: {})", report.shape, report.pooling);
    if let Some(first) = report.embeddings.first() {
        let preview: Vec<String> = first.iter().take(PREVIEW_LEN).map(|v| format!("{v:.4}")).collect();
        println!("Sample embedding for first sentence: [{}, ...]", preview.join(", "));
    }
    Ok(())
}

fn run_multitask(args: MultiTaskArgs) -> Result<()> {
    use crate::application::multitask_use_case::MultiTaskUseCase;

    let json = args.json;
    let report = MultiTaskUseCase::new(args.into()).execute()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Task A logits (sentence classification): {:?}", report.task_a_shape);
    println!("Task B logits (token labeling):          {:?}", report.task_b_shape);
    for (i, (class, labels)) in report.sentence_classes.iter().zip(&report.token_labels).enumerate() {
        println!("  sentence {i}: class={class} labels={labels:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embed_args() {
        let cli = Cli::try_parse_from([
            "sentence-heads", "embed",
            "-s", "Hello world!", "--sentence", "Second one",
            "--pooling", "mean", "--output-dim", "64",
        ]).unwrap();

        match cli.command {
            Commands::Embed(args) => {
                assert_eq!(args.inputs.sentences.len(), 2);
                assert_eq!(args.pooling, "mean");
                assert_eq!(args.output_dim, Some(64));
                assert_eq!(args.inputs.max_seq_len, 128);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_multitask_defaults() {
        let cli = Cli::try_parse_from(["sentence-heads", "multitask", "-s", "John lives in New York."])
            .unwrap();

        match cli.command {
            Commands::Multitask(args) => {
                assert_eq!(args.num_classes, 3);
                assert_eq!(args.num_labels, 5);
                assert!(args.inputs.save_config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_save_config_reaches_input_config() {
        use crate::application::embed_use_case::EmbedConfig;

        let cli = Cli::try_parse_from([
            "sentence-heads", "embed", "-s", "Hello world!", "--save-config", "encoder.json",
        ]).unwrap();

        match cli.command {
            Commands::Embed(args) => {
                let cfg: EmbedConfig = args.into();
                assert_eq!(cfg.inputs.save_config.as_deref(), Some("encoder.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sentence_is_required() {
        assert!(Cli::try_parse_from(["sentence-heads", "embed"]).is_err());
    }
}
