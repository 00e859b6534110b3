//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchArgs,
    check::CheckArgs,
    completions::CompletionsArgs,
    init::InitArgs,
    material::MaterialCommands,
    part::PartCommands,
    project::ProjectArgs,
    subs::SubsArgs,
    thread::ThreadCommands,
};

#[derive(Parser)]
#[command(name = "boltwise")]
#[command(author, version, about = "Fastener compatibility and substitution engine")]
#[command(
    long_about = "Evaluates whether two mating parts can be safely combined, ranks substitutes, and validates whole projects against a tool inventory. Spec records live in a plain-text YAML catalog."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Catalog root (default: walk up looking for boltwise.yaml)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new catalog with starter records
    Init(InitArgs),

    /// Evaluate compatibility of two parts (exits 2 when blocked)
    Check(CheckArgs),

    /// Evaluate a batch of part pairs in parallel
    Batch(BatchArgs),

    /// Rank substitute parts for a target
    Subs(SubsArgs),

    /// Validate a project's tool requirements against an inventory (exits 2 when blocked)
    Project(ProjectArgs),

    /// Thread specification catalog
    #[command(subcommand)]
    Thread(ThreadCommands),

    /// Part specification catalog
    #[command(subcommand)]
    Part(PartCommands),

    /// Material compatibility catalog
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled report for humans
    #[default]
    Auto,
    /// Plain table
    Table,
    /// YAML (full fidelity)
    Yaml,
    /// JSON (for programs)
    Json,
    /// Just ids, one per line
    Id,
}
