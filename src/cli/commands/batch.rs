//! `boltwise batch` - evaluate many part pairs in parallel

use std::path::PathBuf;

use console::style;
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::commands::{load_yaml_file, open_repository, ContextArgs};
use crate::cli::helpers::truncate_str;
use crate::cli::output::classification_badge;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::orchestrator::{evaluate_batch, BatchOutcome, BatchPair, CancellationToken};
use crate::engine::verdict::Classification;

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// YAML file listing part pairs ([{part_a, part_b}, ...])
    pub pairs: PathBuf,

    #[command(flatten)]
    pub context: ContextArgs,
}

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let pairs: Vec<BatchPair> = load_yaml_file(&args.pairs)?;
    if pairs.is_empty() {
        bail!("no pairs in {}", args.pairs.display());
    }
    // One context is shared across the batch, so the surface materials
    // cannot be defaulted per pair
    let (Some(material_a), Some(material_b)) =
        (&args.context.material_a, &args.context.material_b)
    else {
        bail!("batch requires --material-a and --material-b");
    };
    let ctx = args.context.build(material_a, material_b)?;

    let items = evaluate_batch(&repo, &pairs, &ctx, &CancellationToken::new());

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&items).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let mut counts = [0usize; 3];
    let mut failures = 0usize;
    for item in &items {
        let pair = format!(
            "{} <-> {}",
            truncate_str(&item.part_a, 28),
            truncate_str(&item.part_b, 28)
        );
        match &item.outcome {
            BatchOutcome::Completed(result) => {
                counts[match result.aggregate {
                    Classification::Optimal => 0,
                    Classification::Caution => 1,
                    Classification::Blocked => 2,
                }] += 1;
                println!("{} {}", classification_badge(result.aggregate), pair);
            }
            BatchOutcome::Failed(err) => {
                failures += 1;
                println!("{} {} ({})", style("ERROR").red().bold(), pair, err);
            }
            BatchOutcome::Cancelled => {
                println!("{} {}", style("CANCELLED").dim(), pair);
            }
        }
    }

    if !global.quiet {
        println!();
        println!(
            "{} {} optimal, {} caution, {} blocked, {} error(s)",
            style("Done:").bold(),
            style(counts[0]).green(),
            style(counts[1]).yellow(),
            style(counts[2]).red(),
            failures
        );
    }
    Ok(())
}
