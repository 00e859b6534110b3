//! `boltwise check` - evaluate compatibility of two parts

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{open_repository, ContextArgs};
use crate::cli::output::print_result;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::orchestrator::evaluate_compatibility;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// First part id
    pub part_a: String,

    /// Second part id
    pub part_b: String,

    #[command(flatten)]
    pub context: ContextArgs,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let part_a = repo
        .get_part(&args.part_a)
        .map_err(|e| miette::miette!("{}", e))?;
    let part_b = repo
        .get_part(&args.part_b)
        .map_err(|e| miette::miette!("{}", e))?;
    let ctx = args.context.build(&part_a.material, &part_b.material)?;

    let result = evaluate_compatibility(&repo, &args.part_a, &args.part_b, &ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&result).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", result.aggregate);
        }
        OutputFormat::Auto | OutputFormat::Table => {
            print_result(&result);
            if !global.quiet && !result.warnings.is_empty() {
                println!();
                println!("{}", style("warnings:").bold());
                for warning in &result.warnings {
                    println!("  - {}", warning);
                }
            }
        }
    }

    // Let shell pipelines gate on feasibility
    if result.is_blocked() {
        std::process::exit(2);
    }
    Ok(())
}
