//! `boltwise project` - validate a project's tooling against an inventory

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{load_yaml_file, open_repository};
use crate::cli::output::{classification_badge, print_installation};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::installation::{validate_project, OperationRequirement};
use crate::engine::verdict::Classification;
use crate::specs::tool::ToolInventoryItem;

#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    /// YAML file listing the operations and their tool requirements
    pub requirements: PathBuf,

    /// YAML file listing the available tools
    #[arg(long)]
    pub tools: PathBuf,
}

pub fn run(args: ProjectArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let requirements: Vec<OperationRequirement> = load_yaml_file(&args.requirements)?;
    let inventory: Vec<ToolInventoryItem> = load_yaml_file(&args.tools)?;

    let feasibility = validate_project(&repo, &inventory, &requirements);

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&feasibility).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&feasibility).into_diagnostic()?);
        }
        OutputFormat::Id => {
            println!("{}", feasibility.aggregate);
        }
        OutputFormat::Auto | OutputFormat::Table => {
            for outcome in &feasibility.operations {
                println!("{}", style(&outcome.operation).bold());
                print_installation(&outcome.report);
                println!();
            }
            println!(
                "{}: {}",
                style("feasibility").bold(),
                classification_badge(feasibility.aggregate)
            );
            if !feasibility.missing_tools.is_empty() {
                println!(
                    "{}: {}",
                    style("missing tools").bold(),
                    feasibility.missing_tools.join(", ")
                );
            }
            if !global.quiet {
                for warning in &feasibility.critical_warnings {
                    println!("  {} {}", style("!").red(), warning);
                }
            }
        }
    }

    if feasibility.aggregate == Classification::Blocked {
        std::process::exit(2);
    }
    Ok(())
}
