//! `boltwise material` - material compatibility catalog

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::commands::open_repository;
use crate::cli::helpers::fmt_decimal;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum MaterialCommands {
    /// List material compatibility entries
    List(ListArgs),

    /// Show the entry for a material pair (explicit or defaulted)
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// First material id
    pub material_a: String,

    /// Second material id
    pub material_b: String,
}

#[derive(Tabled)]
struct MaterialRow {
    #[tabled(rename = "PAIR")]
    pair: String,
    #[tabled(rename = "GALVANIC")]
    galvanic: String,
    #[tabled(rename = "FACTOR")]
    factor: String,
    #[tabled(rename = "PREP")]
    prep: String,
}

pub fn run(cmd: MaterialCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MaterialCommands::List(args) => run_list(args, global),
        MaterialCommands::Show(args) => run_show(args, global),
    }
}

fn prep_summary(
    thread_locker: bool,
    anti_seize: bool,
    insert: bool,
) -> String {
    let mut needs = Vec::new();
    if thread_locker {
        needs.push("thread locker");
    }
    if anti_seize {
        needs.push("anti-seize");
    }
    if insert {
        needs.push("insert");
    }
    if needs.is_empty() {
        "-".to_string()
    } else {
        needs.join(", ")
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let mut entries: Vec<_> = repo.materials().collect();
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&entries).into_diagnostic()?);
        }
        _ => {
            if entries.is_empty() {
                println!("No material entries found.");
                return Ok(());
            }
            let rows: Vec<MaterialRow> = entries
                .iter()
                .map(|e| MaterialRow {
                    pair: format!("{}/{}", e.material_a, e.material_b),
                    galvanic: e.galvanic_risk.to_string(),
                    factor: fmt_decimal(e.torque_reduction_factor),
                    prep: prep_summary(
                        e.thread_locker_required,
                        e.anti_seize_required,
                        e.insert_required,
                    ),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;
    let (entry, defaulted) = repo.get_material_compatibility(&args.material_a, &args.material_b);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry).into_diagnostic()?);
        }
        _ => {
            if defaulted {
                println!(
                    "# no explicit entry for this pair; the medium-risk default applies"
                );
            }
            print!("{}", serde_yml::to_string(&entry).into_diagnostic()?);
        }
    }
    Ok(())
}
