//! `boltwise part` - part specification catalog

use clap::Subcommand;
use miette::{bail, IntoDiagnostic, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::commands::open_repository;
use crate::cli::helpers::fmt_decimal;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// List part specifications
    List(ListArgs),

    /// Show one part specification
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in ids
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Part specification id
    pub id: String,
}

#[derive(Tabled)]
struct PartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "THREAD")]
    thread: String,
    #[tabled(rename = "LENGTH")]
    length: String,
    #[tabled(rename = "GRADE")]
    grade: String,
    #[tabled(rename = "PROOF kN")]
    proof: String,
}

pub fn run(cmd: PartCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartCommands::List(args) => run_list(args, global),
        PartCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let mut parts: Vec<_> = repo
        .parts()
        .filter(|p| {
            args.category
                .as_ref()
                .is_none_or(|c| p.category.eq_ignore_ascii_case(c))
        })
        .filter(|p| {
            args.search
                .as_ref()
                .is_none_or(|s| p.id.to_lowercase().contains(&s.to_lowercase()))
        })
        .collect();
    if let Some(limit) = args.limit {
        parts.truncate(limit);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&parts).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&parts).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for part in &parts {
                println!("{}", part.id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if parts.is_empty() {
                println!("No parts found.");
                return Ok(());
            }
            let rows: Vec<PartRow> = parts
                .iter()
                .map(|p| PartRow {
                    id: p.id.clone(),
                    category: p.category.clone(),
                    thread: p.thread.clone().unwrap_or_else(|| "-".to_string()),
                    length: fmt_decimal(p.length),
                    grade: p.material_grade.clone(),
                    proof: fmt_decimal(p.proof_load_kn),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;
    let Ok(part) = repo.get_part(&args.id) else {
        bail!("no part specification matching '{}'", args.id);
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(part).into_diagnostic()?);
        }
        _ => {
            print!("{}", serde_yml::to_string(part).into_diagnostic()?);
        }
    }
    Ok(())
}
