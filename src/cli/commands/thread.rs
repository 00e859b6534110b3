//! `boltwise thread` - thread specification catalog

use clap::Subcommand;
use miette::{bail, IntoDiagnostic, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::commands::open_repository;
use crate::cli::helpers::fmt_decimal;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ThreadCommands {
    /// List thread specifications
    List(ListArgs),

    /// Show one thread specification
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in ids
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Thread specification id
    pub id: String,
}

#[derive(Tabled)]
struct ThreadRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "GENDER")]
    gender: String,
    #[tabled(rename = "DIA")]
    diameter: String,
    #[tabled(rename = "PITCH")]
    pitch: String,
    #[tabled(rename = "CLASS")]
    class: String,
    #[tabled(rename = "HAND")]
    handedness: String,
}

pub fn run(cmd: ThreadCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ThreadCommands::List(args) => run_list(args, global),
        ThreadCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let mut threads: Vec<_> = repo
        .threads()
        .filter(|t| {
            args.search
                .as_ref()
                .is_none_or(|s| t.id.to_lowercase().contains(&s.to_lowercase()))
        })
        .collect();
    if let Some(limit) = args.limit {
        threads.truncate(limit);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&threads).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&threads).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for thread in &threads {
                println!("{}", thread.id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if threads.is_empty() {
                println!("No threads found.");
                return Ok(());
            }
            let rows: Vec<ThreadRow> = threads
                .iter()
                .map(|t| ThreadRow {
                    id: t.id.clone(),
                    gender: t.gender.to_string(),
                    diameter: fmt_decimal(t.nominal_diameter),
                    pitch: fmt_decimal(t.pitch),
                    class: t.tolerance_class.clone(),
                    handedness: t.handedness.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;
    let Ok(thread) = repo.get_thread(&args.id) else {
        bail!("no thread specification matching '{}'", args.id);
    };

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(thread).into_diagnostic()?);
        }
        _ => {
            print!("{}", serde_yml::to_string(thread).into_diagnostic()?);
        }
    }
    Ok(())
}
