//! `boltwise subs` - rank substitute parts for a target

use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::commands::open_repository;
use crate::cli::helpers::fmt_decimal;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::engine::substitution::{find_substitutes, SubstitutionWeights};

#[derive(clap::Args, Debug)]
pub struct SubsArgs {
    /// Target part id (the failed or unavailable part)
    pub target: String,

    /// Candidate pool (default: every other part in the catalog)
    pub pool: Vec<String>,

    /// Weight on the dimensional match score
    #[arg(long, default_value = "0.5")]
    pub dim_weight: Decimal,

    /// Weight on the strength match score
    #[arg(long, default_value = "0.5")]
    pub strength_weight: Decimal,

    /// Show only the top N candidates
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "PART")]
    part: String,
    #[tabled(rename = "OVERALL")]
    overall: String,
    #[tabled(rename = "DIM")]
    dimensional: String,
    #[tabled(rename = "STRENGTH")]
    strength: String,
    #[tabled(rename = "MOD")]
    requires_modification: String,
    #[tabled(rename = "HISTORY")]
    history: String,
}

pub fn run(args: SubsArgs, global: &GlobalOpts) -> Result<()> {
    let (repo, _) = open_repository(global)?;

    let pool: Vec<String> = if args.pool.is_empty() {
        repo.parts()
            .map(|p| p.id.clone())
            .filter(|id| *id != args.target)
            .collect()
    } else {
        args.pool.clone()
    };

    let weights = SubstitutionWeights {
        dimensional: args.dim_weight,
        strength: args.strength_weight,
    };
    let mut ranked = find_substitutes(&repo, &args.target, &pool, &weights)
        .map_err(|e| miette::miette!("{}", e))?;
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ranked).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&ranked).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for candidate in &ranked {
                println!("{}", candidate.part_id);
            }
        }
        OutputFormat::Auto | OutputFormat::Table => {
            if ranked.is_empty() {
                println!("No candidates scored.");
                return Ok(());
            }
            let rows: Vec<CandidateRow> = ranked
                .iter()
                .map(|c| CandidateRow {
                    part: c.part_id.clone(),
                    overall: fmt_decimal(c.overall),
                    dimensional: fmt_decimal(c.dimensional_match),
                    strength: fmt_decimal(c.strength_match),
                    requires_modification: if c.requires_modification {
                        "yes".to_string()
                    } else {
                        "no".to_string()
                    },
                    history: c
                        .history
                        .and_then(|h| h.success_rate())
                        .map(fmt_decimal)
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_weights_are_even() {
        let weights = SubstitutionWeights::default();
        assert_eq!(weights.dimensional, dec!(0.5));
        assert_eq!(weights.strength, dec!(0.5));
    }
}
