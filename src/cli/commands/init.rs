//! `boltwise init` - scaffold a new catalog

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::core::project::Catalog;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    pub path: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&path).map_err(|e| miette::miette!("{}", e))?;
    let catalog = Catalog::init(&path).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized catalog at {}",
        style("✓").green(),
        style(catalog.root().display()).cyan()
    );
    println!("   starter records under {}", style("catalog/").dim());
    println!(
        "   try: {}",
        style("boltwise check DIN912-M3x12-A2-70 PLATE-M3-6H --stack 10 --load 1").yellow()
    );
    Ok(())
}
