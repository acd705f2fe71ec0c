use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use archive_grid::content::{manifest, scanner};
use archive_grid::{BuildConfig, PathStyle};

/// Scan the content root and write the grid manifest
#[derive(Parser, Debug)]
#[command(name = "archive-grid", version)]
struct Cli {
    /// JSON config file (defaults to ./archive-grid.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content root holding the item-<N> directories
    #[arg(long)]
    source: Option<PathBuf>,

    /// Manifest output path
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write item paths relative to the site root
    #[arg(long)]
    relative: bool,

    /// Fail when any item has metadata errors
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Flags win over the config file
    fn apply(&self, config: &mut BuildConfig) {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(out) = &self.out {
            config.output = out.clone();
        }
        if self.relative {
            config.path_style = PathStyle::Relative;
        }
        if self.strict {
            config.strict = true;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .init();

    let mut config = BuildConfig::load(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config);

    println!("🔍 Scanning for items in {}...", config.source_dir.display());
    let outcome = scanner::scan(&config);
    println!("Found {} items", outcome.items.len());

    let errors = outcome.check_strict(config.strict)?;
    if errors > 0 {
        eprintln!("⚠️  {} item(s) have invalid metadata", errors);
    }

    let built = manifest::build(&outcome.items, &config);
    manifest::write(&built, &config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    println!("✅ Generated manifest: {}", config.output.display());
    println!("Grid dimensions: {}x{}", built.grid.columns, built.grid.rows);

    Ok(())
}
