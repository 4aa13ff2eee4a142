//! CLI tool for generating personalized certificate decks from a roster.

mod batch;

use anyhow::{Context, Result};
use batch::{Batch, BatchSummary};
use cert_core::{BatchConfig, RosterReader};
use cert_pptx::TemplateFiller;
use cert_soffice::SofficeConverter;
use clap::Parser;
use std::path::PathBuf;

/// Fill a slide template with every name in a roster, optionally
/// converting each deck to PDF and/or PNG with LibreOffice.
#[derive(Parser, Debug)]
#[command(name = "certgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Slide template (.pptx) containing the placeholder
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Roster table (.csv) with a header row
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Directory for generated decks
    #[arg(long)]
    decks_dir: Option<PathBuf>,

    /// Directory for PDF output
    #[arg(long)]
    pdf_dir: Option<PathBuf>,

    /// Directory for PNG output
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Convert every deck to PDF
    #[arg(long)]
    pdf: bool,

    /// Convert every deck to PNG
    #[arg(long)]
    png: bool,

    /// Prefix for generated file names
    #[arg(long)]
    prefix: Option<String>,

    /// Placeholder replaced by the full name (default: {{NAME}})
    #[arg(long)]
    placeholder: Option<String>,

    /// Roster column holding the given name (default: NOMBRE)
    #[arg(long)]
    given_column: Option<String>,

    /// Roster column holding the family name (default: APELLIDO)
    #[arg(long)]
    family_column: Option<String>,

    /// Path to the LibreOffice `soffice` executable
    #[arg(long, env = "SOFFICE_PATH")]
    soffice: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let summary = run(&args)?;
    log::info!(
        "Processed {} records ({} conversions, {} decks deleted, {} could not be deleted)",
        summary.records,
        summary.conversions,
        summary.deleted,
        summary.cleanup_failures
    );

    Ok(())
}

/// Load configuration and roster, check the template, then run the batch.
///
/// Configuration and roster errors surface before any output directory
/// is created.
fn run(args: &Args) -> Result<BatchSummary> {
    let config = build_config(args)?;

    let records = RosterReader::new(config.columns.clone())
        .read_path(&config.table_path)
        .with_context(|| format!("Failed to read roster {}", config.table_path.display()))?;

    let filler = TemplateFiller::new(&config.template_path, &config.placeholder)?;
    check_template(&filler)?;

    let converter = match &args.soffice {
        Some(program) => SofficeConverter::new(program),
        None => SofficeConverter::locate(),
    };
    if !config.enabled_formats().is_empty() {
        log::debug!("Using converter {}", converter.program().display());
    }

    Batch::new(&config, &filler, converter).run(&records)
}

/// Layer the config file and command-line flags over the defaults.
fn build_config(args: &Args) -> Result<BatchConfig> {
    let mut config = match &args.config {
        Some(path) => BatchConfig::from_toml_file(path)?,
        None => BatchConfig::default(),
    };

    if let Some(template) = &args.template {
        config.template_path = template.clone();
    }
    if let Some(roster) = &args.roster {
        config.table_path = roster.clone();
    }
    if let Some(dir) = &args.decks_dir {
        config.output_dirs.decks = dir.clone();
    }
    if let Some(dir) = &args.pdf_dir {
        config.output_dirs.pdf = dir.clone();
    }
    if let Some(dir) = &args.png_dir {
        config.output_dirs.png = dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.file_prefix = prefix.clone();
    }
    if let Some(placeholder) = &args.placeholder {
        config.placeholder = placeholder.clone();
    }
    if let Some(column) = &args.given_column {
        config.columns.given = column.clone();
    }
    if let Some(column) = &args.family_column {
        config.columns.family = column.clone();
    }
    config.convert_to_pdf |= args.pdf;
    config.convert_to_png |= args.png;

    Ok(config)
}

/// Warn about placeholders that will not be replaced.
fn check_template(filler: &TemplateFiller) -> Result<()> {
    let report = filler
        .inspect()
        .with_context(|| format!("Failed to open template {}", filler.template().display()))?;

    for split in &report.split {
        log::warn!(
            "Slide {} shape '{}': placeholder {} is split across text runs and will not be replaced: {:?}",
            split.slide,
            split.shape,
            filler.placeholder(),
            split.text
        );
    }
    if report.run_matches == 0 && report.split.is_empty() {
        log::warn!(
            "Template {} contains no {} placeholder",
            filler.template().display(),
            filler.placeholder()
        );
    }

    Ok(())
}
