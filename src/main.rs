//! # SENTINEL Atlas - CLI Entry Point
//!
//! Command-line interface for the architecture security pipeline.
//!
//! Commands:
//! - `enrich`      - Attach security flags to the architecture document
//! - `analyze`     - Compute the security report from an enriched document
//! - `verify`      - Re-run the analyzer and check golden expectations
//! - `init-config` - Generate a default configuration file

use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};

use sentinel_atlas::{analyze, enrich, verify, AtlasConfig, AtlasError, AtlasResult};

/// SENTINEL Atlas - static architecture security posture analyzer.
///
/// Enriches an architecture diagram document with security metadata,
/// scores the result, and verifies the pipeline against golden values.
#[derive(Parser, Debug)]
#[command(name = "sentinel-atlas")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "sentinel-atlas.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Attach security flags to every known node and every edge, in place.
    Enrich {
        /// Architecture document to enrich (default from configuration).
        grid: Option<PathBuf>,
    },

    /// Analyze an enriched document and write the security report.
    Analyze {
        /// Enriched document to analyze (default from configuration).
        input: Option<PathBuf>,
    },

    /// Re-run the analyzer and verify report and document against
    /// golden expectations.
    Verify {
        /// Enriched document to verify (default from configuration).
        input: Option<PathBuf>,
    },

    /// Generate a default configuration file.
    InitConfig,
}

fn main() -> AtlasResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        AtlasConfig::from_file(&cli.config)?
    } else {
        AtlasConfig::default()
    };

    match cli.command {
        Commands::Enrich { grid } => {
            let path = grid.unwrap_or_else(|| config.general.grid_file.clone());
            // Enrichment failures are fatal and uncaught by design
            enrich::run(&path)?;
            Ok(())
        }
        Commands::Analyze { input } => {
            let path = input.unwrap_or_else(|| config.general.grid_file.clone());
            cmd_analyze(&path, &config)
        }
        Commands::Verify { input } => {
            let path = input.unwrap_or_else(|| config.general.grid_file.clone());
            cmd_verify(&path, &config, &cli.config)
        }
        Commands::InitConfig => cmd_init_config(&cli.config),
    }
}

/// Analyze with top-level error capture: any failure is reported and
/// exits 1 without a partial report on disk.
fn cmd_analyze(input: &Path, config: &AtlasConfig) -> AtlasResult<()> {
    match analyze::run(input, config) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Verify and translate the overall verdict into the exit code.
fn cmd_verify(input: &Path, config: &AtlasConfig, config_path: &Path) -> AtlasResult<()> {
    let config_arg = config_path.exists().then_some(config_path);
    let all_passed = verify::run(input, config, config_arg)?;
    if all_passed {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Generate a default configuration file.
fn cmd_init_config(config_path: &Path) -> AtlasResult<()> {
    if config_path.exists() {
        return Err(AtlasError::Config(format!(
            "Configuration file already exists: {}. Remove it first or use a different path.",
            config_path.display()
        )));
    }

    AtlasConfig::write_default(config_path)?;
    println!("Default configuration written to: {}", config_path.display());
    println!("Key settings:");
    println!("  [general]    - Document and report file locations");
    println!("  [scoring]    - Penalty weights and baseline severity counts");
    println!("  [compliance] - Framework coverage table and pass threshold");

    Ok(())
}
