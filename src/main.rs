//! Keyrank - score and rank keyword spreadsheets from the command line

mod cli;
mod default_config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use keyrank_core::pipeline::{run_growth, run_keywords};
use keyrank_core::{KeyrankConfig, RunSummary};
use keyrank_engine::engine::Preset;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "warn,keyrank=info,keyrank_core=info",
            _ => "warn,keyrank=debug,keyrank_core=debug,keyrank_engine=debug",
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

/// Resolve the config: `--no-config` wins, an explicit `--config` must load,
/// and a broken default config only warns.
fn load_config(cli: &Cli) -> Result<KeyrankConfig> {
    if cli.no_config {
        return Ok(KeyrankConfig::default());
    }
    if let Some(path) = &cli.config {
        return KeyrankConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    let Some(path) = default_config::default_config_path() else {
        return Ok(KeyrankConfig::default());
    };
    if !path.is_file() {
        debug!(path = %path.display(), "no default config");
        return Ok(KeyrankConfig::default());
    }
    match KeyrankConfig::load(&path) {
        Ok(config) => {
            debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        Err(err) => {
            warn!("{}; using built-in defaults", err);
            Ok(KeyrankConfig::default())
        }
    }
}

/// Run `f` over every file. A failure is reported and the next file is still
/// processed; the exit code reflects whether any file failed.
fn process_files<F>(files: &[PathBuf], mut f: F) -> ExitCode
where
    F: FnMut(&Path) -> keyrank_core::Result<RunSummary>,
{
    let mut failed = 0usize;
    for path in files {
        match f(path) {
            Ok(summary) => {
                println!(
                    "Saved {} rows to {}",
                    summary.rows_written,
                    summary.output.display()
                );
            }
            Err(err) => {
                failed += 1;
                eprintln!("Error: {}: {}", path.display(), err);
            }
        }
    }
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_presets() {
    for preset in Preset::ALL {
        let config = preset.config();
        println!("{} -> {}", preset, config.final_column);
        println!("  wing_weight = {}", config.weights.wing_weight);
        if let Some(top_n) = preset.default_top_n() {
            println!("  top_n = {}", top_n);
        }
        for (name, weight) in &config.weights.scalars {
            println!("  {} = {}", name, weight);
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let now = chrono::Local::now().naive_local();

    let code = match &cli.command {
        Command::Presets => {
            print_presets();
            ExitCode::SUCCESS
        }
        Command::Score(args) => {
            let keyword_run = args.to_run(&config);
            process_files(&args.files, |path| run_keywords(path, &keyword_run, now))
        }
        Command::Growth(args) => {
            let growth_run = args.to_run(&config);
            process_files(&args.files, |path| run_growth(path, &growth_run, now))
        }
    };
    Ok(code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
