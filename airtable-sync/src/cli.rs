///
/// This module implements the CLI interface for airtable-sync: command parsing,
/// argument validation, the async entrypoint and the user-visible report.
///
/// All data models and pipeline logic live in the [`airtable-sync-core`] crate.
/// This module is strictly CLI glue.
///
/// ## How To Use
/// - `airtable-sync sync entries` / `airtable-sync sync dincharya` run a built-in
///   export configured from the environment.
/// - `airtable-sync sync --config jobs.yaml` runs a job declared in YAML.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`airtable-sync-core`]: ../../airtable-sync-core/
use crate::load_config::{load_config, JobSource};
use crate::report::{format_banner, format_report};
use airtable_sync_core::fetch::AirtableClient;
use airtable_sync_core::presets::Preset;
use airtable_sync_core::synchronise::synchronise;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI for airtable-sync: export Airtable tables to normalised CSV files.
#[derive(Parser)]
#[clap(
    name = "airtable-sync",
    version,
    about = "Export Airtable tables to normalised CSV files"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch every configured table and overwrite its CSV export
    Sync {
        /// Built-in export to run, configured from environment variables
        #[clap(value_enum, required_unless_present = "config", conflicts_with = "config")]
        job: Option<JobArg>,
        /// Path to a YAML job file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Directory to write CSV files into (overrides the job's own setting)
        #[clap(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobArg {
    /// Cognitive Log entries → entries_data.csv (replaces sync_airtable.py)
    Entries,
    /// Din Charya priorities and tasks → priorities.csv, tasks.csv (replaces sync_dincharya.py)
    Dincharya,
}

impl From<JobArg> for Preset {
    fn from(arg: JobArg) -> Self {
        match arg {
            JobArg::Entries => Preset::Entries,
            JobArg::Dincharya => Preset::DinCharya,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync {
            job,
            config,
            output_dir,
        } => {
            let source = match (job, config) {
                (_, Some(path)) => JobSource::File(path),
                (Some(job), None) => JobSource::Preset(job.into()),
                (None, None) => anyhow::bail!("either a job name or --config is required"),
            };
            let config = load_config(&source, output_dir)?;
            tracing::info!(command = "sync", job = %config.job.name, "Starting synchronisation process");

            println!("{}", format_banner(&config.job.name));
            let client = AirtableClient::new(config.airtable.clone());
            match synchronise(&config.job, &client).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    println!("{}", format_report(&report));
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::new(e).context("Synchronisation failed"))
                }
            }
        }
    }
}
