/// `load_config` module: builds the run configuration from the environment and,
/// optionally, a static YAML job file.
///
/// This module is the only place where environment variables and untrusted YAML
/// are read and mapped to the strongly-typed structs of `airtable-sync-core`.
///
/// # Responsibilities
/// - Read the API key (always from the environment, never from YAML)
/// - Bind the built-in presets to their base/table ids from the environment
/// - Parse YAML job files into [`SyncJob`]s with full column declarations
/// - Fail with clear diagnostics before any request is made
///
/// # Environment
/// - `AIRTABLE_API_KEY` (required), `AIRTABLE_ENDPOINT_URL` (optional)
/// - `entries`: `AIRTABLE_BASE_ID`, `AIRTABLE_TABLE_ID`
/// - `dincharya`: `DINCHARYA_BASE_ID`, `DINCHARYA_PRIORITIES_TABLE_ID`,
///   `DINCHARYA_TASKS_TABLE_ID`
///
/// # YAML schema
/// ```yaml
/// name: planner
/// output_dir: ./exports
/// base_id: appXXXXXXXX          # default for every table
/// tables:
///   - name: priorities
///     table_id: tblXXXXXXXX
///     output_file: priorities.csv   # defaults to <name>.csv
///     sort: Rank
///     columns:
///       - name: Record ID
///         record_id: true
///       - name: Title
///       - name: Priority
///         field: Priority Link
///       - name: Is Summary?
///         default: "false"
///     summary:
///       date_range: Due Date
///       distributions:
///         - column: Status
///           label: Statuses
///           order: by_key
/// ```
use anyhow::{Context, Result};
use airtable_sync_core::config::{AirtableConfig, SyncJob, TableExport};
use airtable_sync_core::presets::Preset;
use airtable_sync_core::schema::{ColumnDefault, ColumnSpec, TableSchema};
use airtable_sync_core::summary::{DistributionOrder, DistributionSpec, SummarySpec};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const API_KEY_VAR: &str = "AIRTABLE_API_KEY";
pub const ENDPOINT_VAR: &str = "AIRTABLE_ENDPOINT_URL";
pub const ENTRIES_BASE_VAR: &str = "AIRTABLE_BASE_ID";
pub const ENTRIES_TABLE_VAR: &str = "AIRTABLE_TABLE_ID";
pub const DINCHARYA_BASE_VAR: &str = "DINCHARYA_BASE_ID";
pub const DINCHARYA_PRIORITIES_VAR: &str = "DINCHARYA_PRIORITIES_TABLE_ID";
pub const DINCHARYA_TASKS_VAR: &str = "DINCHARYA_TASKS_TABLE_ID";

/// Where the job layout comes from.
#[derive(Debug, Clone)]
pub enum JobSource {
    Preset(Preset),
    File(PathBuf),
}

#[derive(Debug)]
pub struct CliConfig {
    pub airtable: AirtableConfig,
    pub job: SyncJob,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    name: Option<String>,
    output_dir: Option<PathBuf>,
    base_id: Option<String>,
    tables: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    name: String,
    base_id: Option<String>,
    table_id: String,
    output_file: Option<String>,
    sort: Option<String>,
    columns: Vec<RawColumn>,
    #[serde(default)]
    summary: RawSummary,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    field: Option<String>,
    #[serde(default)]
    record_id: bool,
    #[serde(default)]
    default: RawDefault,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawDefault {
    #[default]
    Empty,
    False,
}

#[derive(Debug, Default, Deserialize)]
struct RawSummary {
    date_range: Option<String>,
    #[serde(default)]
    distributions: Vec<RawDistribution>,
}

#[derive(Debug, Deserialize)]
struct RawDistribution {
    column: String,
    label: Option<String>,
    #[serde(default)]
    order: RawOrder,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawOrder {
    #[default]
    ByCount,
    ByKey,
}

/// Build the full run configuration.
///
/// `output_dir` overrides whatever the job declares; without either, files land
/// in the current directory.
pub fn load_config(source: &JobSource, output_dir: Option<PathBuf>) -> Result<CliConfig> {
    let airtable = airtable_config_from_env()?;
    airtable.trace_loaded();

    let mut job = match source {
        JobSource::Preset(preset) => preset_job(*preset)?,
        JobSource::File(path) => load_job_file(path)?,
    };
    if let Some(dir) = output_dir {
        info!(output_dir = %dir.display(), "Output directory overridden from command line");
        job.output_dir = dir;
    }
    job.trace_loaded();

    Ok(CliConfig { airtable, job })
}

pub fn airtable_config_from_env() -> Result<AirtableConfig> {
    let api_key = require_env(API_KEY_VAR)?;
    let config = match std::env::var(ENDPOINT_VAR) {
        Ok(endpoint) if !endpoint.trim().is_empty() => {
            info!(endpoint = %endpoint, "Using Airtable endpoint from env");
            AirtableConfig::new(api_key).with_endpoint(endpoint)
        }
        _ => AirtableConfig::new(api_key),
    };
    Ok(config)
}

/// Bind a built-in preset to the base/table ids in the environment.
pub fn preset_job(preset: Preset) -> Result<SyncJob> {
    let tables = match preset {
        Preset::Entries => {
            let base_id = require_env(ENTRIES_BASE_VAR)?;
            let table_id = require_env(ENTRIES_TABLE_VAR)?;
            bind(&base_id, vec![table_id], preset.schemas())
        }
        Preset::DinCharya => {
            let base_id = require_env(DINCHARYA_BASE_VAR)?;
            let priorities = require_env(DINCHARYA_PRIORITIES_VAR)?;
            let tasks = require_env(DINCHARYA_TASKS_VAR)?;
            bind(&base_id, vec![priorities, tasks], preset.schemas())
        }
    };
    info!(preset = preset.name(), tables = tables.len(), "Bound preset to environment");

    Ok(SyncJob {
        name: preset.name().to_string(),
        output_dir: PathBuf::from("."),
        tables,
    })
}

fn bind(base_id: &str, table_ids: Vec<String>, schemas: Vec<TableSchema>) -> Vec<TableExport> {
    table_ids
        .into_iter()
        .zip(schemas)
        .map(|(table_id, schema)| TableExport {
            base_id: base_id.to_string(),
            table_id,
            schema,
        })
        .collect()
}

/// Parse a YAML job file.
pub fn load_job_file<P: AsRef<Path>>(path: P) -> Result<SyncJob> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading job configuration from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawJob = match serde_yaml::from_str(&content) {
        Ok(raw) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            raw
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let name = raw.name.unwrap_or_else(|| {
        path_ref
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string())
    });
    let default_base = raw.base_id.or_else(|| std::env::var(ENTRIES_BASE_VAR).ok());

    let tables = raw
        .tables
        .into_iter()
        .map(|table| table_export(table, default_base.as_deref()))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Invalid table declaration in {}", path_ref.display()))?;

    Ok(SyncJob {
        name,
        output_dir: raw.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        tables,
    })
}

fn table_export(raw: RawTable, default_base: Option<&str>) -> Result<TableExport> {
    let base_id = match raw.base_id.as_deref().or(default_base) {
        Some(base_id) => base_id.to_string(),
        None => {
            error!(table = %raw.name, "No base_id for table");
            anyhow::bail!(
                "table '{}' has no base_id (set it on the table, at the top level, or via {})",
                raw.name,
                ENTRIES_BASE_VAR
            );
        }
    };
    if raw.columns.is_empty() {
        anyhow::bail!("table '{}' declares no columns", raw.name);
    }

    let columns = raw
        .columns
        .into_iter()
        .map(|column| {
            let spec = if column.record_id {
                ColumnSpec::record_id(&column.name)
            } else {
                ColumnSpec::renamed(&column.name, column.field.as_deref().unwrap_or(&column.name))
            };
            spec.with_default(match column.default {
                RawDefault::Empty => ColumnDefault::Empty,
                RawDefault::False => ColumnDefault::False,
            })
        })
        .collect();

    let summary = SummarySpec {
        date_range: raw.summary.date_range,
        distributions: raw
            .summary
            .distributions
            .into_iter()
            .map(|d| DistributionSpec {
                label: d.label.unwrap_or_else(|| d.column.clone()),
                column: d.column,
                order: match d.order {
                    RawOrder::ByCount => DistributionOrder::ByCount,
                    RawOrder::ByKey => DistributionOrder::ByKey,
                },
            })
            .collect(),
    };

    info!(table = %raw.name, table_id = %raw.table_id, "Parsed table from config");
    Ok(TableExport {
        base_id,
        table_id: raw.table_id,
        schema: TableSchema {
            output_file: raw.output_file.unwrap_or_else(|| format!("{}.csv", raw.name)),
            name: raw.name,
            sort: raw.sort,
            columns,
            summary,
        },
    })
}

fn require_env(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => {
            error!(var, "Environment variable is empty");
            anyhow::bail!("{var} environment variable is empty")
        }
        Err(e) => {
            error!(error = ?e, var, "Environment variable not set");
            anyhow::bail!("{var} environment variable not set: {e}")
        }
    }
}
