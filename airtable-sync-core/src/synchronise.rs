//! High-level pipeline: orchestrates fetch → normalise → write for every table of a job.
//!
//! For each [`TableExport`] in declared order, [`synchronise`]:
//!   - fetches the complete record set through a [`RecordSource`]
//!   - flattens every record onto the table's declared columns
//!   - writes the CSV, replacing whatever was there before
//!   - computes the descriptive summary shown on the console
//!
//! # Error Handling
//! Fail-fast: the first fetch or write error ends the run and is returned as-is.
//! Tables exported before the failure keep their freshly written files; tables
//! after it are left untouched.
//!
//! # Callable From
//! - The CLI crate, with [`crate::fetch::AirtableClient`]
//! - Integration tests, with `MockRecordSource`

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::{SyncJob, TableExport};
use crate::contract::RecordSource;
use crate::error::SyncError;
use crate::normalize::normalize_all;
use crate::summary::{summarise, TableSummary};
use crate::write::write_csv;

#[derive(Debug)]
pub struct SyncReport {
    pub job: String,
    pub tables: Vec<TableReport>,
}

#[derive(Debug)]
pub struct TableReport {
    pub table: String,
    pub output_path: PathBuf,
    pub records: usize,
    pub columns: usize,
    pub summary: TableSummary,
}

pub async fn synchronise<S>(job: &SyncJob, source: &S) -> Result<SyncReport, SyncError>
where
    S: RecordSource + ?Sized,
{
    info!(job = %job.name, tables = job.tables.len(), "[SYNC] Starting full synchronisation pipeline");

    let mut tables = Vec::with_capacity(job.tables.len());
    for export in &job.tables {
        let report = export_table(export, &job.output_dir, source).await?;
        tables.push(report);
    }

    info!(job = %job.name, "[SYNC] Synchronisation complete");
    Ok(SyncReport {
        job: job.name.clone(),
        tables,
    })
}

/// Export a single table into `output_dir`.
pub async fn export_table<S>(
    export: &TableExport,
    output_dir: &Path,
    source: &S,
) -> Result<TableReport, SyncError>
where
    S: RecordSource + ?Sized,
{
    let schema = &export.schema;

    // --- Step 1: Fetch ---
    info!(table = %schema.name, table_id = %export.table_id, "[SYNC] Fetching records");
    let records = source.fetch_all(&export.table_ref()).await.map_err(|e| {
        error!(table = %schema.name, error = %e, "[SYNC][ERROR] Fetch failed");
        e
    })?;
    info!(table = %schema.name, records = records.len(), "[SYNC] Fetch succeeded");

    // --- Step 2: Normalise ---
    let rows = normalize_all(&records, &schema.columns);

    // --- Step 3: Write ---
    let output_path = output_dir.join(&schema.output_file);
    write_csv(&output_path, &schema.column_names(), &rows).map_err(|e| {
        error!(table = %schema.name, error = %e, "[SYNC][ERROR] Write failed");
        e
    })?;

    // --- Step 4: Summarise ---
    let summary = summarise(&schema.summary, &rows);

    Ok(TableReport {
        table: schema.name.clone(),
        output_path,
        records: rows.len(),
        columns: schema.columns.len(),
        summary,
    })
}
