//! Console output for a sync run. Presentation only.

use airtable_sync_core::summary::TableSummary;
use airtable_sync_core::synchronise::{SyncReport, TableReport};
use chrono::Local;

const RULE_WIDTH: usize = 50;

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_banner(job: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{rule}\n{} SYNC\n{rule}\nStarted: {}\n",
        job.to_uppercase(),
        now()
    )
}

pub fn format_report(report: &SyncReport) -> String {
    let thin = "-".repeat(RULE_WIDTH);
    let mut lines = vec![thin.clone(), "SYNC COMPLETE".to_string(), thin];
    for table in &report.tables {
        lines.extend(table_lines(table));
    }
    lines.push(format!("  Time:    {}", now()));
    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

fn table_lines(table: &TableReport) -> Vec<String> {
    let mut lines = vec![
        format!("  [{}]", table.table),
        format!("  Records: {}", table.records),
        format!("  Columns: {}", table.columns),
        format!("  Output:  {}", table.output_path.display()),
    ];
    lines.extend(summary_lines(&table.summary));
    lines
}

fn summary_lines(summary: &TableSummary) -> Vec<String> {
    let range = summary
        .date_range
        .iter()
        .map(|range| format!("  Date Range: {} to {}", range.first, range.last));
    let distributions = summary.distributions.iter().map(|distribution| {
        let counts = distribution
            .counts
            .iter()
            .map(|(key, count)| format!("{key}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("  {}: {{{}}}", distribution.label, counts)
    });
    range.chain(distributions).collect()
}
