//! Built-in export layouts.
//!
//! - [`entries`]: the Cognitive Log journal table.
//! - [`priorities`] and [`tasks`]: the two tables of the Din Charya planner,
//!   exported together. Tasks carry a denormalised copy of their priority's
//!   title and lookups, so the two CSVs can be read side by side.

use crate::schema::{ColumnDefault, ColumnSpec, TableSchema};
use crate::summary::{DistributionOrder, DistributionSpec, SummarySpec};

pub const RECORD_ID: &str = "Record ID";

/// Which built-in job to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Entries,
    DinCharya,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Entries => "entries",
            Preset::DinCharya => "dincharya",
        }
    }

    /// Table layouts in export order.
    pub fn schemas(self) -> Vec<TableSchema> {
        match self {
            Preset::Entries => vec![entries()],
            Preset::DinCharya => vec![priorities(), tasks()],
        }
    }
}

pub fn entries() -> TableSchema {
    let mut columns = vec![ColumnSpec::record_id(RECORD_ID)];
    columns.extend(
        [
            "Name",
            "Type",
            "Date",
            "Timestamp",
            "Text",
            "Inferred Mode",
            "Inferred Energy",
            "Energy Shape",
            "Contradiction",
            "Snapshot",
            "Loops",
            "Next Action",
            "Meta Flag",
        ]
        .into_iter()
        .map(ColumnSpec::field),
    );
    columns.push(ColumnSpec::field("Is Summary?").with_default(ColumnDefault::False));
    columns.extend(
        [
            "Summary (AI)",
            "Actionable Insights (AI)",
            "Entry Length (Words)",
            "Days Since Entry",
            "Is Recent?",
            "Entry Sentiment (AI)",
            "Entry Theme Tags (AI)",
        ]
        .into_iter()
        .map(ColumnSpec::field),
    );

    TableSchema {
        name: "entries".to_string(),
        output_file: "entries_data.csv".to_string(),
        sort: Some("Date".to_string()),
        columns,
        summary: SummarySpec {
            date_range: Some("Date".to_string()),
            distributions: vec![DistributionSpec {
                column: "Type".to_string(),
                label: "Types".to_string(),
                order: DistributionOrder::ByCount,
            }],
        },
    }
}

pub fn priorities() -> TableSchema {
    let mut columns = vec![ColumnSpec::record_id(RECORD_ID)];
    columns.extend(
        [
            "Title",
            "Horizon",
            "Status",
            "Rank",
            "Why",
            "Due Date",
            "Category",
            "Created",
            "Total Tasks",
            "Completed Tasks",
            "Task Completion %",
            "Summary",
            "Category Suggestion",
        ]
        .into_iter()
        .map(ColumnSpec::field),
    );

    let by_key = |column: &str, label: &str| DistributionSpec {
        column: column.to_string(),
        label: label.to_string(),
        order: DistributionOrder::ByKey,
    };

    TableSchema {
        name: "priorities".to_string(),
        output_file: "priorities.csv".to_string(),
        sort: Some("Rank".to_string()),
        columns,
        summary: SummarySpec {
            date_range: None,
            distributions: vec![by_key("Horizon", "Horizons"), by_key("Status", "Statuses")],
        },
    }
}

pub fn tasks() -> TableSchema {
    let columns = vec![
        ColumnSpec::record_id(RECORD_ID),
        ColumnSpec::field("Task"),
        ColumnSpec::renamed("Priority", "Priority Link"),
        ColumnSpec::field("Status"),
        ColumnSpec::field("Notes"),
        ColumnSpec::field("Priority Horizon"),
        ColumnSpec::field("Priority Status"),
        ColumnSpec::field("Priority Due Date"),
        ColumnSpec::field("Days Until Due"),
        ColumnSpec::field("Is Overdue"),
        ColumnSpec::field("Task Age (days)"),
        ColumnSpec::field("Task Summary (AI)"),
        ColumnSpec::field("Suggested Next Action (AI)"),
    ];

    TableSchema {
        name: "tasks".to_string(),
        output_file: "tasks.csv".to_string(),
        sort: None,
        columns,
        summary: SummarySpec::default(),
    }
}
