//! Declared shape of an exported table: its columns, where each column reads
//! from, and what it falls back to.

use crate::summary::SummarySpec;
use crate::value::Cell;

/// Where a column takes its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    /// The record's own identifier, not one of its fields.
    RecordId,
    Field(String),
}

/// Value substituted when the source field is missing or carries nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ColumnDefault {
    #[default]
    Empty,
    False,
}

impl ColumnDefault {
    pub fn cell(self) -> Cell {
        match self {
            ColumnDefault::Empty => Cell::empty(),
            ColumnDefault::False => Cell::Bool(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Header written to the CSV.
    pub name: String,
    pub source: ColumnSource,
    pub default: ColumnDefault,
}

impl ColumnSpec {
    /// A column that copies the field of the same name.
    pub fn field(name: &str) -> Self {
        Self::renamed(name, name)
    }

    /// A column named `name` that reads field `field`.
    pub fn renamed(name: &str, field: &str) -> Self {
        ColumnSpec {
            name: name.to_string(),
            source: ColumnSource::Field(field.to_string()),
            default: ColumnDefault::Empty,
        }
    }

    pub fn record_id(name: &str) -> Self {
        ColumnSpec {
            name: name.to_string(),
            source: ColumnSource::RecordId,
            default: ColumnDefault::Empty,
        }
    }

    pub fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = default;
        self
    }
}

/// One exported table: columns in output order plus how to fetch and summarise it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Logical name used in logs and the run summary.
    pub name: String,
    /// File name written inside the job's output directory.
    pub output_file: String,
    /// Field the remote store sorts by (ascending), if any.
    pub sort: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub summary: SummarySpec,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
