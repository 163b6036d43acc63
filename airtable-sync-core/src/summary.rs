//! Descriptive aggregates over exported rows, for the console report only.
//! Nothing here feeds back into the written files.

use std::collections::BTreeMap;

use crate::normalize::Row;

/// Label used for rows whose category column is empty.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DistributionOrder {
    /// Most frequent first; ties broken by key.
    #[default]
    ByCount,
    ByKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSpec {
    pub column: String,
    /// Heading in the report, e.g. "Types".
    pub label: String,
    pub order: DistributionOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummarySpec {
    /// Column whose min/max non-empty value is reported.
    pub date_range: Option<String>,
    pub distributions: Vec<DistributionSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub label: String,
    pub counts: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSummary {
    pub date_range: Option<DateRange>,
    pub distributions: Vec<Distribution>,
}

pub fn summarise(spec: &SummarySpec, rows: &[Row]) -> TableSummary {
    let date_range = spec
        .date_range
        .as_deref()
        .and_then(|column| date_range(column, rows));

    // Distributions of nothing are noise.
    let distributions = if rows.is_empty() {
        Vec::new()
    } else {
        spec.distributions
            .iter()
            .map(|d| distribution(d, rows))
            .collect()
    };

    TableSummary {
        date_range,
        distributions,
    }
}

fn date_range(column: &str, rows: &[Row]) -> Option<DateRange> {
    // ISO dates order correctly as strings.
    let dates: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|cell| !cell.is_empty())
        .map(ToString::to_string)
        .collect();
    let first = dates.iter().min()?.clone();
    let last = dates.iter().max()?.clone();
    Some(DateRange { first, last })
}

fn distribution(spec: &DistributionSpec, rows: &[Row]) -> Distribution {
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        let key = match row.get(&spec.column) {
            Some(cell) if !cell.is_empty() => cell.to_string(),
            _ => UNKNOWN_CATEGORY.to_string(),
        };
        *tally.entry(key).or_insert(0) += 1;
    }

    let mut counts: Vec<(String, usize)> = tally.into_iter().collect();
    if spec.order == DistributionOrder::ByCount {
        // Stable sort keeps key order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
    }
    Distribution {
        label: spec.label.clone(),
        counts,
    }
}
