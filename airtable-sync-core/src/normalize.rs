//! Record → row flattening.

use tracing::debug;

use crate::contract::RemoteRecord;
use crate::schema::{ColumnSource, ColumnSpec};
use crate::value::{Cell, FieldValue};

/// A record flattened onto a fixed column list.
///
/// Always holds exactly the declared columns, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    entries: Vec<(String, Cell)>,
}

impl Row {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.entries.iter().map(|(_, cell)| cell)
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered cells, ready for a CSV writer.
    pub fn to_record(&self) -> Vec<String> {
        self.cells().map(ToString::to_string).collect()
    }
}

pub fn normalize_record(record: &RemoteRecord, columns: &[ColumnSpec]) -> Row {
    let entries = columns
        .iter()
        .map(|column| {
            let cell = match &column.source {
                ColumnSource::RecordId => Cell::Text(record.id.clone()),
                ColumnSource::Field(field) => FieldValue::classify(record.fields.get(field))
                    .extract(&column.default.cell()),
            };
            (column.name.clone(), cell)
        })
        .collect();
    Row { entries }
}

/// Normalise every record, preserving fetch order.
pub fn normalize_all(records: &[RemoteRecord], columns: &[ColumnSpec]) -> Vec<Row> {
    let rows: Vec<Row> = records
        .iter()
        .map(|record| normalize_record(record, columns))
        .collect();
    debug!(rows = rows.len(), columns = columns.len(), "Normalised records");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefault;
    use serde_json::{json, Value};

    fn record(id: &str, fields: Value) -> RemoteRecord {
        RemoteRecord {
            id: id.to_string(),
            created_time: None,
            fields: fields.as_object().cloned().unwrap_or_default(),
        }
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::record_id("Record ID"),
            ColumnSpec::field("Title"),
            ColumnSpec::renamed("Priority", "Priority Link"),
            ColumnSpec::field("Is Summary?").with_default(ColumnDefault::False),
            ColumnSpec::field("Summary (AI)"),
        ]
    }

    #[test]
    fn row_has_exactly_the_declared_columns_for_any_field_mix() {
        let shapes = [
            json!({}),
            json!({"Title": "t", "Unrelated": 5}),
            json!({"Title": {"value": 1}, "Priority Link": ["a"], "Summary (AI)": {}}),
            json!({"Title": null, "Priority Link": [], "Is Summary?": true, "Extra": [1, 2]}),
            json!({"Summary (AI)": [{"value": "x"}, null], "Priority Link": {"nested": true}}),
        ];
        let expected: Vec<&str> = vec!["Record ID", "Title", "Priority", "Is Summary?", "Summary (AI)"];

        for (i, fields) in shapes.into_iter().enumerate() {
            let row = normalize_record(&record(&format!("rec{i}"), fields), &columns());
            assert_eq!(row.columns().collect::<Vec<_>>(), expected);
            assert_eq!(row.len(), expected.len());
        }
    }

    #[test]
    fn missing_fields_take_their_declared_default() {
        let row = normalize_record(&record("rec1", json!({})), &columns());
        assert_eq!(row.get("Record ID"), Some(&Cell::Text("rec1".into())));
        assert_eq!(row.get("Title"), Some(&Cell::empty()));
        assert_eq!(row.get("Is Summary?"), Some(&Cell::Bool(false)));
        assert_eq!(row.get("Summary (AI)"), Some(&Cell::empty()));
        assert_eq!(row.get("Not a column"), None);
    }

    #[test]
    fn renamed_column_reads_its_source_field() {
        let row = normalize_record(
            &record("rec2", json!({"Priority Link": ["Ship v1", "Hire"], "Priority": "ignored"})),
            &columns(),
        );
        assert_eq!(row.get("Priority"), Some(&Cell::Text("Ship v1, Hire".into())));
    }

    #[test]
    fn normalize_all_preserves_order() {
        let records = vec![
            record("recB", json!({"Title": "second"})),
            record("recA", json!({"Title": "first"})),
        ];
        let rows = normalize_all(&records, &columns());
        let ids: Vec<String> = rows.iter().map(|r| r.to_record()[0].clone()).collect();
        assert_eq!(ids, vec!["recB", "recA"]);
    }
}
