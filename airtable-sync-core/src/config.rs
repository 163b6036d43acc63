use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::contract::TableRef;
use crate::schema::TableSchema;

pub const DEFAULT_ENDPOINT: &str = "https://api.airtable.com/v0";

/// Credentials and endpoint for the Airtable API.
///
/// Built once at startup and handed to [`crate::fetch::AirtableClient`].
#[derive(Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub endpoint: String,
}

impl AirtableConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        AirtableConfig {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint,
            api_key_set = !self.api_key.is_empty(),
            "Loaded Airtable config"
        );
    }
}

// Keeps the key out of debug logs.
impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// A table layout bound to its location in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExport {
    pub base_id: String,
    pub table_id: String,
    pub schema: TableSchema,
}

impl TableExport {
    pub fn table_ref(&self) -> TableRef {
        TableRef {
            base_id: self.base_id.clone(),
            table_id: self.table_id.clone(),
            sort: self.schema.sort.clone(),
        }
    }
}

/// Everything one run exports: tables in order, and where the CSVs go.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncJob {
    pub name: String,
    pub output_dir: PathBuf,
    pub tables: Vec<TableExport>,
}

impl SyncJob {
    pub fn trace_loaded(&self) {
        info!(
            job = %self.name,
            output_dir = %self.output_dir.display(),
            tables_count = self.tables.len(),
            "Loaded SyncJob"
        );
        debug!(?self, "SyncJob loaded (full debug)");
    }
}
