//! # contract: the seam between orchestration and the remote table store
//!
//! [`RecordSource`] is the single trait the synchronise pipeline depends on for
//! reading records. [`crate::fetch::AirtableClient`] implements it against the
//! Airtable REST API; tests use the generated `MockRecordSource`.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so consumers can script exactly which
//!   records each table returns, or make a fetch fail.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SyncError;

/// One record as returned by the store. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
    /// Airtable omits empty fields entirely, so any key may be missing.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Coordinates of a table in the store, plus the requested ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub base_id: String,
    pub table_id: String,
    /// Field to sort ascending by; `None` keeps the store's default order.
    pub sort: Option<String>,
}

/// Reads every record of a table.
///
/// Implementations handle pagination themselves and return either the
/// complete record set or an error; there is no partial result.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_all(&self, table: &TableRef) -> Result<Vec<RemoteRecord>, SyncError>;
}
