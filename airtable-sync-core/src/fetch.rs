//! Airtable REST client.
//!
//! Lists a table page by page (`pageSize=100`), following the `offset` cursor
//! Airtable returns until it stops returning one. Any failed page aborts the
//! whole fetch; there is no retry.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::AirtableConfig;
use crate::contract::{RecordSource, RemoteRecord, TableRef};
use crate::error::SyncError;

/// Largest page Airtable serves.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ListRecordsPage {
    #[serde(default)]
    records: Vec<RemoteRecord>,
    offset: Option<String>,
}

pub struct AirtableClient {
    http: Client,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn table_url(&self, table: &TableRef) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            table.base_id,
            table.table_id
        )
    }

    async fn fetch_page(
        &self,
        url: &str,
        table: &TableRef,
        offset: Option<&str>,
    ) -> Result<ListRecordsPage, SyncError> {
        let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
        if let Some(field) = &table.sort {
            query.push(("sort[0][field]", field.clone()));
            query.push(("sort[0][direction]", "asc".to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "Failed to reach Airtable");
                SyncError::Http {
                    url: url.to_string(),
                    source: e,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, url = %url, "Airtable API returned error. Response body: {body}");
            return Err(SyncError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<ListRecordsPage>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to parse Airtable records JSON");
            SyncError::Http {
                url: url.to_string(),
                source: e,
            }
        })
    }
}

#[async_trait::async_trait]
impl RecordSource for AirtableClient {
    async fn fetch_all(&self, table: &TableRef) -> Result<Vec<RemoteRecord>, SyncError> {
        let url = self.table_url(table);
        info!(
            url = %url,
            sort = table.sort.as_deref().unwrap_or("<none>"),
            "Fetching Airtable records"
        );

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = self.fetch_page(&url, table, offset.as_deref()).await?;
            pages += 1;
            debug!(
                page = pages,
                count = page.records.len(),
                has_more = page.offset.is_some(),
                "Fetched Airtable page"
            );
            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        info!(url = %url, records = records.len(), pages, "Fetched all Airtable records");
        Ok(records)
    }
}
