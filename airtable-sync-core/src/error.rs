use std::path::PathBuf;

use thiserror::Error;

/// Every failure that aborts an export run.
///
/// Field-level schema drift is never an error: the normaliser absorbs it.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure or undecodable response body.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Airtable answered with a non-success status.
    #[error("Airtable returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
