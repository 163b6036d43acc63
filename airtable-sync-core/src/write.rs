//! CSV output.
//!
//! Each export fully replaces its file: the header is written from the declared
//! column list, then one line per row in fetch order. There is no append or
//! merge mode.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use csv::{Reader, Writer};
use tracing::{debug, error, info};

use crate::error::SyncError;
use crate::normalize::Row;

/// A parsed CSV file: header plus raw string records.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Write `rows` under a header of `columns` to any writer.
pub fn write_rows<W: io::Write>(writer: W, columns: &[&str], rows: &[Row]) -> csv::Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Create or truncate `path` and write the export into it.
///
/// The parent directory is created when missing. The file handle lives only
/// for the duration of this call.
pub fn write_csv(path: &Path, columns: &[&str], rows: &[Row]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                error!(error = ?e, path = %parent.display(), "Failed to create output directory");
                SyncError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                }
            })?;
            debug!(path = %parent.display(), "Created output directory");
        }
    }

    let file = File::create(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to create CSV file");
        SyncError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    write_rows(file, columns, rows).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to write CSV file");
        SyncError::Csv {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    info!(
        path = %path.display(),
        rows = rows.len(),
        columns = columns.len(),
        "Wrote CSV export"
    );
    Ok(())
}

/// Parse a CSV produced by [`write_rows`] back into strings.
pub fn read_rows<R: io::Read>(reader: R) -> csv::Result<CsvTable> {
    let mut rdr = Reader::from_reader(reader);
    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(CsvTable { headers, rows })
}
