//! Published-sheet CSV download.

use std::fs;
use std::path::Path;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::domain::{DEFAULT_SHEET_URL, DataSource, RawRow};
use crate::error::AppError;
use crate::io::ingest::read_rows;

/// Environment override for the sheet URL (also read from `.env`).
pub const SHEET_URL_ENV: &str = "LEADS_SHEET_URL";

/// Resolve the data source: explicit file, explicit URL, `LEADS_SHEET_URL`,
/// then the built-in published sheet.
pub fn resolve_source(url: Option<String>, file: Option<&Path>) -> DataSource {
    if let Some(path) = file {
        return DataSource::File(path.to_path_buf());
    }
    if let Some(url) = url {
        return DataSource::Url(url);
    }
    dotenvy::dotenv().ok();
    match std::env::var(SHEET_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => DataSource::Url(url.trim().to_string()),
        _ => DataSource::Url(DEFAULT_SHEET_URL.to_string()),
    }
}

pub struct SheetClient {
    client: Client,
    source: DataSource,
}

impl SheetClient {
    pub fn new(source: DataSource) -> Self {
        Self {
            client: Client::new(),
            source,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch the export and parse it into raw rows.
    ///
    /// Every call goes back to the source; nothing is cached here.
    pub fn fetch_rows(&self) -> Result<Vec<RawRow>, AppError> {
        let body = self.fetch_body()?;
        let rows = read_rows(body.as_slice())?;
        info!(source = %self.source, rows = rows.len(), "fetched sheet");
        Ok(rows)
    }

    fn fetch_body(&self) -> Result<Vec<u8>, AppError> {
        match &self.source {
            DataSource::File(path) => fs::read(path).map_err(|e| {
                warn!(path = %path.display(), error = %e, "sheet file read failed");
                AppError::fetch(format!("failed to read '{}': {e}", path.display()))
            }),
            DataSource::Url(url) => self.fetch_url(url),
        }
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let resp = self.client.get(url).send().map_err(|e| {
            warn!(error = %e, "sheet request failed");
            AppError::fetch(format!("request failed: {e}"))
        })?;

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "sheet request rejected");
            return Err(AppError::fetch(format!("request failed with status {}", resp.status())));
        }

        resp.bytes()
            .map(|b| b.to_vec())
            .map_err(|e| AppError::fetch(format!("failed to read response body: {e}")))
    }
}
