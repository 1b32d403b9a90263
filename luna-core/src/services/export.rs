//! Symptom report export
//!
//! The backend renders the PDF; this only downloads it and writes it out.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::result::{Error, Result};
use crate::services::gateway::AuthorizedBackend;

pub const DEFAULT_EXPORT_NAME: &str = "symptom_report.pdf";

pub struct ExportService {
    api: AuthorizedBackend,
}

impl ExportService {
    pub fn new(api: AuthorizedBackend) -> Self {
        Self { api }
    }

    /// Download the report to `path`, or into it when `path` is a directory
    pub async fn export_pdf(&self, path: &Path) -> Result<PathBuf> {
        let target = if path.is_dir() {
            path.join(DEFAULT_EXPORT_NAME)
        } else {
            path.to_path_buf()
        };

        let bytes = self.api.symptom_report_pdf().await?;
        if bytes.is_empty() {
            return Err(Error::not_found("No symptom logs to export."));
        }

        fs::write(&target, &bytes)
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", target.display(), e)))?;
        Ok(target)
    }
}
