//! Printable health report: personal details plus symptom history.
//!
//! `layout` places text and rules on A4 pages, `pdf` turns them into bytes,
//! and `ReportPreview` holds the result in a temporary file that disappears
//! when the preview is released or dropped.

pub mod layout;
pub mod pdf;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{SymptomQuery, UserProfile};

pub const REPORT_TITLE: &str = "GoHealthy Health Report";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("User data not loaded yet")]
    ProfileNotLoaded,

    #[error("{0}")]
    Pdf(String),

    #[error("Report file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generated report held in a temporary `.pdf` file.
pub struct ReportPreview {
    file: NamedTempFile,
    page_count: usize,
    size_bytes: usize,
}

impl ReportPreview {
    fn from_bytes(bytes: &[u8], page_count: usize) -> Result<Self, ReportError> {
        let mut file = tempfile::Builder::new()
            .prefix("gohealthy-report-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self {
            file,
            page_count,
            size_bytes: bytes.len(),
        })
    }

    /// Location of the temporary file, valid until release.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Copy the report to `dest`, creating parent directories.
    pub fn save_to(&self, dest: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let dest = dest.as_ref();
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::copy(self.file.path(), dest)?;
        tracing::info!(path = %dest.display(), "Health report saved");
        Ok(dest.to_path_buf())
    }

    /// Delete the temporary file now and report any failure.
    pub fn release(self) -> Result<(), ReportError> {
        self.file.close()?;
        Ok(())
    }
}

impl std::fmt::Debug for ReportPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportPreview")
            .field("path", &self.file.path())
            .field("page_count", &self.page_count)
            .finish()
    }
}

/// Assemble the report for a loaded profile.
pub fn generate(
    profile: Option<&UserProfile>,
    queries: &[SymptomQuery],
) -> Result<ReportPreview, ReportError> {
    let profile = profile.ok_or(ReportError::ProfileNotLoaded)?;

    let layout = layout::build(profile, queries);
    let bytes = pdf::render(&layout, REPORT_TITLE)?;
    let preview = ReportPreview::from_bytes(&bytes, layout.page_count)?;

    tracing::info!(
        queries = queries.len(),
        pages = preview.page_count(),
        bytes = preview.size_bytes(),
        "Health report generated"
    );
    Ok(preview)
}
