use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ModelError;

// ─── Attached file ──────────────────────────────────────────

/// A prescription file chosen for upload. The content type is guessed from
/// the extension; only images and PDFs are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl PrescriptionFile {
    pub fn attach(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let accepted = mime.type_() == mime_guess::mime::IMAGE
            || mime.essence_str() == "application/pdf";
        if !accepted {
            return Err(ModelError::UnsupportedFile {
                file: file_name,
                mime: mime.essence_str().to_string(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime: mime.essence_str().to_string(),
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.mime == "application/pdf"
    }
}

// ─── Upload response ────────────────────────────────────────

/// One medication line found by the prescription parser. Every field except
/// the drug name may be missing; dates are whatever text the parser saw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedMedication {
    pub drug_name: String,
    pub dosage: Option<String>,
    pub timing: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedData {
    /// Raw text recognised in the document.
    pub text: Option<String>,
    pub medications: Vec<ExtractedMedication>,
}

/// `POST /prescriptions/upload` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub extracted_data: ExtractedData,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl UploadResult {
    pub fn medications(&self) -> &[ExtractedMedication] {
        &self.extracted_data.medications
    }
}
