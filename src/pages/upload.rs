use std::fmt;
use std::path::Path;

use super::{require_token, write_heading, PageError};
use crate::api::HealthApi;
use crate::models::{ExtractedMedication, PrescriptionFile, Reminder, ReminderDraft};
use crate::session::Session;

pub const NO_MEDICATIONS: &str = "No medications found to set reminders.";
pub const REMINDERS_SET: &str =
    "Medication reminders set successfully for all drugs in the prescription uploaded.";

/// Prescription upload: attach a file, send it for extraction, then turn the
/// extracted medications into reminders.
#[derive(Debug, Clone, Default)]
pub struct UploadPage {
    file: Option<PrescriptionFile>,
    medications: Option<Vec<ExtractedMedication>>,
    error: Option<String>,
    notice: Option<String>,
}

impl UploadPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&PrescriptionFile> {
        self.file.as_ref()
    }

    /// Medications from the last processed document, `None` before processing.
    pub fn medications(&self) -> Option<&[ExtractedMedication]> {
        self.medications.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Attach a file. Anything other than an image or a PDF is rejected and
    /// leaves the previous attachment in place.
    pub fn attach(&mut self, path: impl AsRef<Path>) -> Result<&PrescriptionFile, PageError> {
        self.error = None;
        match PrescriptionFile::attach(path) {
            Ok(file) => {
                self.medications = None;
                self.notice = None;
                Ok(&*self.file.insert(file))
            }
            Err(e) => {
                let err = PageError::validation(e.to_string());
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn remove_file(&mut self) {
        self.file = None;
        self.medications = None;
        self.error = None;
        self.notice = None;
    }

    /// Upload the attached file and keep the extracted medications.
    pub fn process(
        &mut self,
        api: &dyn HealthApi,
        session: &Session,
    ) -> Result<&[ExtractedMedication], PageError> {
        self.error = None;
        self.notice = None;
        let result = self.upload(api, session);
        match result {
            Ok(medications) => {
                tracing::info!(medications = medications.len(), "Prescription processed");
                Ok(self.medications.insert(medications).as_slice())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn upload(
        &self,
        api: &dyn HealthApi,
        session: &Session,
    ) -> Result<Vec<ExtractedMedication>, PageError> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| PageError::validation("Please select a file to upload"))?;
        let token = require_token(session)?;
        let result = api
            .upload_prescription(token, file)
            .map_err(|e| PageError::api(e, "Error processing document"))?;
        Ok(result.medications().to_vec())
    }

    /// Create one reminder per extracted medication, in order. Stops at the
    /// first failure; reminders created before it are kept.
    pub fn setup_reminders(
        &mut self,
        api: &dyn HealthApi,
        session: &Session,
    ) -> Result<Vec<Reminder>, PageError> {
        self.error = None;
        self.notice = None;
        let result = self.create_reminders(api, session);
        match result {
            Ok(created) => {
                tracing::info!(reminders = created.len(), "Reminders created");
                self.notice = Some(REMINDERS_SET.to_string());
                Ok(created)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn create_reminders(
        &self,
        api: &dyn HealthApi,
        session: &Session,
    ) -> Result<Vec<Reminder>, PageError> {
        let medications = self.medications.as_deref().unwrap_or(&[]);
        if medications.is_empty() {
            return Err(PageError::validation(NO_MEDICATIONS));
        }
        let token = require_token(session)?;

        let mut created = Vec::with_capacity(medications.len());
        for med in medications {
            let draft = ReminderDraft::from_extracted(med);
            // The drug name tells the user where the sequence stopped
            let reminder = api.create_reminder(token, &draft).map_err(|e| {
                tracing::warn!(error = %e, drug = %draft.drug_name, "Reminder creation failed");
                PageError::Api {
                    message: format!("Failed to set reminder for {}", draft.drug_name),
                    source: e,
                }
            })?;
            created.push(reminder);
        }
        Ok(created)
    }
}

impl fmt::Display for UploadPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Upload Prescription")?;
        writeln!(f, "Supported formats: images (JPG, PNG) and PDF")?;
        match &self.file {
            Some(file) => writeln!(f, "  File: {} ({})", file.file_name, file.mime)?,
            None => writeln!(f, "  File: none selected")?,
        }

        if let Some(medications) = &self.medications {
            writeln!(f)?;
            write_heading(f, "Extracted Medications")?;
            if medications.is_empty() {
                writeln!(f, "  No medications detected in this document.")?;
            }
            for med in medications {
                writeln!(f, "  * {}", med.drug_name)?;
                let details = [
                    ("Dosage", &med.dosage),
                    ("Timing", &med.timing),
                    ("Start", &med.start_date),
                    ("End", &med.end_date),
                    ("Advice", &med.advice),
                ];
                for (label, value) in details {
                    if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                        writeln!(f, "      {label}: {value}")?;
                    }
                }
            }
        }

        if let Some(notice) = &self.notice {
            writeln!(f, "  {notice}")?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "  ! {error}")?;
        }
        Ok(())
    }
}
