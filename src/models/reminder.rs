//! Medication reminders and their client-side lifecycle.
//!
//! `extracted` (parsed from an upload, see `prescription`) → `active`
//! (created through `POST /reminders/create`) → `cancelled` (through
//! `DELETE /reminders/{id}/cancel`). There is no client-side completed state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prescription::ExtractedMedication;
use super::ModelError;

/// Accepted date spellings from the prescription parser, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Active,
    Cancelled,
    /// Any status the server knows but the client does not model.
    #[serde(other)]
    Other,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }
}

/// `GET /reminders/` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub drug_name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub timing: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: ReminderStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Reminder {
    pub fn is_active(&self) -> bool {
        self.status == ReminderStatus::Active
    }

    /// Length of the course in days, when both ends are known.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => Some((end - start).num_days()),
            _ => None,
        }
    }

    /// Only active reminders can be cancelled.
    pub fn ensure_active(&self) -> Result<(), ModelError> {
        if self.is_active() {
            return Ok(());
        }
        Err(ModelError::ReminderNotActive {
            drug: self.drug_name.clone(),
            status: self.status.as_str().to_string(),
        })
    }
}

/// `POST /reminders/create` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub drug_name: String,
    pub dosage: Option<String>,
    pub timing: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ReminderStatus,
}

impl ReminderDraft {
    /// Promote a parsed prescription line to an active reminder request.
    /// Unparseable dates are sent as `null` rather than rejected.
    pub fn from_extracted(med: &ExtractedMedication) -> Self {
        Self {
            drug_name: med.drug_name.trim().to_string(),
            dosage: med.dosage.clone().filter(|d| !d.trim().is_empty()),
            timing: med.timing.clone().unwrap_or_default(),
            start_date: med.start_date.as_deref().and_then(normalize_date),
            end_date: med.end_date.as_deref().and_then(normalize_date),
            status: ReminderStatus::Active,
        }
    }
}

/// Parse a free-text date from the prescription parser into a calendar date.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
