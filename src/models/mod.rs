//! Wire and view types shared by the API client, the pages and the report.
//!
//! Everything here mirrors the JSON the GoHealthy backend sends and accepts.
//! Server data is deserialized leniently (optional fields default to `None`)
//! because the pages must keep rendering with partially filled profiles.

pub mod chat;
pub mod enums;
pub mod prediction;
pub mod prescription;
pub mod profile;
pub mod reminder;
pub mod stats;
pub mod symptom;

pub use chat::{ChatMessage, ChatReply, ChatRequest};
pub use enums::{AlcoholConsumption, BloodType, ChatAuthor, Gender, SmokingHabit};
pub use prediction::{PredictionResult, RankedDisease, StoredPrediction};
pub use prescription::{ExtractedData, ExtractedMedication, PrescriptionFile, UploadResult};
pub use profile::{AuthToken, ProfileUpdate, SignupRequest, UserProfile};
pub use reminder::{Reminder, ReminderDraft, ReminderStatus};
pub use stats::HealthStats;
pub use symptom::{SymptomMap, SymptomQuery, SymptomSubmission};

use thiserror::Error;

/// Client-side validation failures on model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidOption { field: String, value: String },

    #[error("Reminder for {drug} is already {status}")]
    ReminderNotActive { drug: String, status: String },

    #[error("Unsupported file type {mime} for {file}. Please upload an image or a PDF")]
    UnsupportedFile { file: String, mime: String },
}
