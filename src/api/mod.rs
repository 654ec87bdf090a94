//! GoHealthy REST API client.
//!
//! `HealthApi` has one method per backend endpoint. Pages depend on the trait
//! only; `HttpApiClient` talks to the real server and `MockHealthApi` serves
//! canned responses in tests.
//!
//! Every call except login, signup and the symptom list carries the bearer
//! token from the session.

pub mod error;
pub mod http;
pub mod mock;

#[cfg(test)]
mod fake_backend;

pub use error::ApiError;
pub use http::HttpApiClient;
pub use mock::{ApiCall, MockHealthApi};

use uuid::Uuid;

use crate::models::{
    AuthToken, ChatReply, ChatRequest, HealthStats, PredictionResult, PrescriptionFile,
    ProfileUpdate, Reminder, ReminderDraft, SignupRequest, StoredPrediction, SymptomMap,
    SymptomQuery, SymptomSubmission, UploadResult, UserProfile,
};

/// Blocking client for the GoHealthy backend.
///
/// `Send + Sync` so a page can run independent fetches on scoped threads.
pub trait HealthApi: Send + Sync {
    /// `POST /auth/login`, form-encoded `username` and `password`.
    fn login(&self, email: &str, password: &str) -> Result<AuthToken, ApiError>;

    /// `POST /auth/signup`.
    fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError>;

    /// `GET /users/me`.
    fn current_user(&self, token: &AuthToken) -> Result<UserProfile, ApiError>;

    /// `PUT /users/me/update`.
    fn update_profile(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError>;

    /// `GET /symptoms_list/`. Unauthenticated.
    fn symptom_list(&self) -> Result<Vec<String>, ApiError>;

    /// `POST /symptoms/add`.
    fn add_symptoms(
        &self,
        token: &AuthToken,
        submission: &SymptomSubmission,
    ) -> Result<(), ApiError>;

    /// `POST /predictions/predict` with the symptom map as body.
    fn predict(&self, token: &AuthToken, symptoms: &SymptomMap)
        -> Result<PredictionResult, ApiError>;

    /// `GET /predictions/user_queries`.
    fn user_queries(&self, token: &AuthToken) -> Result<Vec<SymptomQuery>, ApiError>;

    /// `GET /predictions/query/{id}`.
    fn stored_prediction(
        &self,
        token: &AuthToken,
        query_id: Uuid,
    ) -> Result<StoredPrediction, ApiError>;

    /// `GET /reminders/`.
    fn reminders(&self, token: &AuthToken) -> Result<Vec<Reminder>, ApiError>;

    /// `POST /reminders/create`.
    fn create_reminder(
        &self,
        token: &AuthToken,
        draft: &ReminderDraft,
    ) -> Result<Reminder, ApiError>;

    /// `DELETE /reminders/{id}/cancel`. The server marks the reminder
    /// cancelled and drops its scheduled alerts.
    fn cancel_reminder(&self, token: &AuthToken, id: Uuid) -> Result<Reminder, ApiError>;

    /// `GET /stats/user`.
    fn user_stats(&self, token: &AuthToken) -> Result<HealthStats, ApiError>;

    /// `POST /prescriptions/upload`, multipart field `file`.
    fn upload_prescription(
        &self,
        token: &AuthToken,
        file: &PrescriptionFile,
    ) -> Result<UploadResult, ApiError>;

    /// `POST /chat/`.
    fn chat(&self, token: &AuthToken, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}
