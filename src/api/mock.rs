use std::sync::Mutex;

use uuid::Uuid;

use super::{ApiError, HealthApi};
use crate::models::{
    AuthToken, ChatReply, ChatRequest, HealthStats, PredictionResult, PrescriptionFile,
    ProfileUpdate, RankedDisease, Reminder, ReminderDraft, ReminderStatus, SignupRequest,
    StoredPrediction,
    SymptomMap, SymptomQuery, SymptomSubmission, UploadResult, UserProfile,
};

/// One recorded call on `MockHealthApi`, with the payload it carried.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Login { email: String },
    Signup(SignupRequest),
    CurrentUser,
    UpdateProfile(ProfileUpdate),
    SymptomList,
    AddSymptoms(SymptomSubmission),
    Predict(SymptomMap),
    UserQueries,
    StoredPrediction(Uuid),
    Reminders,
    CreateReminder(ReminderDraft),
    CancelReminder(Uuid),
    UserStats,
    UploadPrescription { file_name: String },
    Chat(ChatRequest),
}

/// Mock API for testing: canned responses, every call recorded.
///
/// Reminder creation echoes the draft back as a stored reminder unless the
/// drug was marked failing with `with_failing_reminder`. Cancelling looks the
/// id up in the canned reminder list.
pub struct MockHealthApi {
    login: Result<AuthToken, ApiError>,
    signup: Result<AuthToken, ApiError>,
    profile: Result<UserProfile, ApiError>,
    update_profile_error: Option<ApiError>,
    symptom_list: Result<Vec<String>, ApiError>,
    add_symptoms: Result<(), ApiError>,
    prediction: Result<PredictionResult, ApiError>,
    queries: Result<Vec<SymptomQuery>, ApiError>,
    stored_prediction: Result<StoredPrediction, ApiError>,
    reminders: Result<Vec<Reminder>, ApiError>,
    failing_reminders: Vec<String>,
    cancel_reminder_error: Option<ApiError>,
    stats: Result<HealthStats, ApiError>,
    upload: Result<UploadResult, ApiError>,
    chat_greeting: Result<ChatReply, ApiError>,
    chat_reply: Result<ChatReply, ApiError>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockHealthApi {
    pub fn new() -> Self {
        Self {
            login: Ok(AuthToken::new("mock-token")),
            signup: Ok(AuthToken::new("mock-token")),
            profile: Ok(sample_profile()),
            update_profile_error: None,
            symptom_list: Ok(Vec::new()),
            add_symptoms: Ok(()),
            prediction: Ok(sample_prediction()),
            queries: Ok(Vec::new()),
            stored_prediction: Err(not_found("Prediction not found")),
            reminders: Ok(Vec::new()),
            failing_reminders: Vec::new(),
            cancel_reminder_error: None,
            stats: Ok(HealthStats::default()),
            upload: Ok(UploadResult {
                id: None,
                file_name: None,
                extracted_data: Default::default(),
                uploaded_at: None,
            }),
            chat_greeting: Ok(ChatReply {
                bot: Some("Hello! How can I help you today?".into()),
                answer: None,
            }),
            chat_reply: Ok(ChatReply {
                bot: Some("Please consult a doctor.".into()),
                answer: None,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login(mut self, result: Result<AuthToken, ApiError>) -> Self {
        self.login = result;
        self
    }

    pub fn with_signup(mut self, result: Result<AuthToken, ApiError>) -> Self {
        self.signup = result;
        self
    }

    pub fn with_profile(mut self, result: Result<UserProfile, ApiError>) -> Self {
        self.profile = result;
        self
    }

    pub fn with_update_profile_error(mut self, error: ApiError) -> Self {
        self.update_profile_error = Some(error);
        self
    }

    pub fn with_symptom_list(mut self, result: Result<Vec<String>, ApiError>) -> Self {
        self.symptom_list = result;
        self
    }

    pub fn with_add_symptoms(mut self, result: Result<(), ApiError>) -> Self {
        self.add_symptoms = result;
        self
    }

    pub fn with_prediction(mut self, result: Result<PredictionResult, ApiError>) -> Self {
        self.prediction = result;
        self
    }

    pub fn with_queries(mut self, result: Result<Vec<SymptomQuery>, ApiError>) -> Self {
        self.queries = result;
        self
    }

    pub fn with_stored_prediction(mut self, result: Result<StoredPrediction, ApiError>) -> Self {
        self.stored_prediction = result;
        self
    }

    pub fn with_reminders(mut self, result: Result<Vec<Reminder>, ApiError>) -> Self {
        self.reminders = result;
        self
    }

    /// Make `create_reminder` fail for this drug name.
    pub fn with_failing_reminder(mut self, drug_name: &str) -> Self {
        self.failing_reminders.push(drug_name.to_string());
        self
    }

    pub fn with_cancel_reminder_error(mut self, error: ApiError) -> Self {
        self.cancel_reminder_error = Some(error);
        self
    }

    pub fn with_stats(mut self, result: Result<HealthStats, ApiError>) -> Self {
        self.stats = result;
        self
    }

    pub fn with_upload(mut self, result: Result<UploadResult, ApiError>) -> Self {
        self.upload = result;
        self
    }

    pub fn with_chat_greeting(mut self, result: Result<ChatReply, ApiError>) -> Self {
        self.chat_greeting = result;
        self
    }

    pub fn with_chat_reply(mut self, result: Result<ChatReply, ApiError>) -> Self {
        self.chat_reply = result;
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: ApiCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockHealthApi {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(detail: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        detail: Some(detail.to_string()),
    }
}

fn sample_profile() -> UserProfile {
    UserProfile {
        email: "asha@example.com".into(),
        full_name: Some("Asha Rao".into()),
        ..UserProfile::default()
    }
}

fn sample_prediction() -> PredictionResult {
    PredictionResult {
        predicted_disease: "Influenza".into(),
        confidence: 0.876,
        top_3: vec![
            RankedDisease { name: "Influenza".into(), probability: 0.876 },
            RankedDisease { name: "Common Cold".into(), probability: 0.081 },
            RankedDisease { name: "COVID-19".into(), probability: 0.043 },
        ],
    }
}

fn stored_reminder(id: Uuid, draft: &ReminderDraft) -> Reminder {
    Reminder {
        id,
        user_id: None,
        drug_name: draft.drug_name.clone(),
        dosage: draft.dosage.clone(),
        timing: draft.timing.clone(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        status: draft.status,
        created_at: None,
    }
}

impl HealthApi for MockHealthApi {
    fn login(&self, email: &str, _password: &str) -> Result<AuthToken, ApiError> {
        self.record(ApiCall::Login { email: email.to_string() });
        self.login.clone()
    }

    fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError> {
        self.record(ApiCall::Signup(request.clone()));
        self.signup.clone()
    }

    fn current_user(&self, _token: &AuthToken) -> Result<UserProfile, ApiError> {
        self.record(ApiCall::CurrentUser);
        self.profile.clone()
    }

    fn update_profile(
        &self,
        _token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.record(ApiCall::UpdateProfile(update.clone()));
        if let Some(err) = &self.update_profile_error {
            return Err(err.clone());
        }
        let mut profile = self.profile.clone().unwrap_or_default();
        profile.full_name = update.full_name.clone().or(profile.full_name);
        profile.age = update.age;
        profile.gender = update.gender.clone();
        profile.height_cm = update.height_cm.map(f64::from);
        profile.weight_kg = update.weight_kg.map(f64::from);
        profile.smoking = update.smoking.clone();
        profile.alcohol_consumption = update.alcohol_consumption.clone();
        profile.blood_type = update.blood_type.clone();
        profile.emergency_contact = update.emergency_contact.clone();
        profile.emergency_phone = update.emergency_phone.clone();
        Ok(profile)
    }

    fn symptom_list(&self) -> Result<Vec<String>, ApiError> {
        self.record(ApiCall::SymptomList);
        self.symptom_list.clone()
    }

    fn add_symptoms(
        &self,
        _token: &AuthToken,
        submission: &SymptomSubmission,
    ) -> Result<(), ApiError> {
        self.record(ApiCall::AddSymptoms(submission.clone()));
        self.add_symptoms.clone()
    }

    fn predict(
        &self,
        _token: &AuthToken,
        symptoms: &SymptomMap,
    ) -> Result<PredictionResult, ApiError> {
        self.record(ApiCall::Predict(symptoms.clone()));
        self.prediction.clone()
    }

    fn user_queries(&self, _token: &AuthToken) -> Result<Vec<SymptomQuery>, ApiError> {
        self.record(ApiCall::UserQueries);
        self.queries.clone()
    }

    fn stored_prediction(
        &self,
        _token: &AuthToken,
        query_id: Uuid,
    ) -> Result<StoredPrediction, ApiError> {
        self.record(ApiCall::StoredPrediction(query_id));
        self.stored_prediction.clone()
    }

    fn reminders(&self, _token: &AuthToken) -> Result<Vec<Reminder>, ApiError> {
        self.record(ApiCall::Reminders);
        self.reminders.clone()
    }

    fn create_reminder(
        &self,
        _token: &AuthToken,
        draft: &ReminderDraft,
    ) -> Result<Reminder, ApiError> {
        self.record(ApiCall::CreateReminder(draft.clone()));
        if self.failing_reminders.iter().any(|d| *d == draft.drug_name) {
            return Err(ApiError::Status {
                status: 500,
                detail: Some("Scheduler unavailable".into()),
            });
        }
        Ok(stored_reminder(Uuid::new_v4(), draft))
    }

    fn cancel_reminder(&self, _token: &AuthToken, id: Uuid) -> Result<Reminder, ApiError> {
        self.record(ApiCall::CancelReminder(id));
        if let Some(err) = &self.cancel_reminder_error {
            return Err(err.clone());
        }
        let known = self
            .reminders
            .as_ref()
            .ok()
            .and_then(|list| list.iter().find(|r| r.id == id));
        match known {
            Some(reminder) => Ok(Reminder {
                status: ReminderStatus::Cancelled,
                ..reminder.clone()
            }),
            None => Err(ApiError::Status {
                status: 404,
                detail: Some("Reminder not found.".into()),
            }),
        }
    }

    fn user_stats(&self, _token: &AuthToken) -> Result<HealthStats, ApiError> {
        self.record(ApiCall::UserStats);
        self.stats.clone()
    }

    fn upload_prescription(
        &self,
        _token: &AuthToken,
        file: &PrescriptionFile,
    ) -> Result<UploadResult, ApiError> {
        self.record(ApiCall::UploadPrescription {
            file_name: file.file_name.clone(),
        });
        self.upload.clone()
    }

    fn chat(&self, _token: &AuthToken, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.record(ApiCall::Chat(request.clone()));
        if request.is_greeting() {
            self.chat_greeting.clone()
        } else {
            self.chat_reply.clone()
        }
    }
}
