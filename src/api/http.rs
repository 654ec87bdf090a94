use reqwest::blocking::{multipart, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{ApiError, HealthApi};
use crate::config::ClientConfig;
use crate::models::profile::TokenResponse;
use crate::models::{
    AuthToken, ChatReply, ChatRequest, HealthStats, PredictionResult, PrescriptionFile,
    ProfileUpdate, Reminder, ReminderDraft, SignupRequest, StoredPrediction, SymptomMap,
    SymptomQuery, SymptomSubmission, UploadResult, UserProfile,
};

/// HTTP client for the GoHealthy backend.
pub struct HttpApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send, map transport failures, and turn non-2xx into `ApiError::Status`.
    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        tracing::debug!(method, path, "API request");

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                ApiError::Connection(self.base_url.clone())
            } else {
                ApiError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(method, path, status = status.as_u16(), "API error response");
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    fn get<T: DeserializeOwned>(&self, token: Option<&AuthToken>, path: &str) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        decode(self.send("GET", path, request)?)
    }

    fn post_json<B, T>(&self, token: Option<&AuthToken>, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        decode(self.send("POST", path, request)?)
    }

    fn put_json<B, T>(&self, token: &AuthToken, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .put(self.url(path))
            .bearer_auth(token.as_str())
            .json(body);
        decode(self.send("PUT", path, request)?)
    }

    fn delete<T: DeserializeOwned>(&self, token: &AuthToken, path: &str) -> Result<T, ApiError> {
        let request = self.client.delete(self.url(path)).bearer_auth(token.as_str());
        decode(self.send("DELETE", path, request)?)
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

impl HealthApi for HttpApiClient {
    fn login(&self, email: &str, password: &str) -> Result<AuthToken, ApiError> {
        let request = self
            .client
            .post(self.url("/auth/login"))
            .form(&[("username", email), ("password", password)]);
        let parsed: TokenResponse = decode(self.send("POST", "/auth/login", request)?)?;
        Ok(AuthToken::new(parsed.access_token))
    }

    fn signup(&self, request: &SignupRequest) -> Result<AuthToken, ApiError> {
        let parsed: TokenResponse = self.post_json(None, "/auth/signup", request)?;
        Ok(AuthToken::new(parsed.access_token))
    }

    fn current_user(&self, token: &AuthToken) -> Result<UserProfile, ApiError> {
        self.get(Some(token), "/users/me")
    }

    fn update_profile(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.put_json(token, "/users/me/update", update)
    }

    fn symptom_list(&self) -> Result<Vec<String>, ApiError> {
        self.get(None, "/symptoms_list/")
    }

    fn add_symptoms(
        &self,
        token: &AuthToken,
        submission: &SymptomSubmission,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post_json(Some(token), "/symptoms/add", submission)?;
        Ok(())
    }

    fn predict(
        &self,
        token: &AuthToken,
        symptoms: &SymptomMap,
    ) -> Result<PredictionResult, ApiError> {
        self.post_json(Some(token), "/predictions/predict", symptoms)
    }

    fn user_queries(&self, token: &AuthToken) -> Result<Vec<SymptomQuery>, ApiError> {
        self.get(Some(token), "/predictions/user_queries")
    }

    fn stored_prediction(
        &self,
        token: &AuthToken,
        query_id: Uuid,
    ) -> Result<StoredPrediction, ApiError> {
        self.get(Some(token), &format!("/predictions/query/{query_id}"))
    }

    fn reminders(&self, token: &AuthToken) -> Result<Vec<Reminder>, ApiError> {
        self.get(Some(token), "/reminders/")
    }

    fn create_reminder(
        &self,
        token: &AuthToken,
        draft: &ReminderDraft,
    ) -> Result<Reminder, ApiError> {
        self.post_json(Some(token), "/reminders/create", draft)
    }

    fn cancel_reminder(&self, token: &AuthToken, id: Uuid) -> Result<Reminder, ApiError> {
        self.delete(token, &format!("/reminders/{id}/cancel"))
    }

    fn user_stats(&self, token: &AuthToken) -> Result<HealthStats, ApiError> {
        self.get(Some(token), "/stats/user")
    }

    fn upload_prescription(
        &self,
        token: &AuthToken,
        file: &PrescriptionFile,
    ) -> Result<UploadResult, ApiError> {
        let bytes = std::fs::read(&file.path).map_err(|e| ApiError::File {
            path: file.path.display().to_string(),
            message: e.to_string(),
        })?;
        let part = multipart::Part::bytes(bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ApiError::Http(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(self.url("/prescriptions/upload"))
            .bearer_auth(token.as_str())
            .multipart(form);
        decode(self.send("POST", "/prescriptions/upload", request)?)
    }

    fn chat(&self, token: &AuthToken, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json(Some(token), "/chat/", request)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake_backend::{self, FakeBackend};
    use super::*;
    use crate::models::ReminderStatus;

    fn client(backend: &FakeBackend) -> HttpApiClient {
        HttpApiClient::new(&ClientConfig::new(&backend.base_url)).unwrap()
    }

    fn token() -> AuthToken {
        AuthToken::new(fake_backend::TOKEN)
    }

    #[test]
    fn login_sends_form_and_returns_token() {
        let backend = FakeBackend::start();
        let api = client(&backend);

        let token = api.login(fake_backend::EMAIL, fake_backend::PASSWORD).unwrap();
        assert_eq!(token.as_str(), fake_backend::TOKEN);
        assert_eq!(backend.bodies("/auth/login")[0]["username"], fake_backend::EMAIL);
    }

    #[test]
    fn login_failure_surfaces_detail() {
        let backend = FakeBackend::start();
        let err = client(&backend).login(fake_backend::EMAIL, "wrong").unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.user_message("Login failed"), "Incorrect email or password");
    }

    #[test]
    fn signup_validation_array_is_flattened() {
        let backend = FakeBackend::start();
        let request = SignupRequest {
            full_name: "Asha Rao".into(),
            email: "not-an-email".into(),
            password: "pw".into(),
        };
        let err = client(&backend).signup(&request).unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.user_message("Signup failed"), "value is not a valid email address");
    }

    #[test]
    fn authenticated_calls_carry_bearer_token() {
        let backend = FakeBackend::start();
        let api = client(&backend);

        let profile = api.current_user(&token()).unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Asha Rao"));

        let err = api.current_user(&AuthToken::new("stale")).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn symptom_list_needs_no_token() {
        let backend = FakeBackend::start();
        let list = client(&backend).symptom_list().unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0], "cough");
    }

    #[test]
    fn predict_posts_symptom_map_as_body() {
        let backend = FakeBackend::start();
        let api = client(&backend);
        let all: Vec<String> = api.symptom_list().unwrap();
        let map = SymptomMap::from_selection(&all, &["fever", "headache"]);

        api.add_symptoms(&token(), &SymptomSubmission::from_user(map.clone()))
            .unwrap();
        let prediction = api.predict(&token(), &map).unwrap();

        assert_eq!(prediction.predicted_disease, "Influenza");
        assert_eq!(prediction.top_3[1].name, "Common Cold");
        let sent = &backend.bodies("/predictions/predict")[0];
        assert_eq!(sent["fever"], 1);
        assert_eq!(sent["cough"], 0);
        assert_eq!(backend.bodies("/symptoms/add")[0]["source"], "user");
    }

    #[test]
    fn stored_prediction_by_query_id() {
        let backend = FakeBackend::start();
        let id: Uuid = fake_backend::QUERY_ID.parse().unwrap();
        let stored = client(&backend).stored_prediction(&token(), id).unwrap();
        assert_eq!(stored.top_prediction, "Influenza");
        assert_eq!(stored.top_3.len(), 3);

        let err = client(&backend)
            .stored_prediction(&token(), Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn cancel_deletes_through_cancel_endpoint() {
        let backend = FakeBackend::start();
        let api = client(&backend);
        let reminder = api.reminders(&token()).unwrap().remove(0);

        let cancelled = api.cancel_reminder(&token(), reminder.id).unwrap();
        assert_eq!(cancelled.id, reminder.id);
        assert_eq!(cancelled.status, ReminderStatus::Cancelled);
        assert_eq!(cancelled.drug_name, "Paracetamol");
        assert_eq!(
            backend.bodies(&format!("/reminders/{}/cancel", reminder.id)),
            vec![serde_json::Value::Null]
        );
    }

    #[test]
    fn cancel_unknown_reminder_is_not_found() {
        let backend = FakeBackend::start();
        let err = client(&backend)
            .cancel_reminder(&token(), Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.user_message("Failed to cancel reminder"), "Reminder not found.");
    }

    #[test]
    fn upload_sends_multipart_file() {
        let backend = FakeBackend::start();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rx.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let file = PrescriptionFile::attach(&path).unwrap();

        let result = client(&backend).upload_prescription(&token(), &file).unwrap();
        assert_eq!(result.medications()[0].drug_name, "Paracetamol");

        let sent = &backend.bodies("/prescriptions/upload")[0];
        assert_eq!(sent["file_name"], "rx.png");
        assert_eq!(sent["content_type"], "image/png");
        assert_eq!(sent["size"], 4);
    }

    #[test]
    fn upload_of_missing_file_is_a_file_error() {
        let backend = FakeBackend::start();
        let file = PrescriptionFile::attach("/definitely/not/here.pdf").unwrap();
        let err = client(&backend).upload_prescription(&token(), &file).unwrap_err();
        assert!(matches!(err, ApiError::File { .. }));
    }

    #[test]
    fn chat_reply_variants() {
        let backend = FakeBackend::start();
        let api = client(&backend);

        let greeting = api.chat(&token(), &ChatRequest::greeting(None)).unwrap();
        assert_eq!(greeting.text(), "Hi Asha, how are you feeling today?");

        let reply = api
            .chat(&token(), &ChatRequest::new("ibuprofen", Some("Influenza")))
            .unwrap();
        assert!(reply.text().starts_with("About ibuprofen"));
        assert_eq!(backend.bodies("/chat/")[1]["disease"], "Influenza");
    }

    #[test]
    fn unreachable_server_is_connection_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let api = HttpApiClient::new(&ClientConfig::new(&format!("http://127.0.0.1:{port}"))).unwrap();
        let err = api.symptom_list().unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)), "got {err:?}");
    }
}
