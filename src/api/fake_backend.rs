//! In-process stand-in for the GoHealthy backend, used by the HTTP client tests.
//!
//! Serves the same routes and JSON shapes as the real server on an ephemeral
//! port. Accepts one account (`asha@example.com` / `correct-horse`) whose
//! token is `token-123`, and records every request body it receives.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub const EMAIL: &str = "asha@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const TOKEN: &str = "token-123";
pub const QUERY_ID: &str = "7f9c24e8-3b12-4fef-91e0-0123456789ab";
pub const REMINDER_ID: &str = "0c6f8d4e-1a2b-4c3d-9e8f-aabbccddeeff";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeState {
    fn record(&self, path: &str, body: Value) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(Recorded {
                path: path.to_string(),
                body,
            });
        }
    }
}

pub struct FakeBackend {
    pub base_url: String,
    state: FakeState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");

        let state = FakeState::default();
        let app = router(state.clone());
        let (tx, rx) = oneshot::channel::<()>();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("fake backend runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        rx.await.ok();
                    })
                    .await
                    .expect("fake backend serve");
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            shutdown: Some(tx),
        }
    }

    /// Bodies received on `path`, oldest first.
    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.state
            .requests
            .lock()
            .map(|r| {
                r.iter()
                    .filter(|rec| rec.path == path)
                    .map(|rec| rec.body.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn router(state: FakeState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/users/me", get(me))
        .route("/users/me/update", put(update_me))
        .route("/symptoms_list/", get(symptom_list))
        .route("/symptoms/add", post(add_symptoms))
        .route("/predictions/predict", post(predict))
        .route("/predictions/user_queries", get(user_queries))
        .route("/predictions/query/:id", get(stored_prediction))
        .route("/reminders/", get(reminders))
        .route("/reminders/create", post(create_reminder))
        .route("/reminders/:id/cancel", delete(cancel_reminder))
        .route("/stats/user", get(stats))
        .route("/prescriptions/upload", post(upload))
        .route("/chat/", post(chat))
        .with_state(state)
}

// ─── Helpers ────────────────────────────────────────────────

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn profile_json() -> Value {
    json!({
        "id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
        "email": EMAIL,
        "full_name": "Asha Rao",
        "age": 34,
        "gender": "female",
        "height_cm": 170.0,
        "weight_kg": 65.0,
        "smoking": "Never",
        "alcohol_consumption": "Social",
        "blood_type": "O+",
        "created_at": "2025-07-01T08:00:00"
    })
}

fn reminder_json(id: &str, body: &Value) -> Value {
    json!({
        "id": id,
        "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
        "drug_name": body["drug_name"],
        "dosage": body["dosage"],
        "timing": body["timing"],
        "start_date": body["start_date"],
        "end_date": body["end_date"],
        "status": body["status"],
        "created_at": "2025-07-16T09:30:00"
    })
}

fn stored_reminder_body() -> Value {
    json!({
        "drug_name": "Paracetamol",
        "dosage": "500mg",
        "timing": "08:00, 20:00",
        "start_date": "2025-07-16",
        "end_date": "2025-07-20",
        "status": "active"
    })
}

// ─── Handlers ───────────────────────────────────────────────

async fn login(State(state): State<FakeState>, Form(form): Form<BTreeMap<String, String>>) -> Response {
    let username = form.get("username").cloned().unwrap_or_default();
    state.record("/auth/login", json!({ "username": username }));
    if username == EMAIL && form.get("password").map(String::as_str) == Some(PASSWORD) {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
    }
}

async fn signup(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    state.record("/auth/signup", body.clone());
    if body["email"] == "taken@example.com" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    if !body["email"].as_str().unwrap_or_default().contains('@') {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [
                { "loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error" }
            ]})),
        )
            .into_response();
    }
    Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(profile_json()).into_response()
}

async fn update_me(State(state): State<FakeState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.record("/users/me/update", body.clone());
    let mut profile = profile_json();
    if let (Some(target), Some(update)) = (profile.as_object_mut(), body.as_object()) {
        for (key, value) in update {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(profile).into_response()
}

async fn symptom_list() -> Response {
    Json(json!(["cough", "fatigue", "fever", "headache", "nausea"])).into_response()
}

async fn add_symptoms(State(state): State<FakeState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.record("/symptoms/add", body.clone());
    Json(json!({ "id": 1, "symptoms": body["symptoms"], "disease": "", "source": "user" })).into_response()
}

async fn predict(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<BTreeMap<String, u8>>,
) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.record("/predictions/predict", json!(body));
    if !body.values().any(|v| *v == 1) {
        return detail(StatusCode::BAD_REQUEST, "Invalid symptoms data: no symptom selected");
    }
    Json(json!({
        "predicted_disease": "Influenza",
        "confidence": 0.876,
        "top_3": [["Influenza", 0.876], ["Common Cold", 0.081], ["COVID-19", 0.043]]
    }))
    .into_response()
}

async fn user_queries(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!([
        {
            "id": QUERY_ID,
            "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "symptoms": { "cough": 0, "fever": 1, "headache": 1 },
            "submitted_at": "2025-07-16T09:30:00.123456",
            "prediction": "Influenza"
        },
        {
            "id": "9a8b7c6d-1234-4abc-8def-001122334455",
            "symptoms": { "nausea": 1 },
            "submitted_at": "2025-07-10T18:00:00"
        }
    ]))
    .into_response()
}

async fn stored_prediction(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    if id != QUERY_ID {
        return detail(StatusCode::NOT_FOUND, "Prediction not found");
    }
    Json(json!({
        "id": "5d2c1b0a-9f8e-4d7c-6b5a-493827161504",
        "query_id": QUERY_ID,
        "top_prediction": "Influenza",
        "confidence": 0.876,
        "top_3": [{ "Influenza": 0.876 }, { "Common Cold": 0.081 }, { "COVID-19": 0.043 }],
        "predicted_at": "2025-07-16T09:30:01"
    }))
    .into_response()
}

async fn reminders(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!([reminder_json(REMINDER_ID, &stored_reminder_body())])).into_response()
}

async fn create_reminder(State(state): State<FakeState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.record("/reminders/create", body.clone());
    Json(reminder_json("11111111-2222-4333-8444-555555555555", &body)).into_response()
}

async fn cancel_reminder(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    if id != REMINDER_ID {
        return detail(StatusCode::NOT_FOUND, "Reminder not found.");
    }
    state.record(&format!("/reminders/{id}/cancel"), Value::Null);
    let mut body = stored_reminder_body();
    body["status"] = json!("cancelled");
    Json(reminder_json(&id, &body)).into_response()
}

async fn stats(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!({ "queries_resolved": 2, "active_medications": 1, "reminders_set": 1 })).into_response()
}

async fn upload(State(state): State<FakeState>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
        state.record(
            "/prescriptions/upload",
            json!({ "file_name": file_name, "content_type": content_type, "size": size }),
        );
        return Json(json!({
            "id": "22222222-3333-4444-8555-666666666666",
            "user_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
            "file_name": file_name,
            "extracted_data": {
                "text": "Tab Paracetamol 500mg twice daily",
                "medications": [{
                    "drug_name": "Paracetamol",
                    "dosage": "500mg",
                    "timing": "08:00, 20:00",
                    "start_date": "16-07-2025",
                    "end_date": "20/07/2025",
                    "advice": "after food"
                }]
            },
            "uploaded_at": "2025-07-16T09:30:00"
        }))
        .into_response();
    }
    detail(StatusCode::BAD_REQUEST, "No file uploaded")
}

async fn chat(State(state): State<FakeState>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.record("/chat/", body.clone());
    match body["message"].as_str() {
        Some("start") => Json(json!({ "bot": "Hi Asha, how are you feeling today?" })).into_response(),
        Some(message) => Json(json!({ "answer": format!("About {message}: rest and drink fluids.") })).into_response(),
        None => detail(StatusCode::UNPROCESSABLE_ENTITY, "message is required"),
    }
}
