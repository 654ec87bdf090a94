//! Page view-models, one per route.
//!
//! A page owns its local UI state, issues its API calls when mounted and
//! renders itself through `Display`. Actions return the route to navigate to.
//! Fetch failures become inline error text in the page state; they never
//! abort sibling fetches.

pub mod chat;
pub mod dashboard;
pub mod disclaimer;
pub mod landing;
pub mod login;
pub mod personal_details;
pub mod prediction;
pub mod query;
pub mod report;
pub mod signup;
pub mod symptoms;
pub mod upload;

pub use chat::ChatPage;
pub use dashboard::DashboardPage;
pub use disclaimer::DisclaimerPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use personal_details::PersonalDetailsPage;
pub use prediction::PredictionPage;
pub use query::QueryPage;
pub use report::HealthReportPage;
pub use signup::SignupPage;
pub use symptoms::SymptomsPage;
pub use upload::UploadPage;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::api::ApiError;
use crate::models::AuthToken;
use crate::report::ReportError;
use crate::session::Session;

pub const LOGIN_REQUIRED: &str = "Please log in to continue.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// ─── Errors ─────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum PageError {
    /// API failure, with the text to show the user.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("{0}")]
    MissingData(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl PageError {
    pub fn api(source: ApiError, fallback: &str) -> Self {
        PageError::Api {
            message: source.user_message(fallback),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PageError::Validation(message.into())
    }
}

/// The session token, or `MissingData` when signed out.
pub fn require_token(session: &Session) -> Result<&AuthToken, PageError> {
    session
        .token()
        .ok_or_else(|| PageError::MissingData(LOGIN_REQUIRED.to_string()))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

// ─── Fetch state ────────────────────────────────────────────

/// State of one mount-time fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Fetch<T> {
    fn default() -> Self {
        Fetch::Loading
    }
}

impl<T> Fetch<T> {
    /// Record a fetch outcome; failures are logged and keep the user-facing text.
    pub fn from_result(result: Result<T, ApiError>, what: &str, fallback: &str) -> Self {
        match result {
            Ok(value) => Fetch::Loaded(value),
            Err(e) => {
                tracing::warn!(error = %e, what, "Fetch failed");
                Fetch::Failed(e.user_message(fallback))
            }
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Fetch::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetch::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Fetch::Loaded(_))
    }
}

// ─── Routes ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Signup,
    PersonalDetails,
    Dashboard,
    Symptoms,
    Prediction,
    Disclaimer,
    Chat,
    Upload,
    Report,
    Query(Uuid),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Signup => "/signup".into(),
            Route::PersonalDetails => "/signup/details".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Symptoms => "/symptoms".into(),
            Route::Prediction => "/prediction".into(),
            Route::Disclaimer => "/disclaimer".into(),
            Route::Chat => "/chat".into(),
            Route::Upload => "/upload".into(),
            Route::Report => "/report".into(),
            Route::Query(id) => format!("/query/{id}"),
        }
    }

    /// Pages that need a signed-in session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Landing | Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Section title underlined to its own width.
pub(crate) fn write_heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "─".repeat(title.chars().count()))
}
