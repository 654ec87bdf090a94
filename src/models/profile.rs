use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Bearer credential returned by login/signup.
///
/// Zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// `POST /auth/login` and `POST /auth/signup` response body.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// `POST /auth/signup` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// `GET /users/me` response: demographics and health attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: Option<Uuid>,
    pub email: String,
    pub full_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub smoking: Option<String>,
    pub alcohol_consumption: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Full name, or "User" when the profile has none yet.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "User",
        }
    }

    pub fn first_name(&self) -> &str {
        self.display_name()
            .split_whitespace()
            .next()
            .unwrap_or("User")
    }

    /// One or two uppercase initials for the avatar badge.
    pub fn initials(&self) -> String {
        let Some(name) = self.full_name.as_deref() else {
            return String::new();
        };
        name.split_whitespace()
            .take(2)
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Body mass index, `None` when height or weight is missing or not positive.
    pub fn bmi(&self) -> Option<f64> {
        match (self.height_cm, self.weight_kg) {
            (Some(h), Some(w)) if h > 0.0 && w > 0.0 => {
                let meters = h / 100.0;
                Some(w / (meters * meters))
            }
            _ => None,
        }
    }
}

/// `PUT /users/me/update` request body. Every field is sent so the server
/// mirrors the form exactly; empty inputs become `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub smoking: Option<String>,
    pub alcohol_consumption: Option<String>,
    pub blood_type: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
}
