use serde_json::Value;

/// Failures talking to the GoHealthy backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach the GoHealthy API at {0}")]
    Connection(String),

    #[error("API returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Cannot read {path}: {message}")]
    File { path: String, message: String },
}

impl ApiError {
    /// Text shown to the user: the server's `detail` when it sent one,
    /// otherwise the page-specific fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Build a status error from a non-2xx response body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            detail: parse_detail(body),
        }
    }
}

/// Extract `detail` from an error body. FastAPI validation errors send a
/// list of `{loc, msg, type}` objects; their `msg` entries are joined.
pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
