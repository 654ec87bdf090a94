use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "GoHealthy";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL of the GoHealthy backend when `GOHEALTHY_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Connect timeout for API calls. Requests themselves have no timeout:
/// a slow prediction or OCR run simply delays the page transition.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

const API_URL_ENV: &str = "GOHEALTHY_API_URL";
const DATA_DIR_ENV: &str = "GOHEALTHY_DATA_DIR";

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "gohealthy_lib=info,warn"
}

/// Get the application data directory.
/// `~/GoHealthy/` unless `GOHEALTHY_DATA_DIR` points elsewhere.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(APP_NAME)
}

/// Where the session (token + cached prediction) is persisted between runs.
pub fn session_file() -> PathBuf {
    app_data_dir().join("session.json")
}

/// Where exported health reports are written by default.
pub fn reports_dir() -> PathBuf {
    app_data_dir().join("reports")
}

/// Connection settings for the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    /// Read `GOHEALTHY_API_URL`, falling back to the local development backend.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Self::new(&url)
            }
            Ok(url) => {
                tracing::warn!(url = %url, "Ignoring {API_URL_ENV}: not an http(s) URL");
                Self::default()
            }
            Err(_) => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
