//! Client session: the bearer token and the latest prediction.
//!
//! Lifecycle:
//! - `sign_in` at login or signup replaces the token and drops any
//!   prediction left from an earlier account
//! - `store_prediction` overwrites the single cached prediction
//! - `clear` at logout empties both
//!
//! `SessionStore` persists the session as JSON between CLI invocations.
//! The file is owner-only on Unix and removed at logout.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AuthToken, PredictionResult};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session file I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct Session {
    auth_token: Option<AuthToken>,
    prediction: Option<PredictionResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn sign_in(&mut self, token: AuthToken) {
        self.auth_token = Some(token);
        self.prediction = None;
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn store_prediction(&mut self, prediction: PredictionResult) {
        self.prediction = Some(prediction);
    }

    pub fn clear(&mut self) {
        self.auth_token = None;
        self.prediction = None;
    }
}

/// On-disk shape. The token is only materialized as a plain string here.
#[derive(Serialize, Deserialize, Default)]
struct SessionFile {
    #[serde(default)]
    auth_token: Option<String>,
    #[serde(default)]
    prediction: Option<PredictionResult>,
}

impl From<&Session> for SessionFile {
    fn from(session: &Session) -> Self {
        Self {
            auth_token: session.auth_token.as_ref().map(|t| t.as_str().to_string()),
            prediction: session.prediction.clone(),
        }
    }
}

impl From<SessionFile> for Session {
    fn from(file: SessionFile) -> Self {
        Self {
            auth_token: file
                .auth_token
                .filter(|t| !t.is_empty())
                .map(AuthToken::new),
            prediction: file.prediction,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// SessionStore
// ═══════════════════════════════════════════════════════════

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means a fresh, signed-out session.
    pub fn load(&self) -> Result<Session, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        let file: SessionFile = serde_json::from_str(&raw)?;
        Ok(file.into())
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(&SessionFile::from(session))?;
        let mut file = open_private(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Remove the session file. Already absent is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Open for writing, truncated, owner read/write only (0o600 on Unix).
/// A new file is created with that mode; an existing one is tightened
/// before any token bytes are written.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankedDisease;

    fn prediction(disease: &str) -> PredictionResult {
        PredictionResult {
            predicted_disease: disease.into(),
            confidence: 0.8,
            top_3: vec![RankedDisease {
                name: disease.into(),
                probability: 0.8,
            }],
        }
    }

    #[test]
    fn sign_in_drops_previous_prediction() {
        let mut session = Session::new();
        session.sign_in(AuthToken::new("first"));
        session.store_prediction(prediction("Flu"));

        session.sign_in(AuthToken::new("second"));
        assert_eq!(session.token().map(AuthToken::as_str), Some("second"));
        assert!(session.prediction().is_none());
    }

    #[test]
    fn store_prediction_overwrites() {
        let mut session = Session::new();
        session.store_prediction(prediction("Flu"));
        session.store_prediction(prediction("Migraine"));
        assert_eq!(session.prediction().unwrap().predicted_disease, "Migraine");
    }

    #[test]
    fn clear_empties_everything() {
        let mut session = Session::new();
        session.sign_in(AuthToken::new("t"));
        session.store_prediction(prediction("Flu"));
        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.prediction().is_none());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let mut session = Session::new();
        session.sign_in(AuthToken::new("super-secret"));
        assert!(!format!("{session:?}").contains("super-secret"));
    }

    #[test]
    fn missing_file_loads_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let session = store.load().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn save_then_load_preserves_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        let mut session = Session::new();
        session.sign_in(AuthToken::new("jwt-token"));
        session.store_prediction(prediction("Influenza"));
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token().map(AuthToken::as_str), Some("jwt-token"));
        assert_eq!(loaded.prediction().unwrap().predicted_disease, "Influenza");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_loose_file_is_tightened_before_write() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(path.clone());
        let mut session = Session::new();
        session.sign_in(AuthToken::new("jwt-token"));
        store.save(&session).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            store.load().unwrap().token().map(AuthToken::as_str),
            Some("jwt-token")
        );
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = SessionStore::new(path).load().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt(_)));
    }
}
