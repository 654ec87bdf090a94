use std::fmt;
use std::thread;

use super::{require_token, write_heading, Fetch, PageError};
use crate::api::HealthApi;
use crate::models::{SymptomQuery, UserProfile};
use crate::report::{self, ReportPreview};
use crate::session::Session;

/// Health report screen: loads the profile and query history side by side,
/// then assembles the PDF on demand.
#[derive(Debug, Clone, Default)]
pub struct HealthReportPage {
    profile: Fetch<UserProfile>,
    queries: Fetch<Vec<SymptomQuery>>,
}

impl HealthReportPage {
    pub fn mount(api: &dyn HealthApi, session: &Session) -> Result<Self, PageError> {
        let token = require_token(session)?;
        let (profile, queries) = thread::scope(|s| {
            let profile = s.spawn(|| {
                Fetch::from_result(api.current_user(token), "profile", "Failed to fetch user data")
            });
            let queries = Fetch::from_result(
                api.user_queries(token),
                "queries",
                "Failed to fetch user queries",
            );
            let profile = profile.join().unwrap_or_else(|_| {
                tracing::error!("Profile fetch thread panicked");
                Fetch::Failed("Failed to fetch user data".to_string())
            });
            (profile, queries)
        });
        Ok(Self { profile, queries })
    }

    pub fn profile(&self) -> &Fetch<UserProfile> {
        &self.profile
    }

    pub fn queries(&self) -> &[SymptomQuery] {
        self.queries.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Build the report. Fails with "User data not loaded yet" while the
    /// profile is missing; a failed query fetch yields an empty history.
    pub fn generate(&self) -> Result<ReportPreview, PageError> {
        Ok(report::generate(self.profile.loaded(), self.queries())?)
    }
}

impl fmt::Display for HealthReportPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Health Report")?;
        match &self.profile {
            Fetch::Loading => writeln!(f, "  Loading profile...")?,
            Fetch::Failed(e) => writeln!(f, "  ! {e}")?,
            Fetch::Loaded(p) => writeln!(f, "  Patient: {}", p.display_name())?,
        }
        match &self.queries {
            Fetch::Loading => writeln!(f, "  Loading queries...")?,
            Fetch::Failed(e) => writeln!(f, "  ! {e}")?,
            Fetch::Loaded(list) => writeln!(f, "  Symptom checks on record: {}", list.len())?,
        }
        write!(f, "Generate the report to preview and download it as PDF.")
    }
}
