use std::fmt;

use super::{require_token, write_heading, Fetch, PageError, Route};
use crate::api::HealthApi;
use crate::models::{PredictionResult, SymptomMap, SymptomSubmission};
use crate::session::Session;

/// Symptom picker. Submitting records the selection, requests a prediction
/// and caches it in the session for the following pages.
#[derive(Debug, Clone)]
pub struct SymptomsPage {
    available: Fetch<Vec<String>>,
    selected: Vec<String>,
    error: Option<String>,
}

impl SymptomsPage {
    pub fn mount(api: &dyn HealthApi) -> Self {
        let available = Fetch::from_result(
            api.symptom_list(),
            "symptom list",
            "Failed to fetch symptoms list",
        );
        let error = available.error().map(str::to_string);
        Self {
            available,
            selected: Vec::new(),
            error,
        }
    }

    pub fn available(&self) -> &[String] {
        self.available.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Case-insensitive match on known symptom names; `_` matches a space.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase().replace('_', " ");
        self.available()
            .iter()
            .filter(|name| name.to_lowercase().replace('_', " ").contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Add a symptom to the selection. Selecting twice is a no-op.
    pub fn select(&mut self, name: &str) -> Result<(), PageError> {
        let name = name.trim();
        let known = self
            .available()
            .iter()
            .find(|s| s.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| PageError::validation(format!("Unknown symptom: {name}")))?;
        if !self.selected.contains(&known) {
            self.selected.push(known);
        }
        Ok(())
    }

    pub fn deselect(&mut self, name: &str) {
        self.selected.retain(|s| !s.eq_ignore_ascii_case(name.trim()));
    }

    /// Build the presence map over every known symptom.
    pub fn symptom_map(&self) -> SymptomMap {
        SymptomMap::from_selection(self.available(), &self.selected)
    }

    pub fn submit(&mut self, api: &dyn HealthApi, session: &mut Session) -> Result<Route, PageError> {
        self.error = None;
        let result = self.predict(api, session);
        match result {
            Ok(prediction) => {
                tracing::info!(
                    disease = %prediction.predicted_disease,
                    symptoms = self.selected.len(),
                    "Prediction stored"
                );
                session.store_prediction(prediction);
                Ok(Route::Prediction)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn predict(
        &self,
        api: &dyn HealthApi,
        session: &Session,
    ) -> Result<PredictionResult, PageError> {
        if !self.available.is_loaded() {
            return Err(PageError::MissingData(
                "Symptom list is not available. Please try again later.".into(),
            ));
        }
        if self.selected.is_empty() {
            return Err(PageError::validation("Please select at least one symptom"));
        }
        let token = require_token(session)?;
        let map = self.symptom_map();

        api.add_symptoms(token, &SymptomSubmission::from_user(map.clone()))
            .map_err(|e| PageError::api(e, "Failed to submit symptoms"))?;
        api.predict(token, &map)
            .map_err(|e| PageError::api(e, "Failed to get prediction"))
    }
}

impl fmt::Display for SymptomsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Symptom Analysis")?;
        writeln!(f, "Describe your symptoms and get your health insights")?;
        match &self.available {
            Fetch::Loading => writeln!(f, "  Loading symptoms...")?,
            Fetch::Failed(_) => {}
            Fetch::Loaded(list) => writeln!(f, "  {} symptoms available", list.len())?,
        }
        if self.selected.is_empty() {
            writeln!(f, "  Selected: none")?;
        } else {
            writeln!(f, "  Selected: {}", self.selected.join(", "))?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "  ! {error}")?;
        }
        write!(
            f,
            "Disclaimer: this AI analysis is for informational purposes only and should not \
             replace professional medical advice."
        )
    }
}
