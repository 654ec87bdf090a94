use std::fmt;

use super::{require_token, write_heading, Fetch, PageError, Route};
use crate::api::HealthApi;
use crate::models::{PredictionResult, UserProfile};
use crate::session::Session;

pub const NO_PREDICTION: &str = "No prediction data found. Please submit symptoms first.";

/// Results of the latest symptom check, read from the session.
#[derive(Debug, Clone)]
pub struct PredictionPage {
    profile: Fetch<UserProfile>,
    prediction: Option<PredictionResult>,
}

impl PredictionPage {
    /// The profile is only used for the greeting; its failure is tolerated.
    pub fn mount(api: &dyn HealthApi, session: &Session) -> Self {
        let profile = match require_token(session) {
            Ok(token) => Fetch::from_result(
                api.current_user(token),
                "profile",
                "Failed to fetch user data",
            ),
            Err(e) => Fetch::Failed(e.to_string()),
        };
        Self {
            profile,
            prediction: session.prediction().cloned(),
        }
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    /// Error state shown instead of results, with the route that fixes it.
    pub fn error(&self) -> Option<(&'static str, Route)> {
        match self.prediction {
            None => Some((NO_PREDICTION, Route::Symptoms)),
            Some(_) => None,
        }
    }

    pub fn require_prediction(&self) -> Result<&PredictionResult, PageError> {
        self.prediction
            .as_ref()
            .ok_or_else(|| PageError::MissingData(NO_PREDICTION.to_string()))
    }

    /// Lower-cased first name, "user" when the profile did not load.
    pub fn greeting_name(&self) -> String {
        self.profile
            .loaded()
            .map(UserProfile::first_name)
            .unwrap_or("User")
            .to_lowercase()
    }
}

impl fmt::Display for PredictionPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(prediction) = &self.prediction else {
            writeln!(f, "{NO_PREDICTION}")?;
            return write!(f, "Go to Symptoms Page: {}", Route::Symptoms);
        };

        writeln!(
            f,
            "So, here are your symptoms analysis results {}",
            self.greeting_name()
        )?;
        writeln!(f)?;
        write_heading(f, "Primary Diagnosis")?;
        writeln!(f, "  {}", prediction.predicted_disease)?;
        writeln!(f, "  {}% confidence", prediction.confidence_percent())?;
        writeln!(f)?;

        let alternatives = prediction.alternatives();
        if !alternatives.is_empty() {
            write_heading(f, "Alternative Possibilities")?;
            writeln!(f, "Other conditions that could match your symptoms")?;
            for alt in alternatives {
                writeln!(f, "  {:<30} {:>3}%", alt.name, alt.percent())?;
            }
            writeln!(f)?;
        }

        write_heading(f, "Next Steps")?;
        writeln!(f, "  Ask about medications: {}", Route::Disclaimer)?;
        writeln!(f, "  Back to dashboard:     {}", Route::Dashboard)?;
        write!(
            f,
            "Important: this is an AI prediction, not a diagnosis. Consult a healthcare professional."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockHealthApi};
    use crate::models::{AuthToken, RankedDisease};

    fn session_with(prediction: Option<PredictionResult>) -> Session {
        let mut session = Session::new();
        session.sign_in(AuthToken::new("t"));
        if let Some(p) = prediction {
            session.store_prediction(p);
        }
        session
    }

    fn prediction() -> PredictionResult {
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

    #[test]
    fn missing_prediction_links_back_to_symptoms() {
        let page = PredictionPage::mount(&MockHealthApi::new(), &session_with(None));
        assert_eq!(page.error(), Some((NO_PREDICTION, Route::Symptoms)));
        let text = page.to_string();
        assert!(text.contains(NO_PREDICTION));
        assert!(text.contains("/symptoms"));
        assert!(page.require_prediction().is_err());
    }

    #[test]
    fn renders_primary_and_alternatives() {
        let page = PredictionPage::mount(&MockHealthApi::new(), &session_with(Some(prediction())));
        assert!(page.error().is_none());
        let text = page.to_string();
        assert!(text.contains("results asha"));
        assert!(text.contains("88% confidence"));
        assert!(text.contains("Common Cold"));
        assert!(text.contains("COVID-19"));
        assert!(text.contains("  4%"));
    }

    #[test]
    fn profile_failure_is_tolerated() {
        let api = MockHealthApi::new().with_profile(Err(ApiError::Connection("x".into())));
        let page = PredictionPage::mount(&api, &session_with(Some(prediction())));
        assert_eq!(page.greeting_name(), "user");
        assert!(page.to_string().contains("Influenza"));
    }
}
