use std::fmt;

use uuid::Uuid;

use super::{require_token, write_heading, Fetch, PageError, Route};
use crate::api::HealthApi;
use crate::models::StoredPrediction;
use crate::session::Session;

/// A past prediction looked up by its query id.
#[derive(Debug, Clone)]
pub struct QueryPage {
    query_id: Uuid,
    prediction: Fetch<StoredPrediction>,
}

impl QueryPage {
    pub fn mount(api: &dyn HealthApi, session: &Session, query_id: Uuid) -> Result<Self, PageError> {
        let token = require_token(session)?;
        let prediction = Fetch::from_result(
            api.stored_prediction(token, query_id),
            "stored prediction",
            "Failed to fetch prediction",
        );
        Ok(Self {
            query_id,
            prediction,
        })
    }

    pub fn route(&self) -> Route {
        Route::Query(self.query_id)
    }

    pub fn prediction(&self) -> &Fetch<StoredPrediction> {
        &self.prediction
    }
}

impl fmt::Display for QueryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Stored Prediction")?;
        writeln!(f, "Query: {}", self.query_id)?;
        let p = match &self.prediction {
            Fetch::Loading => return write!(f, "  Loading..."),
            Fetch::Failed(e) => return write!(f, "  ! {e}"),
            Fetch::Loaded(p) => p,
        };
        if let Some(at) = &p.predicted_at {
            writeln!(f, "Predicted at: {at}")?;
        }
        writeln!(f, "  {} ({}% confidence)", p.top_prediction, p.confidence_percent())?;
        for ranked in &p.top_3 {
            writeln!(f, "    {:<30} {:>3}%", ranked.name, ranked.percent())?;
        }
        write!(f, "Back to dashboard: {}", Route::Dashboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCall, MockHealthApi};
    use crate::models::{AuthToken, RankedDisease};

    fn signed_in() -> Session {
        let mut session = Session::new();
        session.sign_in(AuthToken::new("t"));
        session
    }

    #[test]
    fn shows_stored_ranking() {
        let id = Uuid::new_v4();
        let api = MockHealthApi::new().with_stored_prediction(Ok(StoredPrediction {
            id: "p1".into(),
            query_id: id.to_string(),
            top_prediction: "Migraine".into(),
            confidence: 0.72,
            top_3: vec![
                RankedDisease { name: "Migraine".into(), probability: 0.72 },
                RankedDisease { name: "Tension headache".into(), probability: 0.2 },
            ],
            predicted_at: Some("2025-07-16T09:30:00".into()),
        }));
        let page = QueryPage::mount(&api, &signed_in(), id).unwrap();
        assert_eq!(api.calls(), vec![ApiCall::StoredPrediction(id)]);
        assert_eq!(page.route(), Route::Query(id));
        let text = page.to_string();
        assert!(text.contains("Migraine (72% confidence)"));
        assert!(text.contains("Tension headache"));
    }

    #[test]
    fn missing_prediction_shows_detail() {
        let page = QueryPage::mount(&MockHealthApi::new(), &signed_in(), Uuid::new_v4()).unwrap();
        assert_eq!(page.prediction().error(), Some("Prediction not found"));
        assert!(page.to_string().contains("! Prediction not found"));
    }
}
