use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ranked candidate disease with its probability (0..1).
///
/// The predict endpoint sends `["Flu", 0.91]` pairs while stored predictions
/// come back as `{"Flu": 0.91}` single-entry objects; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RankedWire", into = "(String, f64)")]
pub struct RankedDisease {
    pub name: String,
    pub probability: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RankedWire {
    Pair(String, f64),
    Map(BTreeMap<String, f64>),
}

impl TryFrom<RankedWire> for RankedDisease {
    type Error = String;

    fn try_from(wire: RankedWire) -> Result<Self, Self::Error> {
        match wire {
            RankedWire::Pair(name, probability) => Ok(Self { name, probability }),
            RankedWire::Map(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "ranked disease object must have exactly one entry, got {}",
                        map.len()
                    ));
                }
                map.into_iter()
                    .next()
                    .map(|(name, probability)| Self { name, probability })
                    .ok_or_else(|| "empty ranked disease object".to_string())
            }
        }
    }
}

impl From<RankedDisease> for (String, f64) {
    fn from(r: RankedDisease) -> Self {
        (r.name, r.probability)
    }
}

impl RankedDisease {
    pub fn percent(&self) -> u32 {
        to_percent(self.probability)
    }
}

/// `POST /predictions/predict` response, cached in the session for the
/// prediction, disclaimer and chat pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_disease: String,
    pub confidence: f64,
    #[serde(default)]
    pub top_3: Vec<RankedDisease>,
}

impl PredictionResult {
    pub fn confidence_percent(&self) -> u32 {
        to_percent(self.confidence)
    }

    /// Runner-up candidates: second and third of the ranking.
    pub fn alternatives(&self) -> &[RankedDisease] {
        let end = self.top_3.len().min(3);
        self.top_3.get(1..end).unwrap_or(&[])
    }
}

/// A persisted prediction (`GET /predictions/query/{id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub id: String,
    pub query_id: String,
    pub top_prediction: String,
    pub confidence: f64,
    #[serde(default)]
    pub top_3: Vec<RankedDisease>,
    #[serde(default)]
    pub predicted_at: Option<String>,
}

impl StoredPrediction {
    pub fn confidence_percent(&self) -> u32 {
        to_percent(self.confidence)
    }
}

fn to_percent(probability: f64) -> u32 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_response_with_pair_ranking() {
        let json = r#"{
            "predicted_disease": "Influenza",
            "confidence": 0.876,
            "top_3": [["Influenza", 0.876], ["Common Cold", 0.081], ["COVID-19", 0.043]]
        }"#;
        let p: PredictionResult = serde_json::from_str(json).unwrap();
        assert_eq!(p.confidence_percent(), 88);
        assert_eq!(p.top_3.len(), 3);
        assert_eq!(p.top_3[1].name, "Common Cold");
        assert_eq!(p.top_3[2].percent(), 4);
    }

    #[test]
    fn stored_prediction_with_object_ranking() {
        let json = r#"{
            "id": "p-1",
            "query_id": "q-1",
            "top_prediction": "Migraine",
            "confidence": 0.7,
            "top_3": [{"Migraine": 0.7}, {"Tension headache": 0.2}],
            "predicted_at": "2025-07-16T09:30:00"
        }"#;
        let p: StoredPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(p.top_3[1].name, "Tension headache");
        assert_eq!(p.confidence_percent(), 70);
    }

    #[test]
    fn multi_entry_object_is_rejected() {
        let json = r#"[{"A": 0.5, "B": 0.5}]"#;
        assert!(serde_json::from_str::<Vec<RankedDisease>>(json).is_err());
    }

    #[test]
    fn alternatives_are_second_and_third() {
        let p = PredictionResult {
            predicted_disease: "A".into(),
            confidence: 0.6,
            top_3: vec![
                RankedDisease { name: "A".into(), probability: 0.6 },
                RankedDisease { name: "B".into(), probability: 0.3 },
                RankedDisease { name: "C".into(), probability: 0.1 },
            ],
        };
        let names: Vec<&str> = p.alternatives().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn alternatives_tolerate_short_ranking() {
        let p = PredictionResult {
            predicted_disease: "A".into(),
            confidence: 1.0,
            top_3: vec![],
        };
        assert!(p.alternatives().is_empty());
    }

    #[test]
    fn serializes_ranking_as_pairs() {
        let r = RankedDisease { name: "Flu".into(), probability: 0.5 };
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"["Flu",0.5]"#);
    }
}
