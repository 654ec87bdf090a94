use std::fmt;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Sparse presence map: symptom name → 1 (present) or 0 (absent).
///
/// Entries keep the order they were built or received in, so a query lists
/// its symptoms the way the server stored them. Serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymptomMap(Vec<(String, u8)>);

impl SymptomMap {
    /// Build the full map from the known symptom list: every selected name
    /// maps to 1, every other known name to 0, in the order of `all`.
    pub fn from_selection<S: AsRef<str>>(all: &[String], selected: &[S]) -> Self {
        all.iter()
            .map(|name| {
                let present = selected.iter().any(|s| s.as_ref() == name);
                (name.clone(), u8::from(present))
            })
            .collect()
    }

    /// Names flagged present, in map order.
    pub fn present(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, flag)| *flag == 1)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn present_joined(&self) -> String {
        self.present().join(", ")
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, flag)| *flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set a flag, keeping the position of a name already present.
    fn insert(&mut self, name: String, flag: u8) {
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = flag,
            None => self.0.push((name, flag)),
        }
    }
}

impl FromIterator<(String, u8)> for SymptomMap {
    fn from_iter<I: IntoIterator<Item = (String, u8)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (name, flag) in iter {
            map.insert(name, flag);
        }
        map
    }
}

impl Serialize for SymptomMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, flag) in &self.0 {
            map.serialize_entry(name, flag)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymptomMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedFlags;

        impl<'de> Visitor<'de> for OrderedFlags {
            type Value = SymptomMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of symptom names to 0 or 1")
            }

            fn visit_map<A>(self, mut access: A) -> Result<SymptomMap, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = SymptomMap::default();
                while let Some((name, flag)) = access.next_entry::<String, u8>()? {
                    map.insert(name, flag);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedFlags)
    }
}

/// `POST /symptoms/add` body. The backend fills `disease` after prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSubmission {
    pub symptoms: SymptomMap,
    pub disease: String,
    pub source: String,
}

impl SymptomSubmission {
    pub fn from_user(symptoms: SymptomMap) -> Self {
        Self {
            symptoms,
            disease: String::new(),
            source: "user".to_string(),
        }
    }
}

/// A past symptom check with its prediction label (`GET /predictions/user_queries`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomQuery {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub symptoms: SymptomMap,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default = "no_prediction")]
    pub prediction: String,
}

fn no_prediction() -> String {
    "N/A".to_string()
}

impl SymptomQuery {
    /// Calendar date of submission, when the timestamp is parseable.
    pub fn submitted_on(&self) -> Option<NaiveDate> {
        let raw = self.submitted_at.as_deref()?;
        let date_part = raw.get(..10)?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }
}
