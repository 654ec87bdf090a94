use serde::{Deserialize, Serialize};

/// `GET /stats/user` counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStats {
    pub queries_resolved: u32,
    pub active_medications: u32,
    pub reminders_set: u32,
}

impl HealthStats {
    /// Local adjustment after a reminder is cancelled. Never goes below zero.
    pub fn medication_cancelled(&mut self) {
        self.active_medications = self.active_medications.saturating_sub(1);
    }
}
