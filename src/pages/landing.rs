use std::fmt;

use super::{write_heading, Route};
use crate::config::APP_NAME;
use crate::session::Session;

pub const FEATURES: &[(&str, &str)] = &[
    ("Symptom Analysis", "Describe your symptoms and get an AI-powered assessment"),
    ("Medication Guidance", "Ask the assistant about drugs, dosages and interactions"),
    ("Health Tracking", "Keep your queries, reminders and reports in one place"),
    ("AI Chat Support", "Follow up on a prediction with a conversational assistant"),
];

pub const STEPS: &[(&str, &str)] = &[
    ("Sign Up", "Create your account and complete your health profile"),
    ("Input Symptoms", "Describe your symptoms for AI analysis"),
    ("Get Insights", "Receive AI-powered health insights and recommendations"),
    ("Chat & Track", "Chat with AI for detailed guidance and track your health"),
];

/// Public entry page. Links depend only on whether a token is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingPage {
    signed_in: bool,
}

impl LandingPage {
    pub fn mount(session: &Session) -> Self {
        Self {
            signed_in: session.is_authenticated(),
        }
    }

    pub fn links(&self) -> Vec<Route> {
        if self.signed_in {
            vec![Route::Dashboard]
        } else {
            vec![Route::Login, Route::Signup]
        }
    }
}

impl fmt::Display for LandingPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{APP_NAME}: your personal health companion")?;
        writeln!(f)?;
        write_heading(f, "Comprehensive Health Management")?;
        for (name, description) in FEATURES {
            writeln!(f, "  * {name}: {description}")?;
        }
        writeln!(f)?;
        write_heading(f, "How It Works")?;
        for (i, (name, description)) in STEPS.iter().enumerate() {
            writeln!(f, "  {}. {name}: {description}", i + 1)?;
        }
        writeln!(f)?;
        let links: Vec<String> = self.links().iter().map(Route::path).collect();
        write!(f, "Get started: {}", links.join("  "))
    }
}
