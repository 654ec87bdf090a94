use std::fmt;

use super::{write_heading, PageError, Route};
use crate::session::Session;

pub const KEY_POINTS: [(&str, &str); 7] = [
    (
        "Not a Substitute for Professional Medical Care",
        "The information provided is not intended to replace professional medical advice, \
         diagnosis, or treatment.",
    ),
    (
        "Medication Information Only",
        "Drug information is general in nature and may not cover every use, precaution, \
         interaction or side effect.",
    ),
    (
        "Consult Healthcare Providers",
        "Always consult a qualified healthcare provider before starting, stopping or changing \
         any medication.",
    ),
    (
        "Emergency Situations",
        "In a medical emergency, call your local emergency number or go to the nearest \
         emergency room immediately.",
    ),
    (
        "Individual Variations",
        "Responses to medication vary with age, weight, medical history and other medications.",
    ),
    (
        "Accuracy Limitations",
        "AI-generated answers may be incomplete or out of date and should be verified.",
    ),
    (
        "Liability Disclaimer",
        "GoHealthy is not liable for decisions made on the basis of the information provided.",
    ),
];

pub const SEEK_HELP: [&str; 5] = [
    "Before starting any new medication or treatment",
    "If symptoms worsen or don't improve",
    "For personalized medical advice",
    "If you have questions about drug interactions",
    "For proper dosage and administration guidance",
];

pub const ACKNOWLEDGE_REQUIRED: &str = "Please acknowledge the disclaimer to continue";

/// Gate in front of the medication chat.
#[derive(Debug, Clone, Default)]
pub struct DisclaimerPage {
    disease: Option<String>,
    acknowledged: bool,
}

impl DisclaimerPage {
    pub fn mount(session: &Session) -> Self {
        Self {
            disease: session.prediction().map(|p| p.predicted_disease.clone()),
            acknowledged: false,
        }
    }

    pub fn disease(&self) -> Option<&str> {
        self.disease.as_deref()
    }

    pub fn acknowledge(&mut self, acknowledged: bool) {
        self.acknowledged = acknowledged;
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn proceed(&self) -> Result<Route, PageError> {
        if self.acknowledged {
            Ok(Route::Chat)
        } else {
            Err(PageError::validation(ACKNOWLEDGE_REQUIRED))
        }
    }
}

impl fmt::Display for DisclaimerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Disclaimer")?;
        writeln!(
            f,
            "Please read and acknowledge this disclaimer before proceeding to medication information"
        )?;
        match &self.disease {
            Some(disease) => writeln!(f, "Predicted condition: {disease}")?,
            None => writeln!(f, "No recent prediction. Answers will not be tailored to a condition.")?,
        }
        writeln!(f)?;
        for (title, body) in KEY_POINTS {
            writeln!(f, "  * {title}")?;
            writeln!(f, "    {body}")?;
        }
        writeln!(f)?;
        write_heading(f, "When to Seek Professional Help")?;
        for item in SEEK_HELP {
            writeln!(f, "  - {item}")?;
        }
        writeln!(f)?;
        write!(
            f,
            "  [{}] I acknowledge and understand",
            if self.acknowledged { "x" } else { " " }
        )
    }
}
