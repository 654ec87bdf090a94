use std::fmt;
use std::str::FromStr;

use super::{require_token, write_heading, Fetch, PageError, Route};
use crate::api::HealthApi;
use crate::models::{
    AlcoholConsumption, BloodType, Gender, ProfileUpdate, SmokingHabit, UserProfile,
};
use crate::session::Session;

const MAX_AGE: u32 = 120;
const MAX_HEIGHT_CM: u32 = 300;
const MAX_WEIGHT_KG: u32 = 500;
pub const PROFILE_NOT_LOADED: &str =
    "Your current profile could not be loaded. Reload it before saving changes.";

/// Raw form inputs. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsForm {
    pub full_name: String,
    pub age: String,
    pub gender: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub smoking: String,
    pub alcohol_consumption: String,
    pub blood_type: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
}

impl DetailsForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<f64>| v.map(|n| n.round().to_string()).unwrap_or_default();
        Self {
            full_name: text(&profile.full_name),
            age: profile.age.map(|a| a.to_string()).unwrap_or_default(),
            gender: text(&profile.gender),
            height_cm: number(profile.height_cm),
            weight_kg: number(profile.weight_kg),
            smoking: text(&profile.smoking),
            alcohol_consumption: text(&profile.alcohol_consumption),
            blood_type: text(&profile.blood_type),
            emergency_contact: text(&profile.emergency_contact),
            emergency_phone: text(&profile.emergency_phone),
        }
    }

    /// Parse and range-check every field into the update payload.
    pub fn to_update(&self) -> Result<ProfileUpdate, PageError> {
        Ok(ProfileUpdate {
            full_name: non_empty(&self.full_name),
            age: parse_age(&self.age)?,
            gender: parse_option::<Gender>(&self.gender)?,
            height_cm: parse_measure(&self.height_cm, "Height", MAX_HEIGHT_CM)?,
            weight_kg: parse_measure(&self.weight_kg, "Weight", MAX_WEIGHT_KG)?,
            smoking: parse_option::<SmokingHabit>(&self.smoking)?,
            alcohol_consumption: parse_option::<AlcoholConsumption>(&self.alcohol_consumption)?,
            blood_type: parse_option::<BloodType>(&self.blood_type)?,
            emergency_contact: non_empty(&self.emergency_contact),
            emergency_phone: non_empty(&self.emergency_phone),
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_age(raw: &str) -> Result<Option<u32>, PageError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(age) if (1..=MAX_AGE).contains(&age) => Ok(Some(age)),
        _ => Err(PageError::validation(format!(
            "Age must be a whole number between 1 and {MAX_AGE}"
        ))),
    }
}

/// Height and weight are stored as whole numbers.
fn parse_measure(raw: &str, label: &str, max: u32) -> Result<Option<u32>, PageError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(v) if (1..=max).contains(&v) => Ok(Some(v)),
        _ => Err(PageError::validation(format!(
            "{label} must be a whole number between 1 and {max}"
        ))),
    }
}

/// Validate against the closed option list, sending the canonical form value.
fn parse_option<T>(raw: &str) -> Result<Option<String>, PageError>
where
    T: FromStr<Err = crate::models::ModelError> + fmt::Display,
{
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(|v| Some(v.to_string()))
        .map_err(|e| PageError::validation(e.to_string()))
}

/// Health profile form shown after signup, prefilled from `/users/me`.
#[derive(Debug, Clone)]
pub struct PersonalDetailsPage {
    pub form: DetailsForm,
    profile: Fetch<UserProfile>,
    error: Option<String>,
}

impl PersonalDetailsPage {
    pub fn mount(api: &dyn HealthApi, session: &Session) -> Result<Self, PageError> {
        let token = require_token(session)?;
        let profile = Fetch::from_result(
            api.current_user(token),
            "profile",
            "Failed to fetch user profile",
        );
        let form = profile
            .loaded()
            .map(DetailsForm::from_profile)
            .unwrap_or_default();
        let error = profile.error().map(str::to_string);
        Ok(Self {
            form,
            profile,
            error,
        })
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn profile(&self) -> &Fetch<UserProfile> {
        &self.profile
    }

    /// Save the form. Refused until the current profile has loaded, since the
    /// update replaces every field and an empty form would wipe it.
    pub fn submit(&mut self, api: &dyn HealthApi, session: &Session) -> Result<Route, PageError> {
        if self.profile.loaded().is_none() {
            let err = PageError::MissingData(PROFILE_NOT_LOADED.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.error = None;
        let result = self.form.to_update().and_then(|update| {
            let token = require_token(session)?;
            api.update_profile(token, &update)
                .map_err(|e| PageError::api(e, "Failed to update profile"))
        });

        match result {
            Ok(updated) => {
                tracing::info!("Profile updated");
                self.form = DetailsForm::from_profile(&updated);
                self.profile = Fetch::Loaded(updated);
                Ok(Route::Dashboard)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl fmt::Display for PersonalDetailsPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };

        write_heading(f, "Complete Your Health Profile")?;
        writeln!(f, "  Full name:           {}", shown(&self.form.full_name))?;
        writeln!(f, "  Age:                 {}", shown(&self.form.age))?;
        writeln!(f, "  Gender:              {}", shown(&self.form.gender))?;
        writeln!(f, "  Height (cm):         {}", shown(&self.form.height_cm))?;
        writeln!(f, "  Weight (kg):         {}", shown(&self.form.weight_kg))?;
        writeln!(f, "  Smoking:             {}", shown(&self.form.smoking))?;
        writeln!(f, "  Alcohol consumption: {}", shown(&self.form.alcohol_consumption))?;
        writeln!(f, "  Blood type:          {}", shown(&self.form.blood_type))?;
        writeln!(f, "  Emergency contact:   {}", shown(&self.form.emergency_contact))?;
        write!(f, "  Emergency phone:     {}", shown(&self.form.emergency_phone))?;
        if let Some(error) = &self.error {
            write!(f, "\n  ! {error}")?;
        }
        Ok(())
    }
}
