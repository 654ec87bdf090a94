use std::fmt;

use super::{is_valid_email, write_heading, PageError, Route};
use crate::api::HealthApi;
use crate::models::SignupRequest;
use crate::session::Session;

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl SignupForm {
    /// Client-side checks, in the order the form reports them.
    pub fn validate(&self) -> Result<SignupRequest, PageError> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if first.is_empty() || last.is_empty() {
            return Err(PageError::validation("First and last name are required"));
        }
        if !is_valid_email(&self.email) {
            return Err(PageError::validation("Please enter a valid email address"));
        }
        if self.password.is_empty() {
            return Err(PageError::validation("Password is required"));
        }
        if self.password != self.confirm_password {
            return Err(PageError::validation("Passwords do not match"));
        }
        if !self.agree_to_terms {
            return Err(PageError::validation(
                "Please agree to the terms and conditions",
            ));
        }
        Ok(SignupRequest {
            full_name: format!("{first} {last}"),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupPage {
    pub form: SignupForm,
    error: Option<String>,
}

impl SignupPage {
    pub fn new(form: SignupForm) -> Self {
        Self { form, error: None }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Create the account and sign in. Continues to the personal details form.
    pub fn submit(&mut self, api: &dyn HealthApi, session: &mut Session) -> Result<Route, PageError> {
        self.error = None;
        let result = self.form.validate().and_then(|request| {
            api.signup(&request)
                .map_err(|e| PageError::api(e, "Signup failed"))
        });

        match result {
            Ok(token) => {
                session.sign_in(token);
                tracing::info!("Account created");
                Ok(Route::PersonalDetails)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl fmt::Display for SignupPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Create Your Account")?;
        writeln!(f, "  First name: {}", self.form.first_name)?;
        writeln!(f, "  Last name:  {}", self.form.last_name)?;
        writeln!(f, "  Email:      {}", self.form.email)?;
        writeln!(
            f,
            "  [{}] I agree to the Terms of Service and Privacy Policy",
            if self.form.agree_to_terms { "x" } else { " " }
        )?;
        if let Some(error) = &self.error {
            writeln!(f, "  ! {error}")?;
        }
        write!(f, "Already have an account? {}", Route::Login)
    }
}
