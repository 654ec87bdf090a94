use std::fmt;

use super::{is_valid_email, write_heading, PageError, Route};
use crate::api::HealthApi;
use crate::session::Session;

#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn validate(&self) -> Result<(), PageError> {
        if !is_valid_email(&self.email) {
            return Err(PageError::validation("Please enter a valid email address"));
        }
        if self.password.is_empty() {
            return Err(PageError::validation("Password is required"));
        }
        Ok(())
    }

    /// Authenticate and store the token. Navigates to the dashboard.
    pub fn submit(&mut self, api: &dyn HealthApi, session: &mut Session) -> Result<Route, PageError> {
        self.error = None;
        let result = self.validate().and_then(|()| {
            api.login(&self.email, &self.password)
                .map_err(|e| PageError::api(e, "Login failed"))
        });

        match result {
            Ok(token) => {
                session.sign_in(token);
                tracing::info!("Logged in");
                Ok(Route::Dashboard)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

impl fmt::Display for LoginPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Welcome Back")?;
        writeln!(f, "Sign in to your GoHealthy account")?;
        writeln!(f, "  Email:    {}", self.email)?;
        writeln!(f, "  Password: {}", "*".repeat(self.password.chars().count()))?;
        if let Some(error) = &self.error {
            writeln!(f, "  ! {error}")?;
        }
        write!(f, "No account yet? {}", Route::Signup)
    }
}
