use std::fmt;
use std::thread;

use uuid::Uuid;

use super::{require_token, write_heading, Fetch, PageError, Route};
use crate::api::HealthApi;
use crate::models::{HealthStats, Reminder, SymptomQuery, UserProfile};
use crate::session::Session;

const QUICK_ACTIONS: [(&str, &str, Route); 3] = [
    ("Check Symptoms", "Get AI-powered health insights", Route::Symptoms),
    ("Upload Prescription", "Set medication reminders", Route::Upload),
    ("Health Report", "Download your health summary", Route::Report),
];

/// Home screen after login. Its four fetches run concurrently and fail
/// independently.
#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    profile: Fetch<UserProfile>,
    queries: Fetch<Vec<SymptomQuery>>,
    reminders: Fetch<Vec<Reminder>>,
    stats: Fetch<HealthStats>,
    error: Option<String>,
}

impl DashboardPage {
    pub fn mount(api: &dyn HealthApi, session: &Session) -> Result<Self, PageError> {
        let token = require_token(session)?;

        let (profile, queries, reminders, stats) = thread::scope(|s| {
            let profile = s.spawn(|| {
                Fetch::from_result(api.current_user(token), "profile", "Failed to fetch user data")
            });
            let queries = s.spawn(|| {
                Fetch::from_result(
                    api.user_queries(token),
                    "recent queries",
                    "Failed to fetch recent queries",
                )
            });
            let reminders = s.spawn(|| {
                Fetch::from_result(api.reminders(token), "reminders", "Failed to fetch reminders")
            });
            let stats = s.spawn(|| {
                Fetch::from_result(api.user_stats(token), "stats", "Failed to fetch health stats")
            });
            (
                join(profile, "Failed to fetch user data"),
                join(queries, "Failed to fetch recent queries"),
                join(reminders, "Failed to fetch reminders"),
                join(stats, "Failed to fetch health stats"),
            )
        });

        Ok(Self {
            profile,
            queries,
            reminders,
            stats,
            error: None,
        })
    }

    pub fn profile(&self) -> &Fetch<UserProfile> {
        &self.profile
    }

    pub fn queries(&self) -> &Fetch<Vec<SymptomQuery>> {
        &self.queries
    }

    pub fn stats(&self) -> &Fetch<HealthStats> {
        &self.stats
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn welcome(&self) -> String {
        let first = self
            .profile
            .loaded()
            .map(UserProfile::first_name)
            .unwrap_or("User");
        format!("Welcome back, {first}!")
    }

    pub fn initials(&self) -> String {
        self.profile
            .loaded()
            .map(UserProfile::initials)
            .unwrap_or_default()
    }

    /// Active reminders, in the order the server returned them.
    pub fn upcoming(&self) -> Vec<&Reminder> {
        self.reminders
            .loaded()
            .map(|list| list.iter().filter(|r| r.is_active()).collect())
            .unwrap_or_default()
    }

    /// Cancel a reminder on the server, then drop it from the upcoming list
    /// and adjust the active medication count.
    pub fn cancel_reminder(
        &mut self,
        api: &dyn HealthApi,
        session: &Session,
        id: Uuid,
    ) -> Result<(), PageError> {
        self.error = None;
        let result = self.send_cancellation(api, session, id);
        match result {
            Ok(()) => {
                if let Some(list) = self.reminders.loaded_mut() {
                    list.retain(|r| r.id != id);
                }
                if let Some(stats) = self.stats.loaded_mut() {
                    stats.medication_cancelled();
                }
                tracing::info!(%id, "Reminder cancelled");
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn send_cancellation(
        &self,
        api: &dyn HealthApi,
        session: &Session,
        id: Uuid,
    ) -> Result<(), PageError> {
        let reminder = self
            .reminders
            .loaded()
            .and_then(|list| list.iter().find(|r| r.id == id))
            .ok_or_else(|| PageError::MissingData(format!("Reminder {id} not found")))?;
        reminder
            .ensure_active()
            .map_err(|e| PageError::validation(e.to_string()))?;
        let token = require_token(session)?;
        let cancelled = api
            .cancel_reminder(token, id)
            .map_err(|e| PageError::api(e, "Failed to cancel reminder"))?;
        tracing::debug!(%id, status = cancelled.status.as_str(), "Server confirmed cancellation");
        Ok(())
    }
}

/// A panicked fetch thread becomes a failed slot like any other error.
fn join<T>(handle: thread::ScopedJoinHandle<'_, Fetch<T>>, fallback: &str) -> Fetch<T> {
    handle.join().unwrap_or_else(|_| {
        tracing::error!(fallback, "Fetch thread panicked");
        Fetch::Failed(fallback.to_string())
    })
}

impl fmt::Display for DashboardPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initials = self.initials();
        if initials.is_empty() {
            writeln!(f, "{}", self.welcome())?;
        } else {
            writeln!(f, "({initials}) {}", self.welcome())?;
        }
        if let Some(error) = self.profile.error() {
            writeln!(f, "  ! {error}")?;
        }
        writeln!(f, "Here's your health overview for today")?;
        writeln!(f)?;

        write_heading(f, "Quick Actions")?;
        for (title, description, route) in QUICK_ACTIONS {
            writeln!(f, "  {title:<20} {description:<32} {route}")?;
        }
        writeln!(f)?;

        write_heading(f, "Upcoming Reminders")?;
        match &self.reminders {
            Fetch::Loading => writeln!(f, "  Loading...")?,
            Fetch::Failed(e) => writeln!(f, "  ! {e}")?,
            Fetch::Loaded(_) => {
                let upcoming = self.upcoming();
                if upcoming.is_empty() {
                    writeln!(f, "  No upcoming reminders")?;
                }
                for r in upcoming {
                    let date = r
                        .start_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "N/A".into());
                    write!(f, "  {} {date} at {}", r.drug_name, r.timing)?;
                    if let Some(days) = r.duration_days() {
                        write!(f, " ({days} days)")?;
                    }
                    writeln!(f, "  [{}]", r.id)?;
                }
            }
        }
        writeln!(f)?;

        write_heading(f, "Recent Queries")?;
        match &self.queries {
            Fetch::Loading => writeln!(f, "  Loading...")?,
            Fetch::Failed(e) => writeln!(f, "  ! {e}")?,
            Fetch::Loaded(list) if list.is_empty() => writeln!(f, "  No recent queries")?,
            Fetch::Loaded(list) => {
                for q in list {
                    writeln!(f, "  Symptoms: {}", q.symptoms.present_joined())?;
                    writeln!(f, "    Prediction: {}", q.prediction)?;
                    if let Some(date) = q.submitted_on() {
                        writeln!(f, "    Submitted: {date}")?;
                    }
                }
            }
        }
        writeln!(f)?;

        write_heading(f, "Health Stats")?;
        match &self.stats {
            Fetch::Loading => writeln!(f, "  Loading...")?,
            Fetch::Failed(e) => writeln!(f, "  ! {e}")?,
            Fetch::Loaded(stats) => {
                writeln!(f, "  Queries resolved:   {}", stats.queries_resolved)?;
                writeln!(f, "  Active medications: {}", stats.active_medications)?;
                writeln!(f, "  Reminders set:      {}", stats.reminders_set)?;
            }
        }
        if let Some(error) = &self.error {
            write!(f, "  ! {error}")?;
        }
        Ok(())
    }
}
