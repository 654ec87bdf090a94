//! Command-line front end. Each subcommand mounts one page, performs its
//! action and prints the rendered page to stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use uuid::Uuid;

use crate::api::HealthApi;
use crate::config;
use crate::pages::signup::SignupForm;
use crate::pages::{
    ChatPage, DashboardPage, DisclaimerPage, HealthReportPage, LandingPage, LoginPage, PageError,
    PersonalDetailsPage, PredictionPage, QueryPage, Route, SignupPage, SymptomsPage, UploadPage,
    LOGIN_REQUIRED,
};
use crate::session::{Session, SessionError, SessionStore};

#[derive(Parser, Debug)]
#[command(name = "gohealthy")]
#[command(about = "GoHealthy: symptom checks, medication guidance and health reports")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides GOHEALTHY_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and keep the session
    Login {
        email: String,
        #[arg(long, env = "GOHEALTHY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        first_name: String,
        last_name: String,
        email: String,
        #[arg(long, env = "GOHEALTHY_PASSWORD", hide_env_values = true)]
        password: String,
        /// Repeat the password
        #[arg(long)]
        confirm_password: String,
        /// Accept the terms of service and privacy policy
        #[arg(long)]
        agree_to_terms: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show or update the health profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List symptoms or run a symptom check
    Symptoms {
        #[command(subcommand)]
        action: SymptomsAction,
    },
    /// Show the latest prediction
    Prediction,
    /// Show the medication disclaimer
    Disclaimer {
        /// Acknowledge the disclaimer
        #[arg(long)]
        accept: bool,
    },
    /// Talk to the medication assistant (reads stdin when no message is given)
    Chat { messages: Vec<String> },
    /// Upload a prescription image or PDF
    Upload {
        file: PathBuf,
        /// Create reminders for every extracted medication
        #[arg(long)]
        set_reminders: bool,
    },
    /// Show the dashboard
    Dashboard,
    /// Manage medication reminders
    Reminders {
        #[command(subcommand)]
        action: ReminderAction,
    },
    /// Generate the PDF health report
    Report {
        /// Where to save the report (defaults to the reports directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show a stored prediction
    Query { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        height_cm: Option<String>,
        #[arg(long)]
        weight_kg: Option<String>,
        #[arg(long)]
        smoking: Option<String>,
        #[arg(long)]
        alcohol_consumption: Option<String>,
        #[arg(long)]
        blood_type: Option<String>,
        #[arg(long)]
        emergency_contact: Option<String>,
        #[arg(long)]
        emergency_phone: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SymptomsAction {
    /// List known symptoms, optionally filtered
    List { filter: Option<String> },
    /// Submit symptoms and get a prediction
    Check {
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReminderAction {
    Cancel { id: Uuid },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Run one command against `api`, loading and saving the session in `store`.
pub fn execute(
    command: Option<Commands>,
    api: &dyn HealthApi,
    store: &SessionStore,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut session = store.load()?;

    let Some(command) = command else {
        writeln!(out, "{}", LandingPage::mount(&session))?;
        return Ok(());
    };

    let route = command.route();
    if route.requires_auth() && !session.is_authenticated() {
        tracing::debug!(%route, "Signed out, refusing protected page");
        return Err(PageError::MissingData(LOGIN_REQUIRED.to_string()).into());
    }

    match command {
        Commands::Login { email, password } => {
            let mut page = LoginPage::with_credentials(&email, &password);
            let next = page.submit(api, &mut session)?;
            store.save(&session)?;
            writeln!(out, "Signed in. Continue at {next}")?;
        }
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            agree_to_terms,
        } => {
            let mut page = SignupPage::new(SignupForm {
                first_name,
                last_name,
                email,
                password,
                confirm_password,
                agree_to_terms,
            });
            let next = page.submit(api, &mut session)?;
            store.save(&session)?;
            writeln!(out, "Account created. Complete your profile at {next}")?;
        }
        Commands::Logout => {
            session.clear();
            store.clear()?;
            tracing::info!("Logged out");
            writeln!(out, "Signed out.")?;
        }
        Commands::Profile { action } => profile(action, api, &session, out)?,
        Commands::Symptoms { action } => {
            symptoms(action, api, &mut session, out)?;
            store.save(&session)?;
        }
        Commands::Prediction => {
            writeln!(out, "{}", PredictionPage::mount(api, &session))?;
        }
        Commands::Disclaimer { accept } => {
            let mut page = DisclaimerPage::mount(&session);
            page.acknowledge(accept);
            writeln!(out, "{page}")?;
            if accept {
                writeln!(out, "Continue at {}", page.proceed()?)?;
            }
        }
        Commands::Chat { messages } => chat(messages, api, &session, input, out)?,
        Commands::Upload {
            file,
            set_reminders,
        } => {
            let mut page = UploadPage::new();
            page.attach(&file)?;
            page.process(api, &session)?;
            if set_reminders {
                page.setup_reminders(api, &session)?;
            }
            writeln!(out, "{page}")?;
        }
        Commands::Dashboard => {
            writeln!(out, "{}", DashboardPage::mount(api, &session)?)?;
        }
        Commands::Reminders {
            action: ReminderAction::Cancel { id },
        } => {
            let mut page = DashboardPage::mount(api, &session)?;
            page.cancel_reminder(api, &session, id)?;
            writeln!(out, "Reminder cancelled.")?;
            writeln!(out, "{page}")?;
        }
        Commands::Report { output } => {
            let page = HealthReportPage::mount(api, &session)?;
            writeln!(out, "{page}")?;
            let preview = page.generate()?;
            let dest = output.unwrap_or_else(default_report_path);
            let saved = preview.save_to(&dest).map_err(PageError::from)?;
            writeln!(
                out,
                "Saved {} page(s), {} bytes to {}",
                preview.page_count(),
                preview.size_bytes(),
                saved.display()
            )?;
            preview.release().map_err(PageError::from)?;
        }
        Commands::Query { id } => {
            writeln!(out, "{}", QueryPage::mount(api, &session, id)?)?;
        }
    }
    Ok(())
}

impl Commands {
    /// The page a command acts on.
    pub fn route(&self) -> Route {
        match self {
            Commands::Login { .. } => Route::Login,
            Commands::Signup { .. } => Route::Signup,
            Commands::Logout => Route::Landing,
            Commands::Profile { .. } => Route::PersonalDetails,
            Commands::Symptoms { .. } => Route::Symptoms,
            Commands::Prediction => Route::Prediction,
            Commands::Disclaimer { .. } => Route::Disclaimer,
            Commands::Chat { .. } => Route::Chat,
            Commands::Upload { .. } => Route::Upload,
            Commands::Dashboard | Commands::Reminders { .. } => Route::Dashboard,
            Commands::Report { .. } => Route::Report,
            Commands::Query { id } => Route::Query(*id),
        }
    }
}

fn default_report_path() -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    config::reports_dir().join(format!("gohealthy-report-{date}.pdf"))
}

fn profile(
    action: ProfileAction,
    api: &dyn HealthApi,
    session: &Session,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut page = PersonalDetailsPage::mount(api, session)?;
    if let Some(error) = page.error() {
        return Err(PageError::MissingData(error.to_string()).into());
    }
    if let ProfileAction::Update {
        full_name,
        age,
        gender,
        height_cm,
        weight_kg,
        smoking,
        alcohol_consumption,
        blood_type,
        emergency_contact,
        emergency_phone,
    } = action
    {
        let form = &mut page.form;
        let fields: [(&mut String, Option<String>); 10] = [
            (&mut form.full_name, full_name),
            (&mut form.age, age),
            (&mut form.gender, gender),
            (&mut form.height_cm, height_cm),
            (&mut form.weight_kg, weight_kg),
            (&mut form.smoking, smoking),
            (&mut form.alcohol_consumption, alcohol_consumption),
            (&mut form.blood_type, blood_type),
            (&mut form.emergency_contact, emergency_contact),
            (&mut form.emergency_phone, emergency_phone),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        page.submit(api, session)?;
    }
    writeln!(out, "{page}")?;
    Ok(())
}

fn symptoms(
    action: SymptomsAction,
    api: &dyn HealthApi,
    session: &mut Session,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut page = SymptomsPage::mount(api);
    match action {
        SymptomsAction::List { filter } => {
            if let Some(error) = page.error() {
                return Err(PageError::MissingData(error.to_string()).into());
            }
            let names: Vec<&str> = match &filter {
                Some(query) => page.search(query),
                None => page.available().iter().map(String::as_str).collect(),
            };
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
        SymptomsAction::Check { symptoms } => {
            for name in &symptoms {
                page.select(name)?;
            }
            page.submit(api, session)?;
            writeln!(out, "{}", PredictionPage::mount(api, session))?;
        }
    }
    Ok(())
}

fn chat(
    messages: Vec<String>,
    api: &dyn HealthApi,
    session: &Session,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut page = ChatPage::mount(api, session)?;
    for message in page.messages() {
        writeln!(out, "Assistant: {}", message.content)?;
    }

    if !messages.is_empty() {
        for message in &messages {
            send_and_print(&mut page, api, session, message, out)?;
        }
        return Ok(());
    }

    writeln!(out, "Type a question, or \"exit\" to leave.")?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }
        send_and_print(&mut page, api, session, text, out)?;
    }
    Ok(())
}

fn send_and_print(
    page: &mut ChatPage,
    api: &dyn HealthApi,
    session: &Session,
    text: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if let Some(answer) = page.send(api, session, text)? {
        writeln!(out, "Assistant: {}", answer.content)?;
    }
    Ok(())
}
