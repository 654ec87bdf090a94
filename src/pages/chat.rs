use std::fmt;

use chrono::{Local, NaiveDateTime};

use super::{require_token, write_heading, PageError};
use crate::api::HealthApi;
use crate::models::{ChatAuthor, ChatMessage, ChatRequest};
use crate::session::Session;

pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";
pub const SERVICE_UNAVAILABLE: &str = "Error: Unable to get response from AI service.";

/// Medication assistant conversation. The disease from the last prediction
/// is attached to every request.
#[derive(Debug, Clone)]
pub struct ChatPage {
    messages: Vec<ChatMessage>,
    next_id: u64,
    disease: Option<String>,
}

impl ChatPage {
    /// Open the conversation with the assistant's greeting.
    pub fn mount(api: &dyn HealthApi, session: &Session) -> Result<Self, PageError> {
        let token = require_token(session)?;
        let mut page = Self {
            messages: Vec::new(),
            next_id: 1,
            disease: session.prediction().map(|p| p.predicted_disease.clone()),
        };

        let greeting = match api.chat(token, &ChatRequest::greeting(page.disease())) {
            Ok(reply) => reply
                .bot
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Chat greeting failed");
                SERVICE_UNAVAILABLE.to_string()
            }
        };
        page.push(ChatAuthor::Assistant, greeting);
        Ok(page)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn disease(&self) -> Option<&str> {
        self.disease.as_deref()
    }

    /// Send one user message and append the reply. Blank input is ignored and
    /// returns `None`; otherwise the assistant's message is returned.
    pub fn send(
        &mut self,
        api: &dyn HealthApi,
        session: &Session,
        message: &str,
    ) -> Result<Option<&ChatMessage>, PageError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }
        let token = require_token(session)?;
        self.push(ChatAuthor::User, message.to_string());

        let request = ChatRequest::new(message, self.disease());
        let reply = match api.chat(token, &request) {
            Ok(reply) => reply.text().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                SERVICE_UNAVAILABLE.to_string()
            }
        };
        self.push(ChatAuthor::Assistant, reply);
        Ok(self.messages.last())
    }

    fn push(&mut self, author: ChatAuthor, content: String) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            author,
            content,
            timestamp: now(),
        });
        self.next_id += 1;
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl fmt::Display for ChatPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "Medication Assistant")?;
        if let Some(disease) = &self.disease {
            writeln!(f, "Condition: {disease}")?;
        }
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let who = match message.author {
                ChatAuthor::User => "You",
                ChatAuthor::Assistant => "Assistant",
            };
            write!(
                f,
                "[{}] {who}: {}",
                message.timestamp.format("%H:%M"),
                message.content
            )?;
        }
        Ok(())
    }
}
