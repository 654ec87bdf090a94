use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ChatAuthor;

/// Shown when the assistant answers with neither `bot` nor `answer`.
pub const UNDERSTOOD_NOTHING: &str = "Sorry, I couldn't understand that.";

/// `POST /chat/` body. `disease` comes from the session prediction,
/// `drug` repeats the message so the backend can match drug names in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub disease: Option<String>,
    pub drug: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, disease: Option<&str>) -> Self {
        let message = message.into();
        Self {
            drug: Some(message.clone()),
            disease: disease.map(str::to_string),
            message,
        }
    }

    /// Opening request sent when the chat page mounts. Carries no drug.
    pub fn greeting(disease: Option<&str>) -> Self {
        Self {
            message: "start".to_string(),
            disease: disease.map(str::to_string),
            drug: None,
        }
    }

    pub fn is_greeting(&self) -> bool {
        self.message == "start"
    }
}

/// `POST /chat/` response. Older backends answer under `answer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub bot: Option<String>,
    pub answer: Option<String>,
}

impl ChatReply {
    /// Text to display: `bot`, else `answer`, else the fallback.
    pub fn text(&self) -> &str {
        [self.bot.as_deref(), self.answer.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .unwrap_or(UNDERSTOOD_NOTHING)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author: ChatAuthor,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_repeats_message_as_drug() {
        let req = ChatRequest::new("Can I take ibuprofen?", Some("Influenza"));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["message"], "Can I take ibuprofen?");
        assert_eq!(body["drug"], "Can I take ibuprofen?");
        assert_eq!(body["disease"], "Influenza");
    }

    #[test]
    fn request_without_prediction_sends_null_disease() {
        let body = serde_json::to_value(ChatRequest::new("hi", None)).unwrap();
        assert!(body["disease"].is_null());
    }

    #[test]
    fn reply_prefers_bot_then_answer() {
        let both: ChatReply = serde_json::from_str(r#"{"bot": "B", "answer": "A"}"#).unwrap();
        assert_eq!(both.text(), "B");
        let answer: ChatReply = serde_json::from_str(r#"{"answer": "A"}"#).unwrap();
        assert_eq!(answer.text(), "A");
        let empty_bot: ChatReply = serde_json::from_str(r#"{"bot": "", "answer": "A"}"#).unwrap();
        assert_eq!(empty_bot.text(), "A");
    }

    #[test]
    fn reply_without_text_uses_fallback() {
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.text(), UNDERSTOOD_NOTHING);
    }
}
