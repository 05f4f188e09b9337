use super::Sender;
use chrono::{DateTime, Utc};

/// An incoming chat message as delivered by the host platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: String,
    pub chat_id: String,
    pub sender: Sender,
    /// Raw message text, untokenized
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(chat_id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
