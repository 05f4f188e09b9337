use crate::application::errors::BotError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Role of a sender within a chat, as the host platform reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderRole {
    Member,
    Admin,
}

/// The bot's own identity on the host platform
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
}

/// Host trait - the capability surface the messaging platform provides.
///
/// The plugin never sniffs the platform for features; everything it needs
/// from the outside world goes through this one interface.
#[async_trait]
pub trait Host: Send + Sync {
    /// Send a plain text reply to a chat
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError>;

    /// The bot's own identity, used for self-message exclusion
    fn bot_info(&self) -> BotInfo;

    /// Role of a sender within a chat. Errors are treated as "deny".
    async fn sender_role(&self, chat_id: &str, sender_id: &str) -> Result<SenderRole, BotError>;

    /// Whether the chat is a multi-party (group) context
    fn is_group_context(&self, chat_id: &str) -> bool;

    /// Writable directory scoped to this plugin's data
    fn data_dir(&self) -> PathBuf;
}
