//! Console adapter for development/testing

use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;

use crate::application::errors::BotError;
use crate::domain::traits::{BotInfo, Host, SenderRole};

/// Console host for local development. Replies print to stdout; the
/// operator is treated as an admin in a direct (non-group) chat.
pub struct ConsoleHost {
    info: BotInfo,
    data_dir: PathBuf,
}

impl ConsoleHost {
    pub fn new(name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: name.into(),
            },
            data_dir: data_dir.into(),
        }
    }

    /// Reads one line from stdin; None on EOF
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut input = String::new();
        match std::io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input.trim().to_string()),
        }
    }
}

#[async_trait]
impl Host for ConsoleHost {
    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }

    async fn sender_role(
        &self,
        _chat_id: &str,
        _sender_id: &str,
    ) -> Result<SenderRole, BotError> {
        // The console operator owns the process
        Ok(SenderRole::Admin)
    }

    fn is_group_context(&self, _chat_id: &str) -> bool {
        false
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}
