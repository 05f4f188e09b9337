//! Message dispatcher - routes chat messages into the counter store

use std::sync::Arc;

use super::parser::{CntCommand, CommandParser};
use crate::application::errors::{BotError, CommandError};
use crate::application::services::{milestone_message, CounterService};
use crate::domain::entities::{Hit, IncomingMessage, ListOrder};
use crate::domain::traits::{CounterStore, Host, SenderRole};

const USAGE: &str =
    "Usage:\n/cnt add <name> [alias ...]\n/cnt del <name-or-alias>\n/cnt list";
const ADD_USAGE: &str = "Usage: /cnt add <name> [alias ...]";
const DEL_USAGE: &str = "Usage: /cnt del <name-or-alias>";

/// Reply policy knobs, resolved from configuration at startup
#[derive(Debug, Clone, Copy)]
pub struct ReplyPolicy {
    /// Whether auto-increments are acknowledged in chat
    pub notify_on_increment: bool,
    pub list_order: ListOrder,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            notify_on_increment: true,
            list_order: ListOrder::default(),
        }
    }
}

/// Routes every incoming message: management commands mutate the table,
/// anything else runs through the matching scan. Returns the reply text
/// to send, if any; sending stays with the caller.
pub struct CounterDispatcher<S: CounterStore, H: Host> {
    service: CounterService<S>,
    host: Arc<H>,
    parser: CommandParser,
    policy: ReplyPolicy,
}

impl<S: CounterStore, H: Host> CounterDispatcher<S, H> {
    pub fn new(
        service: CounterService<S>,
        host: Arc<H>,
        prefix: impl Into<String>,
        policy: ReplyPolicy,
    ) -> Self {
        Self {
            service,
            host,
            parser: CommandParser::new(prefix),
            policy,
        }
    }

    /// Handles one message and returns the reply, if any
    pub async fn handle(&self, message: &IncomingMessage) -> Result<Option<String>, BotError> {
        // The bot's own messages never count
        if message.sender.id == self.host.bot_info().id {
            return Ok(None);
        }
        let text = message.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        if let Some(command) = self.parser.parse(text) {
            tracing::debug!(
                "[{}] {} ran {:?}",
                message.chat_id,
                message.sender,
                command
            );
            return self.handle_command(message, command).await.map(Some);
        }

        let hits = self.service.record_message(text).await;
        if hits.is_empty() {
            return Ok(None);
        }
        tracing::debug!("[{}] counted {} hit(s)", message.chat_id, hits.len());
        if !self.policy.notify_on_increment {
            return Ok(None);
        }
        Ok(Some(render_hits(&hits)))
    }

    /// Final flush, called once at shutdown
    pub async fn flush(&self) {
        self.service.flush().await;
    }

    async fn handle_command(
        &self,
        message: &IncomingMessage,
        command: CntCommand,
    ) -> Result<String, BotError> {
        match command {
            CntCommand::Add { name, aliases } => Ok(self.add(&name, &aliases).await),
            CntCommand::Del { key } => Ok(self.delete(message, &key).await),
            CntCommand::List => Ok(self.list().await),
            CntCommand::AddUsage => Ok(ADD_USAGE.to_string()),
            CntCommand::DelUsage => Ok(DEL_USAGE.to_string()),
            CntCommand::Help => Ok(USAGE.to_string()),
        }
    }

    async fn add(&self, name: &str, aliases: &[String]) -> String {
        match self.service.add(name, aliases).await {
            Ok(outcome) => {
                format!(
                    "✅ Counter '{}' saved. Aliases: {}",
                    outcome.name,
                    join_or_none(&outcome.aliases)
                )
            }
            Err(CommandError::Conflicts(conflicts)) => {
                let mut lines = vec!["Could not add the counter:".to_string()];
                lines.extend(conflicts.iter().map(|c| format!("- {}", c)));
                lines.join("\n")
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn delete(&self, message: &IncomingMessage, key: &str) -> String {
        let result = if self.may_delete(message).await {
            self.service.delete(key).await
        } else {
            Err(CommandError::PermissionDenied)
        };
        match result {
            Ok(name) => format!("🗑️ Deleted counter '{}'.", name),
            Err(CommandError::NotFound(key)) => format!("Counter '{}' not found.", key),
            Err(CommandError::PermissionDenied) => {
                "❌ Only group admins can delete counters here.".to_string()
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    /// Group contexts require an admin sender; a failing role check denies
    async fn may_delete(&self, message: &IncomingMessage) -> bool {
        if !self.host.is_group_context(&message.chat_id) {
            return true;
        }
        match self
            .host
            .sender_role(&message.chat_id, &message.sender.id)
            .await
        {
            Ok(SenderRole::Admin) => true,
            Ok(SenderRole::Member) => false,
            Err(e) => {
                tracing::warn!(
                    "[{}] role check failed, denying delete: {}",
                    message.chat_id,
                    e
                );
                false
            }
        }
    }

    async fn list(&self) -> String {
        let entries = self.service.list(self.policy.list_order).await;
        if entries.is_empty() {
            return "No counters yet. Try: /cnt add <name> [alias ...]".to_string();
        }
        let mut lines = vec!["📊 Counters:".to_string()];
        for entry in entries {
            lines.push(format!(
                "- {}: {} (aliases: {})",
                entry.name,
                entry.count,
                join_or_none(&entry.aliases)
            ));
        }
        lines.join("\n")
    }
}

fn join_or_none(aliases: &[String]) -> String {
    if aliases.is_empty() {
        "none".to_string()
    } else {
        aliases.join(", ")
    }
}

/// Acknowledgement for a batch of increments. A single matched counter may
/// get a themed milestone message; several matches share one summary line.
fn render_hits(hits: &[Hit]) -> String {
    if let [hit] = hits {
        if let Some(message) = milestone_message(&hit.name, hit.count) {
            return message;
        }
        return format!("📈 {} +1 (now {})", hit.name, hit.count);
    }
    let parts: Vec<String> = hits
        .iter()
        .map(|h| format!("{} +1 (now {})", h.name, h.count))
        .collect();
    format!("📈 Counted: {}", parts.join(", "))
}
