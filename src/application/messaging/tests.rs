//! End-to-end tests for the counter dispatcher

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{BotError, StoreError};
use crate::application::messaging::{CounterDispatcher, ReplyPolicy};
use crate::application::services::CounterService;
use crate::domain::entities::{Counter, CounterTable, IncomingMessage, Sender};
use crate::domain::traits::{BotInfo, CounterStore, Host, SenderRole};

#[derive(Default)]
struct MemoryStore {
    initial: HashMap<String, Counter>,
}

impl MemoryStore {
    fn with_counter(name: &str, count: u64, aliases: &[&str]) -> Self {
        let mut initial = HashMap::new();
        initial.insert(
            name.to_string(),
            Counter {
                count,
                aliases: aliases.iter().map(|s| s.to_string()).collect(),
            },
        );
        Self { initial }
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn load(&self) -> CounterTable {
        CounterTable::from_counters(self.initial.clone())
    }

    async fn save(&self, _table: &CounterTable) -> Result<(), StoreError> {
        Ok(())
    }
}

enum RoleAnswer {
    Admin,
    Member,
    Fails,
}

struct TestHost {
    group: bool,
    role: RoleAnswer,
}

#[async_trait]
impl Host for TestHost {
    async fn send_message(&self, _chat_id: &str, _text: &str) -> Result<(), BotError> {
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "bot".to_string(),
            name: "tally-bot".to_string(),
        }
    }

    async fn sender_role(
        &self,
        _chat_id: &str,
        _sender_id: &str,
    ) -> Result<SenderRole, BotError> {
        match self.role {
            RoleAnswer::Admin => Ok(SenderRole::Admin),
            RoleAnswer::Member => Ok(SenderRole::Member),
            RoleAnswer::Fails => Err(BotError::Host("role lookup unavailable".to_string())),
        }
    }

    fn is_group_context(&self, _chat_id: &str) -> bool {
        self.group
    }

    fn data_dir(&self) -> PathBuf {
        PathBuf::from("./data/tally-bot")
    }
}

async fn dispatcher(
    store: MemoryStore,
    host: TestHost,
    policy: ReplyPolicy,
) -> CounterDispatcher<MemoryStore, TestHost> {
    let service = CounterService::load(store).await;
    CounterDispatcher::new(service, Arc::new(host), "/", policy)
}

async fn direct_dispatcher() -> CounterDispatcher<MemoryStore, TestHost> {
    dispatcher(
        MemoryStore::default(),
        TestHost {
            group: false,
            role: RoleAnswer::Member,
        },
        ReplyPolicy::default(),
    )
    .await
}

fn message(text: &str) -> IncomingMessage {
    IncomingMessage::new("chat-1", Sender::new("user-1"), text)
}

#[tokio::test]
async fn full_add_match_delete_cycle() {
    let dispatcher = direct_dispatcher().await;

    let reply = dispatcher
        .handle(&message("/cnt add foo bar baz"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "✅ Counter 'foo' saved. Aliases: bar, baz");

    let reply = dispatcher
        .handle(&message("I love bar"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "📈 foo +1 (now 1)");

    // Deleting via an alias removes the whole counter
    let reply = dispatcher
        .handle(&message("/cnt del baz"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "🗑️ Deleted counter 'foo'.");

    let reply = dispatcher
        .handle(&message("/cnt list"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.starts_with("No counters yet"));
}

#[tokio::test]
async fn conflict_report_lists_every_problem() {
    let dispatcher = direct_dispatcher().await;
    dispatcher
        .handle(&message("/cnt add foo bar"))
        .await
        .unwrap();

    let reply = dispatcher
        .handle(&message("/cnt add new foo bar new"))
        .await
        .unwrap()
        .unwrap();
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines[0], "Could not add the counter:");
    assert_eq!(lines.len(), 4, "all three conflicts reported: {}", reply);
}

#[tokio::test]
async fn management_commands_never_increment() {
    let dispatcher = direct_dispatcher().await;
    dispatcher
        .handle(&message("/cnt add foo"))
        .await
        .unwrap();

    // Contains "foo" but is itself a management command
    dispatcher
        .handle(&message("/cnt del foo extra"))
        .await
        .unwrap();

    let reply = dispatcher
        .handle(&message("/cnt list"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("foo: 0"), "unexpected listing: {}", reply);
}

#[tokio::test]
async fn bot_messages_are_excluded() {
    let dispatcher = direct_dispatcher().await;
    dispatcher
        .handle(&message("/cnt add foo"))
        .await
        .unwrap();

    let own = IncomingMessage::new("chat-1", Sender::new("bot"), "foo foo foo");
    assert_eq!(dispatcher.handle(&own).await.unwrap(), None);

    let reply = dispatcher
        .handle(&message("/cnt list"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("foo: 0"));
}

#[tokio::test]
async fn group_delete_requires_admin() {
    let dispatcher = dispatcher(
        MemoryStore::with_counter("foo", 0, &[]),
        TestHost {
            group: true,
            role: RoleAnswer::Member,
        },
        ReplyPolicy::default(),
    )
    .await;

    let reply = dispatcher
        .handle(&message("/cnt del foo"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("group admins"), "unexpected reply: {}", reply);
}

#[tokio::test]
async fn group_admin_may_delete() {
    let dispatcher = dispatcher(
        MemoryStore::with_counter("foo", 0, &[]),
        TestHost {
            group: true,
            role: RoleAnswer::Admin,
        },
        ReplyPolicy::default(),
    )
    .await;

    let reply = dispatcher
        .handle(&message("/cnt del foo"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "🗑️ Deleted counter 'foo'.");
}

#[tokio::test]
async fn failing_role_check_denies() {
    let dispatcher = dispatcher(
        MemoryStore::with_counter("foo", 0, &[]),
        TestHost {
            group: true,
            role: RoleAnswer::Fails,
        },
        ReplyPolicy::default(),
    )
    .await;

    let reply = dispatcher
        .handle(&message("/cnt del foo"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("group admins"));

    // Fail-closed means no state change either
    let reply = dispatcher
        .handle(&message("/cnt list"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("foo: 0"));
}

#[tokio::test]
async fn silent_policy_still_counts() {
    let dispatcher = dispatcher(
        MemoryStore::with_counter("foo", 0, &[]),
        TestHost {
            group: false,
            role: RoleAnswer::Member,
        },
        ReplyPolicy {
            notify_on_increment: false,
            ..Default::default()
        },
    )
    .await;

    assert_eq!(dispatcher.handle(&message("foo!")).await.unwrap(), None);

    let reply = dispatcher
        .handle(&message("/cnt list"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.contains("foo: 1"));
}

#[tokio::test]
async fn single_match_milestones_get_themed_replies() {
    let dispatcher = dispatcher(
        MemoryStore::with_counter("foo", 99, &[]),
        TestHost {
            group: false,
            role: RoleAnswer::Member,
        },
        ReplyPolicy::default(),
    )
    .await;

    let reply = dispatcher
        .handle(&message("foo again"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "🎉 Congratulations! 'foo' has reached 100!");
}

#[tokio::test]
async fn multi_match_skips_milestones_for_a_summary() {
    let mut initial = HashMap::new();
    initial.insert(
        "foo".to_string(),
        Counter {
            count: 99,
            aliases: vec![],
        },
    );
    initial.insert(
        "bar".to_string(),
        Counter {
            count: 0,
            aliases: vec![],
        },
    );
    let dispatcher = dispatcher(
        MemoryStore { initial },
        TestHost {
            group: false,
            role: RoleAnswer::Member,
        },
        ReplyPolicy::default(),
    )
    .await;

    let reply = dispatcher
        .handle(&message("foo and bar"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, "📈 Counted: bar +1 (now 1), foo +1 (now 100)");
}

#[tokio::test]
async fn bare_command_prints_usage() {
    let dispatcher = direct_dispatcher().await;
    let reply = dispatcher
        .handle(&message("/cnt"))
        .await
        .unwrap()
        .unwrap();
    assert!(reply.starts_with("Usage:"));
}
