use crate::application::errors::CommandError;
use crate::domain::entities::{AddOutcome, CounterTable, Hit, ListEntry, ListOrder};
use crate::domain::traits::CounterStore;
use tokio::sync::RwLock;

/// Owns the counter table for the process lifetime and drives every
/// mutation through one lock: validate, mutate, rebuild index, persist.
pub struct CounterService<S: CounterStore> {
    store: S,
    table: RwLock<CounterTable>,
}

impl<S: CounterStore> CounterService<S> {
    /// Loads persisted state once at startup; a failed load starts empty
    pub async fn load(store: S) -> Self {
        let table = store.load().await;
        tracing::info!("Counter data loaded, counters={}", table.len());
        Self {
            store,
            table: RwLock::new(table),
        }
    }

    /// Creates a counter or merges aliases into an existing one
    pub async fn add(&self, name: &str, aliases: &[String]) -> Result<AddOutcome, CommandError> {
        let mut table = self.table.write().await;
        let outcome = table.add(name, aliases).map_err(CommandError::Conflicts)?;
        self.persist(&table).await;
        Ok(outcome)
    }

    /// Deletes the counter `key` resolves to (name or alias)
    pub async fn delete(&self, key: &str) -> Result<String, CommandError> {
        let mut table = self.table.write().await;
        let name = table
            .delete(key)
            .ok_or_else(|| CommandError::NotFound(key.to_string()))?;
        self.persist(&table).await;
        Ok(name)
    }

    pub async fn list(&self, order: ListOrder) -> Vec<ListEntry> {
        self.table.read().await.list(order)
    }

    /// Scans a message and applies all increments as one batch, with a
    /// single disk write for the whole batch
    pub async fn record_message(&self, text: &str) -> Vec<Hit> {
        let mut table = self.table.write().await;
        let hits = table.bump_matches(text);
        if !hits.is_empty() {
            self.persist(&table).await;
        }
        hits
    }

    /// Final flush, called once at shutdown
    pub async fn flush(&self) {
        let table = self.table.read().await;
        self.persist(&table).await;
    }

    /// Best effort: a failed save is logged and the in-memory state stays
    /// ahead of disk until the next successful save
    async fn persist(&self, table: &CounterTable) {
        if let Err(e) = self.store.save(table).await {
            tracing::error!("Failed to persist counters: {}", e);
        }
    }
}
