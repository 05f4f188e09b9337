use crate::application::errors::StoreError;
use crate::domain::entities::CounterTable;
use async_trait::async_trait;

/// CounterStore trait - abstraction for counter table persistence
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Load the persisted table. A missing or unreadable document degrades
    /// to an empty table; this never fails the caller.
    async fn load(&self) -> CounterTable;

    /// Persist the whole table
    async fn save(&self, table: &CounterTable) -> Result<(), StoreError>;
}
