//! JSON-backed persistence for the counter table

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::errors::StoreError;
use crate::domain::entities::{Counter, CounterTable};
use crate::domain::traits::CounterStore;

pub const DATA_FILE_NAME: &str = "counters.json";

/// On-disk document shape: {"counters": {name: {"count": .., "aliases": [..]}}}
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    counters: HashMap<String, Counter>,
}

/// Stores the whole counter table as one indented JSON document
pub struct JsonCounterStore {
    path: PathBuf,
}

impl JsonCounterStore {
    /// Places `counters.json` inside the plugin data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(DATA_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CounterStore for JsonCounterStore {
    async fn load(&self) -> CounterTable {
        if !self.path.exists() {
            return CounterTable::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<Document>(&raw) {
                Ok(document) => CounterTable::from_counters(document.counters),
                Err(e) => {
                    tracing::error!("Failed to parse {}: {}", self.path.display(), e);
                    CounterTable::new()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read {}: {}", self.path.display(), e);
                CounterTable::new()
            }
        }
    }

    async fn save(&self, table: &CounterTable) -> Result<(), StoreError> {
        let document = Document {
            counters: table.counters().clone(),
        };
        let path = self.path.clone();
        // The write runs on a blocking worker so it cannot stall the event
        // loop; the handler still awaits it before returning
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&document)?;
            std::fs::write(&path, json)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }
}
