//! Counter table with a derived alias index

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A single keyword counter, in the shape it persists on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub count: u64,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Listing order for the counter table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListOrder {
    /// Most active counters first, name ascending breaks ties
    #[default]
    CountDesc,
    /// Plain alphabetical listing
    NameAsc,
}

/// A conflict found while validating an add operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddConflict {
    #[error("name '{name}' is already used as an alias of '{owner}'")]
    NameTakenByAlias { name: String, owner: String },

    #[error("alias '{alias}' is empty or equal to the counter name")]
    AliasInvalid { alias: String },

    #[error("alias '{alias}' collides with an existing counter name")]
    AliasTakenByName { alias: String },

    #[error("alias '{alias}' is already used by counter '{owner}'")]
    AliasTakenByAlias { alias: String, owner: String },
}

/// Result of a successful add
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Canonical name, case-preserved from the first add
    pub name: String,
    pub count: u64,
    /// Full alias list now stored for the counter
    pub aliases: Vec<String>,
    /// False when an existing counter was merged into
    pub created: bool,
}

/// A counter incremented by one message scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub name: String,
    /// Value after the increment
    pub count: u64,
}

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub count: u64,
    pub aliases: Vec<String>,
}

/// Normalizes a key for comparison: trimmed and Unicode-lowercased
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Case-folded lookup keys derived from the counter map; never the source of truth
#[derive(Debug, Clone, Default)]
struct KeyIndex {
    /// folded name -> canonical name
    names: HashMap<String, String>,
    /// folded alias -> canonical name of the owning counter
    aliases: HashMap<String, String>,
}

/// Rebuilds both lookup maps from the counter map alone
fn build_index(counters: &HashMap<String, Counter>) -> KeyIndex {
    let mut index = KeyIndex::default();
    for (name, counter) in counters {
        let folded = fold(name);
        for alias in &counter.aliases {
            let folded_alias = fold(alias);
            if folded_alias.is_empty() || folded_alias == folded {
                continue;
            }
            index.aliases.insert(folded_alias, name.clone());
        }
        index.names.insert(folded, name.clone());
    }
    index
}

/// In-memory table of counters keyed by canonical name.
///
/// Names and aliases are unique across the whole table when case-folded.
/// The lookup index is rebuilt from the counter map after every structural
/// mutation, so it can never drift from the table.
#[derive(Debug, Default)]
pub struct CounterTable {
    counters: HashMap<String, Counter>,
    index: KeyIndex,
}

impl CounterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a persisted counter map, deriving the indexes
    pub fn from_counters(counters: HashMap<String, Counter>) -> Self {
        let index = build_index(&counters);
        Self { counters, index }
    }

    /// The raw counter map, as persisted
    pub fn counters(&self) -> &HashMap<String, Counter> {
        &self.counters
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Resolves a name or alias to the canonical counter name.
    /// Aliases take precedence, matching the delete addressing rule.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let folded = fold(key);
        self.index
            .aliases
            .get(&folded)
            .or_else(|| self.index.names.get(&folded))
            .map(String::as_str)
    }

    /// Looks up a counter by name or alias
    pub fn get(&self, key: &str) -> Option<&Counter> {
        let name = self.resolve(key)?.to_string();
        self.counters.get(&name)
    }

    /// Adds a counter or merges aliases into an existing one.
    ///
    /// `name` must be non-empty after trimming. Re-adding an existing name
    /// keeps its count and unions the new aliases. Every conflict is
    /// collected and returned together, never just the first.
    pub fn add(&mut self, name: &str, aliases: &[String]) -> Result<AddOutcome, Vec<AddConflict>> {
        let name = name.trim();
        let folded_name = fold(name);
        debug_assert!(!folded_name.is_empty(), "caller must supply a non-empty name");

        // Deduplicate aliases within the call, first spelling wins
        let mut seen = HashSet::new();
        let mut cleaned: Vec<String> = Vec::new();
        for alias in aliases {
            let alias = alias.trim();
            if seen.insert(fold(alias)) {
                cleaned.push(alias.to_string());
            }
        }

        let existing = self.index.names.get(&folded_name).cloned();

        let mut conflicts = Vec::new();
        if existing.is_none() {
            if let Some(owner) = self.index.aliases.get(&folded_name) {
                conflicts.push(AddConflict::NameTakenByAlias {
                    name: name.to_string(),
                    owner: owner.clone(),
                });
            }
        }

        for alias in &cleaned {
            let folded_alias = fold(alias);
            if folded_alias.is_empty() || folded_alias == folded_name {
                conflicts.push(AddConflict::AliasInvalid {
                    alias: alias.clone(),
                });
            } else if self.index.names.contains_key(&folded_alias) {
                conflicts.push(AddConflict::AliasTakenByName {
                    alias: alias.clone(),
                });
            } else if let Some(owner) = self.index.aliases.get(&folded_alias) {
                // An alias the counter already carries is a no-op, not a conflict
                if existing.as_deref() != Some(owner.as_str()) {
                    conflicts.push(AddConflict::AliasTakenByAlias {
                        alias: alias.clone(),
                        owner: owner.clone(),
                    });
                }
            }
        }

        if !conflicts.is_empty() {
            return Err(conflicts);
        }

        let (canonical, created) = match existing {
            Some(current) => (current, false),
            None => (name.to_string(), true),
        };

        let entry = self.counters.entry(canonical.clone()).or_default();
        for alias in cleaned {
            if entry.aliases.iter().any(|a| fold(a) == fold(&alias)) {
                continue;
            }
            entry.aliases.push(alias);
        }
        let outcome = AddOutcome {
            name: canonical,
            count: entry.count,
            aliases: entry.aliases.clone(),
            created,
        };

        self.index = build_index(&self.counters);
        Ok(outcome)
    }

    /// Removes the counter `key` resolves to, aliases and all.
    /// Returns the canonical name of the removed counter.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        let name = self.resolve(key)?.to_string();
        self.counters.remove(&name);
        self.index = build_index(&self.counters);
        Some(name)
    }

    /// Applies one scan of `text`: every counter whose name or any alias
    /// occurs in the case-folded text as a substring gains exactly one
    /// increment, no matter how many patterns or occurrences matched.
    pub fn bump_matches(&mut self, text: &str) -> Vec<Hit> {
        let folded_text = fold(text);
        if folded_text.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for (name, counter) in &mut self.counters {
            let matched = std::iter::once(name.as_str())
                .chain(counter.aliases.iter().map(String::as_str))
                .any(|pattern| {
                    let folded = fold(pattern);
                    !folded.is_empty() && folded_text.contains(&folded)
                });
            if matched {
                counter.count = counter.count.saturating_add(1);
                hits.push(Hit {
                    name: name.clone(),
                    count: counter.count,
                });
            }
        }
        // Deterministic reply order; the map iterates in arbitrary order
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        hits
    }

    /// All counters in the requested order
    pub fn list(&self, order: ListOrder) -> Vec<ListEntry> {
        let mut entries: Vec<ListEntry> = self
            .counters
            .iter()
            .map(|(name, counter)| ListEntry {
                name: name.clone(),
                count: counter.count,
                aliases: counter.aliases.clone(),
            })
            .collect();
        match order {
            ListOrder::CountDesc => {
                entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)))
            }
            ListOrder::NameAsc => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        entries
    }
}
