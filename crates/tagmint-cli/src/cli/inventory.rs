use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tagmint::{MemoryStore, OwnerScope, RecordId};

/// On-disk inventory export the backfill command reads and rewrites.
///
/// Only the fields the engine cares about are modeled. The schema is
/// closed (`deny_unknown_fields`): a file with extra fields is refused
/// up front instead of being silently truncated on rewrite.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryFile {
    pub items: Vec<InventoryItem>,
}

/// One catalog record in the export.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryItem {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl InventoryFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut raw = serde_json::to_string_pretty(self).context("serializing inventory")?;
        raw.push('\n');
        fs::write(path, raw).with_context(|| format!("writing {}", path.display()))
    }

    /// Mirrors the file into `store` under `owner`, preserving item order
    /// so the backfill walks oldest entries first.
    ///
    /// Identifier text is seeded verbatim, corrupt values included; the
    /// engine is the one that decides what to do about those.
    pub fn seed(&self, store: &MemoryStore, owner: &OwnerScope) {
        for item in &self.items {
            match item.identifier.as_deref() {
                Some(text) => store.insert_record_with_identifier(owner, item.id.clone(), text),
                None => store.insert_record(owner, item.id.clone()),
            }
        }
    }

    /// Copies identifiers assigned in `store` back onto items that had
    /// none, returning the changed pairs in file order.
    pub fn absorb(&mut self, store: &MemoryStore, owner: &OwnerScope) -> Vec<(RecordId, String)> {
        let mut assigned = Vec::new();
        for item in &mut self.items {
            if item.identifier.is_some() {
                continue;
            }
            if let Some(text) = store.identifier_of(owner, &item.id) {
                item.identifier = Some(text.clone());
                assigned.push((item.id.clone(), text));
            }
        }
        assigned
    }
}
