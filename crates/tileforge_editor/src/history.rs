//! Snapshot-based linear undo/redo
//!
//! The history is an ordered log of full document copies with a single
//! "current" pointer, persisted in its entirety on every mutation. Taking a
//! snapshot discards any redo future (linear history, not a tree) and drops
//! the oldest entries once the log exceeds its retention budget. Undo, redo,
//! and direct navigation only move the pointer; entry contents are never
//! rewritten.
//!
//! Persistence is best-effort: when the store rejects a snapshot for lack
//! of space the log is halved and written once more, and a second failure
//! skips persistence for that snapshot. The in-memory document stays
//! authoritative regardless.

use crate::store::{KeyValueStore, StoreError};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tileforge_core::Document;

/// Store key holding the serialized history log.
pub const HISTORY_KEY: &str = "history";

/// Default maximum number of retained entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// One retained snapshot of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub document: Document,
    pub label: String,
    pub timestamp: String,
    pub current: bool,
}

/// The append-only, pointer-addressed snapshot log.
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl HistoryManager {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
        }
    }

    /// Restore the log from the store. Missing or malformed data falls back
    /// to an empty log.
    pub fn load(store: &impl KeyValueStore, max_entries: usize) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Some(payload) => match serde_json::from_str::<Vec<HistoryEntry>>(&payload) {
                Ok(entries) if entries.iter().all(|e| e.document.is_well_formed()) => entries,
                Ok(_) => {
                    log::warn!("discarding history with malformed documents");
                    Vec::new()
                }
                Err(e) => {
                    log::warn!("discarding corrupt history: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self {
            entries,
            max_entries,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry the pointer rests on.
    pub fn current_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.current)
    }

    /// Document at the pointer, falling back to the newest entry. Used to
    /// restore editor state on startup.
    pub fn current_document(&self) -> Option<Document> {
        self.entries
            .iter()
            .find(|e| e.current)
            .or(self.entries.last())
            .map(|e| e.document.clone())
    }

    /// Record a new snapshot: discard the redo future, append a deep copy of
    /// `document` as the current entry, trim to the retention budget, and
    /// persist.
    pub fn snapshot(&mut self, store: &mut impl KeyValueStore, document: &Document, label: &str) {
        let keep = self.current_index().map(|i| i + 1).unwrap_or(0);
        self.entries.truncate(keep);
        for entry in &mut self.entries {
            entry.current = false;
        }
        self.entries.push(HistoryEntry {
            document: document.clone(),
            label: label.to_string(),
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            current: true,
        });

        // The current entry is the newest, so trimming from the front can
        // never drop it.
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }

        if let Err(StoreError::Full) = self.persist(store) {
            log::warn!("history store full, halving retained entries");
            let keep = (self.max_entries / 2).max(1);
            if self.entries.len() > keep {
                let excess = self.entries.len() - keep;
                self.entries.drain(..excess);
            }
            if let Err(e) = self.persist(store) {
                log::warn!("skipping history persistence for this snapshot: {}", e);
            }
        }
    }

    /// Move the pointer one entry back and return that document. A no-op at
    /// the start of the log.
    pub fn undo(&mut self, store: &mut impl KeyValueStore) -> Option<Document> {
        let current = self.current_index()?;
        if current == 0 {
            return None;
        }
        self.set_current(store, current - 1)
    }

    /// Move the pointer one entry forward and return that document. A no-op
    /// at the end of the log.
    pub fn redo(&mut self, store: &mut impl KeyValueStore) -> Option<Document> {
        let current = self.current_index()?;
        if current + 1 >= self.entries.len() {
            return None;
        }
        self.set_current(store, current + 1)
    }

    /// Jump the pointer to an arbitrary retained entry and return its
    /// document. `None` for an out-of-range index.
    pub fn navigate_to(
        &mut self,
        store: &mut impl KeyValueStore,
        index: usize,
    ) -> Option<Document> {
        if index >= self.entries.len() {
            return None;
        }
        self.set_current(store, index)
    }

    fn set_current(&mut self, store: &mut impl KeyValueStore, index: usize) -> Option<Document> {
        for entry in &mut self.entries {
            entry.current = false;
        }
        self.entries[index].current = true;
        if let Err(e) = self.persist(store) {
            log::warn!("could not persist history pointer: {}", e);
        }
        Some(self.entries[index].document.clone())
    }

    fn persist(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(&self.entries).map_err(|e| StoreError::SerializeError(e.to_string()))?;
        store.set(HISTORY_KEY, &payload)
    }
}
