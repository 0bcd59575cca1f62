//! The canonical watched list and its persistence.
//!
//! [`WatchedList`] is the only writer of the watched snapshot. Each state
//! transition (an accepted add, a remove that found its entry) is followed by
//! exactly one full-snapshot write; rejected adds and unknown removes write
//! nothing.

use crate::error::ReelError;
use crate::models::{WatchedEntry, WatchedSummary};
use crate::storage::{self, KeyValueStore, WATCHED_KEY};

/// Result of [`WatchedList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An entry with the same catalog id exists; the list is unchanged.
    AlreadyWatched,
}

pub struct WatchedList {
    entries: Vec<WatchedEntry>,
    store: Box<dyn KeyValueStore>,
}

impl WatchedList {
    /// Load the initial list from the store's snapshot.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = storage::load_watched(store.as_ref());
        tracing::debug!(count = entries.len(), "Loaded watched list");
        Self { entries, store }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_watched(&self, catalog_id: &str) -> bool {
        self.get(catalog_id).is_some()
    }

    pub fn get(&self, catalog_id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.catalog_id == catalog_id)
    }

    /// The rating the user gave when the movie was added.
    pub fn user_rating(&self, catalog_id: &str) -> Option<u8> {
        self.get(catalog_id).map(|e| e.user_rating)
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    /// Append an entry. Duplicate catalog ids are rejected.
    ///
    /// On a write failure the entry stays in memory; the next successful
    /// write persists it.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<AddOutcome, ReelError> {
        if self.is_watched(&entry.catalog_id) {
            tracing::debug!(catalog_id = %entry.catalog_id, "Already watched, ignoring add");
            return Ok(AddOutcome::AlreadyWatched);
        }
        WatchedEntry::check_rating(entry.user_rating)?;

        tracing::info!(catalog_id = %entry.catalog_id, title = %entry.title, "Added to watched");
        self.entries.push(entry);
        self.persist()?;
        Ok(AddOutcome::Added)
    }

    /// Remove an entry by catalog id. Returns `false` if it was not present.
    pub fn remove(&mut self, catalog_id: &str) -> Result<bool, ReelError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.catalog_id != catalog_id);
        if self.entries.len() == before {
            return Ok(false);
        }

        tracing::info!(catalog_id, "Removed from watched");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<(), ReelError> {
        let bytes = storage::encode_snapshot(&self.entries)?;
        self.store.store(WATCHED_KEY, &bytes)
    }
}
