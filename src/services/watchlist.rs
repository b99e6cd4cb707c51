use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, WatchlistEntry},
    storage::KeyValueStore,
};

/// Published to observers after every change to the watchlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchlistRevision {
    /// Increments once per change
    pub version: u64,
    pub len: usize,
    /// False when the change could not be written to storage
    pub durable: bool,
}

/// The user's saved movies, written through to persistent storage
///
/// Entries keep insertion order and are unique by identifier. Lookups are a
/// linear scan: a watchlist holds tens of items.
///
/// Each change is persisted and then announced on the revision channel, in
/// that order, so an observer woken by a revision can rely on the durable
/// copy already matching. If the write fails the in-memory list still keeps
/// the change; the revision is published with `durable: false` and the
/// caller receives `AppError::Persistence`.
pub struct WatchlistStore {
    entries: Vec<WatchlistEntry>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    revision: watch::Sender<WatchlistRevision>,
}

impl WatchlistStore {
    /// Loads the list stored under `key`
    ///
    /// Missing, unreadable or corrupt data yields an empty list; the next
    /// change overwrites the bad slot.
    pub async fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let entries = match storage.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
                Ok(entries) => dedup_by_id(entries),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Stored watchlist is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored watchlist, starting empty");
                Vec::new()
            }
        };

        tracing::info!(
            key = %key,
            entries = entries.len(),
            backend = storage.name(),
            "Watchlist loaded"
        );

        let (revision, _) = watch::channel(WatchlistRevision {
            version: 0,
            len: entries.len(),
            durable: true,
        });

        Self {
            entries,
            storage,
            key,
            revision,
        }
    }

    pub fn contains(&self, id: &MovieId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    /// Entries, oldest-added first
    pub fn list(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<WatchlistRevision> {
        self.revision.subscribe()
    }

    /// Appends `entry` unless its identifier is already present
    ///
    /// Returns whether the list changed.
    pub async fn add(&mut self, entry: WatchlistEntry) -> AppResult<bool> {
        if self.contains(entry.id()) {
            return Ok(false);
        }

        tracing::debug!(movie_id = %entry.id(), "Adding to watchlist");
        self.entries.push(entry);
        self.commit().await?;
        Ok(true)
    }

    /// Removes the entry for `id` if present
    ///
    /// Returns whether the list changed.
    pub async fn remove(&mut self, id: &MovieId) -> AppResult<bool> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);

        if self.entries.len() == before {
            return Ok(false);
        }

        tracing::debug!(movie_id = %id, "Removed from watchlist");
        self.commit().await?;
        Ok(true)
    }

    /// Removes `entry` if present, otherwise adds it
    ///
    /// Returns whether the entry is in the list afterwards.
    pub async fn toggle(&mut self, entry: WatchlistEntry) -> AppResult<bool> {
        if self.contains(entry.id()) {
            let id = entry.id().clone();
            self.remove(&id).await?;
            Ok(false)
        } else {
            self.add(entry).await?;
            Ok(true)
        }
    }

    async fn commit(&mut self) -> AppResult<()> {
        let persisted = self.persist().await;
        self.notify(persisted.is_ok());

        if let Err(e) = &persisted {
            tracing::error!(
                key = %self.key,
                error = %e,
                entries = self.entries.len(),
                "Watchlist change kept in memory but not persisted"
            );
        }

        persisted
    }

    async fn persist(&self) -> AppResult<()> {
        let raw = serde_json::to_string(&self.entries)
            .map_err(|e| AppError::Persistence(format!("Watchlist serialization error: {}", e)))?;

        self.storage
            .set(&self.key, &raw)
            .await
            .map_err(|e| match e {
                AppError::Persistence(_) => e,
                other => AppError::Persistence(other.to_string()),
            })
    }

    fn notify(&self, durable: bool) {
        let len = self.entries.len();
        self.revision.send_modify(|revision| {
            revision.version += 1;
            revision.len = len;
            revision.durable = durable;
        });
    }
}

/// Keeps the first occurrence of each identifier
fn dedup_by_id(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut unique: Vec<WatchlistEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.iter().any(|kept| kept.id() == entry.id()) {
            unique.push(entry);
        }
    }
    unique
}
