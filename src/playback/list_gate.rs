use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::MediaKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: u64,
    #[serde(rename = "mediaType")]
    pub media_kind: MediaKind,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("list storage unavailable: {0}")]
    Storage(String),
    #[error("list data could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable "my list" storage shared by every view.
///
/// Membership is answered synchronously. Mutations are written through before they
/// resolve; the store deduplicates by title id.
#[allow(async_fn_in_trait)]
pub trait ListStore {
    fn contains(&self, title_id: u64) -> bool;

    fn entries(&self) -> Vec<ListEntry>;

    async fn insert(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError>;

    async fn remove(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError>;
}

/// Transient message shown after a list mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotice {
    pub message: &'static str,
    pub is_error: bool,
}

impl ListNotice {
    fn success(message: &'static str) -> Self {
        Self {
            message,
            is_error: false,
        }
    }

    fn failure(message: &'static str) -> Self {
        Self {
            message,
            is_error: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListMembershipGate<S> {
    store: S,
}

impl<S: ListStore> ListMembershipGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_favorited(&self, title_id: u64) -> bool {
        self.store.contains(title_id)
    }

    pub async fn add(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError> {
        self.store.insert(title_id, kind).await
    }

    pub async fn remove(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError> {
        self.store.remove(title_id, kind).await
    }

    /// Adds or removes depending on `currently_favorited`. On success returns the new
    /// membership; on failure the caller keeps its old state and shows the notice.
    pub async fn toggle(
        &self,
        title_id: u64,
        kind: MediaKind,
        currently_favorited: bool,
    ) -> (Option<bool>, ListNotice) {
        if currently_favorited {
            match self.remove(title_id, kind).await {
                Ok(()) => (Some(false), ListNotice::success("Removed from My List")),
                Err(err) => {
                    tracing::warn!(title_id, %err, "failed to remove title from list");
                    (
                        None,
                        ListNotice::failure("Failed to remove from list. Please try again."),
                    )
                }
            }
        } else {
            match self.add(title_id, kind).await {
                Ok(()) => (Some(true), ListNotice::success("Added to My List")),
                Err(err) => {
                    tracing::warn!(title_id, %err, "failed to add title to list");
                    (
                        None,
                        ListNotice::failure("Failed to add to list. Please try again."),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Default)]
    pub(crate) struct MemoryListStore {
        entries: RefCell<Vec<ListEntry>>,
        pub fail_writes: Cell<bool>,
    }

    impl ListStore for MemoryListStore {
        fn contains(&self, title_id: u64) -> bool {
            self.entries.borrow().iter().any(|entry| entry.id == title_id)
        }

        fn entries(&self) -> Vec<ListEntry> {
            self.entries.borrow().clone()
        }

        async fn insert(&self, title_id: u64, kind: MediaKind) -> Result<(), ListError> {
            if self.fail_writes.get() {
                return Err(ListError::Storage("quota exceeded".into()));
            }
            if !self.contains(title_id) {
                self.entries.borrow_mut().push(ListEntry {
                    id: title_id,
                    media_kind: kind,
                    date_added: Utc::now(),
                });
            }
            Ok(())
        }

        async fn remove(&self, title_id: u64, _kind: MediaKind) -> Result<(), ListError> {
            if self.fail_writes.get() {
                return Err(ListError::Storage("quota exceeded".into()));
            }
            self.entries.borrow_mut().retain(|entry| entry.id != title_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn toggle_adds_then_removes() {
        let gate = ListMembershipGate::new(MemoryListStore::default());
        assert!(!gate.is_favorited(550));

        let (state, notice) = gate.toggle(550, MediaKind::Movie, false).await;
        assert_eq!(state, Some(true));
        assert_eq!(notice.message, "Added to My List");
        assert!(gate.is_favorited(550));

        let (state, notice) = gate.toggle(550, MediaKind::Movie, true).await;
        assert_eq!(state, Some(false));
        assert_eq!(notice.message, "Removed from My List");
        assert!(!gate.is_favorited(550));
    }

    #[tokio::test]
    async fn add_is_deduplicated_by_id() {
        let gate = ListMembershipGate::new(MemoryListStore::default());
        gate.add(1399, MediaKind::Series).await.unwrap();
        gate.add(1399, MediaKind::Series).await.unwrap();
        assert_eq!(gate.store().entries().len(), 1);
    }

    #[tokio::test]
    async fn failure_leaves_state_and_reports() {
        let store = MemoryListStore::default();
        store.fail_writes.set(true);
        let gate = ListMembershipGate::new(store);

        let (state, notice) = gate.toggle(550, MediaKind::Movie, false).await;
        assert_eq!(state, None);
        assert!(notice.is_error);
        assert_eq!(notice.message, "Failed to add to list. Please try again.");
        assert!(!gate.is_favorited(550));
    }

    #[test]
    fn entries_serialize_in_stored_shape() {
        let entry = ListEntry {
            id: 550,
            media_kind: MediaKind::Movie,
            date_added: "2024-01-02T03:04:05Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 550);
        assert_eq!(json["mediaType"], "movie");
        assert_eq!(json["dateAdded"], "2024-01-02T03:04:05Z");
    }
}
