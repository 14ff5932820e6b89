//! Client-local bookmark set ("saved tools").
//!
//! The set lives in a [`KeyValueStore`] under [`STORAGE_KEY`] as a JSON array
//! of tool ids. It has no server-side counterpart and is never synced.
//! Storage failures are logged and otherwise ignored.

mod storage;

pub use storage::*;

use std::collections::HashSet;

use crate::models::Tool;

/// Key the bookmark array is stored under.
pub const STORAGE_KEY: &str = "saved-tools";

pub struct BookmarkStore<S: KeyValueStore> {
    store: S,
    saved: HashSet<String>,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    /// Load the saved set. Unreadable or malformed data yields an empty set.
    pub fn load(store: S) -> Self {
        let saved = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    tracing::warn!("Failed to parse saved tools: {}", e);
                    HashSet::new()
                }
            },
            Ok(None) => HashSet::new(),
            Err(e) => {
                tracing::warn!("Failed to load saved tools: {}", e);
                HashSet::new()
            }
        };

        Self { store, saved }
    }

    /// Flip membership of `id` and persist. Returns whether `id` is now saved.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_saved = if self.saved.remove(id) {
            false
        } else {
            self.saved.insert(id.to_string());
            true
        };
        self.persist();
        now_saved
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    /// Saved ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.saved.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Bookmarked tools of a listing, in listing order.
    pub fn saved_tools(&self, tools: &[Tool]) -> Vec<Tool> {
        tools
            .iter()
            .filter(|t| self.saved.contains(&t.id))
            .cloned()
            .collect()
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.ids()) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!("Failed to encode saved tools: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(STORAGE_KEY, encoded) {
            tracing::warn!("Failed to save tools: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::ToolStatus;

    /// Store whose every call fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::Internal("storage unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), AppError> {
            Err(AppError::Internal("storage unavailable".to_string()))
        }
    }

    fn tool(id: &str) -> Tool {
        Tool {
            id: id.to_string(),
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            title: id.to_string(),
            description: String::new(),
            category: "General".to_string(),
            tags: vec![],
            url: String::new(),
            logo: "✨".to_string(),
            featured: false,
            upvotes: 0,
            status: Some(ToolStatus::Online),
            pricing: None,
        }
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let mut bookmarks = BookmarkStore::load(MemoryStore::new());
        bookmarks.toggle("keep");

        assert!(bookmarks.toggle("t1"));
        assert!(!bookmarks.toggle("t1"));
        assert_eq!(bookmarks.ids(), vec!["keep"]);

        assert!(!bookmarks.toggle("keep"));
        assert!(bookmarks.toggle("keep"));
        assert_eq!(bookmarks.ids(), vec!["keep"]);
    }

    #[test]
    fn test_every_toggle_rewrites_the_whole_set() {
        let mut bookmarks = BookmarkStore::load(MemoryStore::new());
        bookmarks.toggle("b");
        bookmarks.toggle("a");

        let store = bookmarks.into_inner();
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        let ids: Vec<String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(ids, vec!["a", "b"]);

        let reloaded = BookmarkStore::load(store);
        assert!(reloaded.is_saved("a"));
        assert!(reloaded.is_saved("b"));
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_malformed_data_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not an array".to_string()).unwrap();

        let bookmarks = BookmarkStore::load(store);
        assert!(bookmarks.is_empty());
    }

    #[test]
    fn test_broken_storage_is_not_fatal() {
        let mut bookmarks = BookmarkStore::load(BrokenStore);
        assert!(bookmarks.is_empty());
        assert!(bookmarks.toggle("t1"));
        assert!(bookmarks.is_saved("t1"));
    }

    #[test]
    fn test_saved_tools_keeps_listing_order() {
        let mut bookmarks = BookmarkStore::load(MemoryStore::new());
        bookmarks.toggle("c");
        bookmarks.toggle("a");

        let listing = vec![tool("a"), tool("b"), tool("c")];
        let saved: Vec<String> = bookmarks
            .saved_tools(&listing)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(saved, vec!["a", "c"]);
    }

    #[test]
    fn test_corrupt_file_recovers_on_next_toggle() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage{").unwrap();

        let mut bookmarks = BookmarkStore::load(FileStore::new(&path));
        assert!(bookmarks.is_empty());
        assert!(bookmarks.toggle("t1"));

        let reloaded = BookmarkStore::load(FileStore::new(&path));
        assert!(reloaded.is_saved("t1"));
        assert_eq!(reloaded.len(), 1);
    }
}
