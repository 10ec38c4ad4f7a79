//! In-memory storage backend
//!
//! Used by tests and by `store.backend = "memory"` for store-less
//! development. Matches the MongoDB backend's observable behavior: documents
//! keep insertion order, `find`/`delete` act on the first match, and every
//! stored document carries a synthetic string `_id`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::types::{Song, SongId};
use crate::Result;

use super::SongStore;

pub struct MemoryStore {
    songs: RwLock<Vec<Song>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            songs: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Synthetic store identifier, shaped like an ObjectId hex string
    fn assign_id(&self) -> String {
        let sequence = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{sequence:024x}")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn list(&self) -> Result<Vec<Song>> {
        Ok(self.songs.read().await.clone())
    }

    async fn find(&self, id: SongId) -> Result<Option<Song>> {
        let songs = self.songs.read().await;
        Ok(songs.iter().find(|song| song.id == id).cloned())
    }

    async fn insert(&self, mut song: Song) -> Result<String> {
        let store_id = self.assign_id();
        song.fields
            .insert("_id".to_string(), Value::String(store_id.clone()));

        self.songs.write().await.push(song);
        Ok(store_id)
    }

    async fn delete(&self, id: SongId) -> Result<bool> {
        let mut songs = self.songs.write().await;
        match songs.iter().position(|song| song.id == id) {
            Some(index) => {
                songs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_all(&self, songs: Vec<Song>) -> Result<usize> {
        let mut stored = Vec::with_capacity(songs.len());
        for mut song in songs {
            let store_id = self.assign_id();
            song.fields
                .insert("_id".to_string(), Value::String(store_id));
            stored.push(song);
        }

        let count = stored.len();
        *self.songs.write().await = stored;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song(id: SongId, title: &str) -> Song {
        serde_json::from_value(json!({ "id": id, "title": title })).unwrap()
    }

    #[tokio::test]
    async fn insert_find_delete() {
        let store = MemoryStore::new();

        let store_id = store.insert(song(1, "A")).await.unwrap();
        assert_eq!(store_id.len(), 24);

        let found = store.find(1).await.unwrap().unwrap();
        assert_eq!(found.fields["title"], json!("A"));
        assert_eq!(found.fields["_id"], json!(store_id));

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.find(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_ids_are_representable() {
        let store = MemoryStore::new();
        store.insert(song(1, "first")).await.unwrap();
        store.insert(song(1, "second")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);

        // First match wins for both find and delete
        let found = store.find(1).await.unwrap().unwrap();
        assert_eq!(found.fields["title"], json!("first"));

        assert!(store.delete(1).await.unwrap());
        let found = store.find(1).await.unwrap().unwrap();
        assert_eq!(found.fields["title"], json!("second"));
    }

    #[tokio::test]
    async fn replace_all_drops_previous_contents() {
        let store = MemoryStore::new();
        store.insert(song(1, "old")).await.unwrap();

        let count = store
            .replace_all(vec![song(10, "a"), song(11, "b")])
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.find(1).await.unwrap().is_none());
        assert!(store.find(10).await.unwrap().is_some());

        assert_eq!(store.replace_all(Vec::new()).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
