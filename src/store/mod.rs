//! Document store abstraction layer
//!
//! Provides a unified interface over MongoDB and an in-memory backend

use async_trait::async_trait;

use crate::types::{Song, SongId};
use crate::Result;

pub mod memory;
pub mod mongo;

/// Song store trait
///
/// Uniqueness of `id` is advisory: none of these operations enforce it.
/// The duplicate check on create is a separate `find` performed by the
/// caller, so concurrent creates can still race.
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Count all documents in the collection
    async fn count(&self) -> Result<u64>;

    /// Fetch all documents
    async fn list(&self) -> Result<Vec<Song>>;

    /// Fetch the first document matching `id`
    async fn find(&self, id: SongId) -> Result<Option<Song>>;

    /// Insert a document, returning the store-assigned identifier as a string
    async fn insert(&self, song: Song) -> Result<String>;

    /// Delete the first document matching `id`; returns whether one was removed
    async fn delete(&self, id: SongId) -> Result<bool>;

    /// Drop the whole collection and repopulate it with `songs`
    async fn replace_all(&self, songs: Vec<Song>) -> Result<usize>;
}

/// Store configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
    Memory,
}

/// Create a store backend from config
pub async fn create_store(config: StoreConfig) -> Result<Box<dyn SongStore>> {
    match config {
        StoreConfig::Mongo {
            uri,
            database,
            collection,
        } => {
            let backend = mongo::MongoStore::connect(&uri, &database, &collection).await?;
            Ok(Box::new(backend))
        }
        StoreConfig::Memory => Ok(Box::new(memory::MemoryStore::new())),
    }
}
