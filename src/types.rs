//! Core types for the song catalog

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application-level song identifier, distinct from the store's internal id
pub type SongId = i64;

/// A song document: one required integer `id` plus arbitrary fields.
///
/// The collection is schema-less; everything besides `id` passes through
/// unvalidated. Documents read back from a store may additionally carry the
/// store's own identifier (e.g. `_id`) among the flattened fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: SongId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
