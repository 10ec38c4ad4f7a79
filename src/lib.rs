//! Song Catalog - a minimal HTTP CRUD service over a document store
//!
//! The service exposes a single song collection:
//! - Health and count probes
//! - List, fetch-by-id, create, delete-by-id over JSON
//! - MongoDB-backed persistence with an in-memory backend for tests
//! - Simple HTTP API

pub mod api;
pub mod config;
pub mod error;
pub mod seed;
pub mod store;
pub mod types;

pub use error::{Error, Result};
