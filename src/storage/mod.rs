//! Persistence backends for the serialized index.
//!
//! The index is an append-only JSON Lines document under a single key. Any
//! backend offering the [`IndexStorage`] operations can hold it; callers pick
//! one at construction time:
//!
//! - [`MemoryStorage`]: process-local map, for tests and throwaway indices
//! - [`LocalStorage`]: files under a root directory (`tokio::fs`)

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Result;

pub mod local;
pub mod memory;
pub mod util;

pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use util::{from_json_lines, to_json_line};

/// Key/value storage the index persists through.
#[async_trait]
pub trait IndexStorage: Debug + Send + Sync {
    /// Check whether `key` holds data
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Read the bytes stored at `key`, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the bytes stored at `key`
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Append to the bytes stored at `key`, creating it if absent
    async fn append(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// All keys starting with `prefix`, sorted
    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
