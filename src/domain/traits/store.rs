use async_trait::async_trait;
use serde_json::Value;
use crate::application::errors::StorageError;

/// Hierarchical JSON document addressed by `/`-separated paths
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`; `Ok(None)` when nothing is stored there
    async fn get(&self, path: &str) -> Result<Option<Value>, StorageError>;

    /// Write `value` at `path`.
    ///
    /// With `overwrite = false` existing data wins: a missing path is created,
    /// two objects are merged by filling in only the absent keys, and any other
    /// existing value is left as is.
    async fn set(&self, path: &str, value: Value, overwrite: bool) -> Result<(), StorageError>;

    /// Top-level keys of the document
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}
