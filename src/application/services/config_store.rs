use serde_json::Value;
use std::sync::Arc;

use crate::application::errors::StorageError;
use crate::domain::traits::DocumentStore;

/// Thin wrapper over the document store used by guild bootstrapping.
///
/// Reads never fail: a storage error is logged and reported as absent so the
/// dispatch path can branch on presence alone.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<dyn DocumentStore>,
}

impl ConfigStore {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self { inner }
    }

    pub async fn get(&self, path: &str) -> Option<Value> {
        match self.inner.get(path).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Store read of '{}' failed, treating as absent: {}", path, e);
                None
            }
        }
    }

    pub async fn set(&self, path: &str, value: Value, overwrite: bool) -> Result<(), StorageError> {
        self.inner.set(path, value, overwrite).await
    }

    /// Create-if-absent write
    pub async fn merge(&self, path: &str, value: Value) -> Result<(), StorageError> {
        self.set(path, value, false).await
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.keys().await.unwrap_or_else(|e| {
            tracing::warn!("Store key listing failed: {}", e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _path: &str) -> Result<Option<Value>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        async fn set(&self, _path: &str, _value: Value, _overwrite: bool) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        async fn keys(&self) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_absent() {
        let store = ConfigStore::new(Arc::new(BrokenStore));
        assert_eq!(store.get("/1").await, None);
        assert!(store.keys().await.is_empty());
        assert!(store.set("/1", json!({}), true).await.is_err());
    }
}
