//! File-based storage implementation

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::traits::DocumentStore;

/// JSON document store, persisted to a single file after every write
pub struct JsonStore {
    file: Option<PathBuf>,
    pretty: bool,
    doc: Arc<RwLock<Value>>,
}

impl JsonStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            file: None,
            pretty: false,
            doc: Arc::new(RwLock::new(Value::Object(Map::new()))),
        }
    }

    /// Open (or create) the document at `file`
    pub async fn open(file: impl Into<PathBuf>, pretty: bool) -> Result<Self, StorageError> {
        let file = file.into();

        if let Some(parent) = file.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let doc = match tokio::fs::read_to_string(&file).await {
            Ok(content) if content.trim().is_empty() => Value::Object(Map::new()),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Object(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if !doc.is_object() {
            return Err(StorageError::InvalidPath(format!(
                "{}: top level must be an object",
                file.display()
            )));
        }

        tracing::debug!("Opened document store at {}", file.display());

        Ok(Self {
            file: Some(file),
            pretty,
            doc: Arc::new(RwLock::new(doc)),
        })
    }

    async fn persist(&self, doc: &Value) -> Result<(), StorageError> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)?
        } else {
            serde_json::to_vec(doc)?
        };

        let tmp = file.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, file).await?;
        Ok(())
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn lookup<'a>(doc: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(doc, |node, seg| node.as_object()?.get(*seg))
}

/// Descend into `seg`, creating an empty object when it does not exist yet
fn child_object<'a>(node: &'a mut Value, seg: &str, path: &str) -> Result<&'a mut Value, StorageError> {
    let map = node
        .as_object_mut()
        .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?;
    Ok(map
        .entry(seg.to_string())
        .or_insert_with(|| Value::Object(Map::new())))
}

/// Copy keys of `incoming` that `existing` lacks; never replaces a present value
fn merge_missing(existing: &mut Value, incoming: Value) {
    if let (Value::Object(current), Value::Object(incoming)) = (existing, incoming) {
        for (key, value) in incoming {
            match current.get_mut(&key) {
                Some(slot) => merge_missing(slot, value),
                None => {
                    current.insert(key, value);
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StorageError> {
        let doc = self.doc.read().await;
        Ok(lookup(&doc, &segments(path)).cloned())
    }

    async fn set(&self, path: &str, value: Value, overwrite: bool) -> Result<(), StorageError> {
        let segs = segments(path);
        let mut doc = self.doc.write().await;

        match segs.split_last() {
            None => {
                if overwrite {
                    if !value.is_object() {
                        return Err(StorageError::InvalidPath(path.to_string()));
                    }
                    *doc = value;
                } else {
                    merge_missing(&mut doc, value);
                }
            }
            Some((last, parents)) => {
                let mut node: &mut Value = &mut doc;
                for seg in parents {
                    node = child_object(node, seg, path)?;
                }
                let map = node
                    .as_object_mut()
                    .ok_or_else(|| StorageError::InvalidPath(path.to_string()))?;

                match map.get_mut(*last) {
                    Some(existing) if !overwrite => merge_missing(existing, value),
                    _ => {
                        map.insert(last.to_string(), value);
                    }
                }
            }
        }

        // Persist while still holding the lock so the file never lags behind a later write
        self.persist(&doc).await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let doc = self.doc.read().await;
        Ok(doc
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }
}
