//! Persistent paper store.
//!
//! The store maps paper ids to paper records. One reserved key holds the
//! schema version of the stored data and is never yielded as a paper.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::paper::Paper;

/// Key holding the schema version marker.
pub const DATA_VERSION_KEY: &str = "dataVersion";

/// Errors from a paper store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Paper not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value access to the stored memory.
///
/// Every call is a suspension point; callers must await completion before
/// trusting reads that depend on a write.
pub trait PaperStore: Send + Sync {
    /// All papers, excluding the reserved version key.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Paper>, StoreError>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = Result<Option<Paper>, StoreError>> + Send;

    /// Insert or overwrite a paper by id. Last write wins.
    fn put(&self, paper: Paper) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a paper. Removing an unknown id is `StoreError::NotFound`.
    fn remove(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn data_version(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}

/// Store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    papers: RwLock<HashMap<String, Paper>>,
    data_version: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_papers(papers: impl IntoIterator<Item = Paper>) -> Self {
        Self {
            papers: RwLock::new(papers.into_iter().map(|p| (p.id.clone(), p)).collect()),
            data_version: None,
        }
    }

    pub fn with_data_version(mut self, version: impl Into<String>) -> Self {
        self.data_version = Some(version.into());
        self
    }
}

impl PaperStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<Paper>, StoreError> {
        Ok(self.papers.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Paper>, StoreError> {
        Ok(self.papers.read().await.get(id).cloned())
    }

    async fn put(&self, paper: Paper) -> Result<(), StoreError> {
        self.papers.write().await.insert(paper.id.clone(), paper);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        match self.papers.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }

    async fn data_version(&self) -> Result<Option<String>, StoreError> {
        Ok(self.data_version.clone())
    }
}

/// Store backed by one JSON object file, `{ "<id>": {paper}, "dataVersion": ... }`.
///
/// Each write reads the whole file, changes one record and writes everything
/// back. The internal lock serializes those read-modify-write cycles. The new
/// contents go to a sibling temp file that is renamed over the memory file, so
/// a failed write leaves the previous file intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(map)?;
        let tmp = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// `<memory file>.tmp`, next to the memory file.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PaperStore for JsonFileStore {
    async fn get_all(&self) -> Result<Vec<Paper>, StoreError> {
        let map = self.read_map().await?;
        let mut papers = Vec::with_capacity(map.len());
        for (id, value) in map {
            if id == DATA_VERSION_KEY {
                continue;
            }
            match serde_json::from_value::<Paper>(value) {
                Ok(paper) => papers.push(paper),
                Err(e) => tracing::warn!(paper_id = %id, error = %e, "skipping unreadable paper record"),
            }
        }
        Ok(papers)
    }

    async fn get(&self, id: &str) -> Result<Option<Paper>, StoreError> {
        if id == DATA_VERSION_KEY {
            return Ok(None);
        }
        let mut map = self.read_map().await?;
        match map.remove(id) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, paper: Paper) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(paper.id.clone(), serde_json::to_value(&paper)?);
        self.write_map(&map).await
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut map = self.read_map().await?;
        if id == DATA_VERSION_KEY || map.remove(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write_map(&map).await
    }

    async fn data_version(&self) -> Result<Option<String>, StoreError> {
        let map = self.read_map().await?;
        Ok(map.get(DATA_VERSION_KEY).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}
