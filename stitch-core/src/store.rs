use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::StitchError;
use stitch_types::TimeSeries;

/// Hierarchical key/value store for combined daily series.
///
/// Keys are slash-separated paths such as
/// `interest_over_time/c0/world/web/tz0/daily/bitcoin`. Each key holds at most
/// one series; `insert` replaces any previous value.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Stable store name used in logs.
    fn name(&self) -> &'static str;

    /// Series stored under `key`, if any.
    async fn lookup(&self, key: &str) -> Result<Option<TimeSeries>, StitchError>;

    /// Store `series` under `key`, replacing any previous value, and return it.
    async fn insert(&self, key: &str, series: TimeSeries) -> Result<TimeSeries, StitchError>;

    /// Remove the series stored under `key`. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StitchError>;
}

/// Process-local store backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, TimeSeries>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl SeriesStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, key: &str) -> Result<Option<TimeSeries>, StitchError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn insert(&self, key: &str, series: TimeSeries) -> Result<TimeSeries, StitchError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), series.clone());
        Ok(series)
    }

    async fn delete(&self, key: &str) -> Result<(), StitchError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON document mapping keys to series.
///
/// Every write rewrites the whole document through a temporary file and a
/// rename. Operations on one instance are serialized.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Document = BTreeMap<String, TimeSeries>;

impl JsonFileStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StitchError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StitchError::Store(format!("corrupt store {}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(io_error(&self.path, &e)),
        }
    }

    async fn save(&self, doc: &Document) -> Result<(), StitchError> {
        let bytes = serde_json::to_vec(doc).map_err(|e| StitchError::Store(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| io_error(dir, &e))?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| io_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, &e))
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> StitchError {
    StitchError::Store(format!("{}: {e}", path.display()))
}

#[async_trait]
impl SeriesStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn lookup(&self, key: &str) -> Result<Option<TimeSeries>, StitchError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn insert(&self, key: &str, series: TimeSeries) -> Result<TimeSeries, StitchError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        doc.insert(key.to_string(), series.clone());
        self.save(&doc).await?;
        Ok(series)
    }

    async fn delete(&self, key: &str) -> Result<(), StitchError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;
        if doc.remove(key).is_some() {
            self.save(&doc).await?;
        }
        Ok(())
    }
}
