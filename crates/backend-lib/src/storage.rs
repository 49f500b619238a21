// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Document store abstraction with a flat-file implementation.
//!
//! Callers check out a [`StoreSession`] per request and drop it when done;
//! the session holds a pool slot for its whole lifetime.
use crate::config::StoreSettings;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::{
    fs,
    io::{ErrorKind, SeekFrom},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::{
    fs as tokio_fs,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::{Mutex, OwnedSemaphorePermit, Semaphore},
};

/// A stored document, also used as an exact-match filter
pub type Document = serde_json::Map<String, Value>;

/// Collection holding user records
pub const USERS_COLLECTION: &str = "users";

/// Trait for credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check out a session. The slot is returned when the session drops.
    async fn checkout(&self) -> Result<Box<dyn StoreSession>, AppError>;
}

/// A checked-out handle on the store
#[async_trait]
pub trait StoreSession: Send + Sync {
    /// Insert a document into a collection
    async fn insert(&self, collection: &str, doc: Document) -> Result<(), AppError>;

    /// All documents matching every key of `filter`, in insertion order
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, AppError>;

    /// First document matching `filter`
    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<Option<Document>, AppError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }
}

/// Build a document from any serializable struct
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, AppError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Exact-match filter from key/value pairs
pub fn filter<I, K>(pairs: I) -> Document
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn validate_collection(collection: &str) -> Result<(), AppError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Internal(format!(
            "invalid collection name {collection:?}"
        )))
    }
}

/// Flat-file implementation: one JSON-lines file per collection.
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    pool: Arc<Semaphore>,
    checkout_timeout: Duration,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub const DEFAULT_POOL_SIZE: usize = 16;
    pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_millis(5000);

    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        Self::with_pool(root, Self::DEFAULT_POOL_SIZE, Self::DEFAULT_CHECKOUT_TIMEOUT)
    }

    pub fn with_pool<P: AsRef<Path>>(
        root: P,
        pool_size: usize,
        checkout_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        tracing::info!(root = %root.display(), pool_size, "flat-file store opened");
        Ok(Self {
            root,
            pool: Arc::new(Semaphore::new(pool_size)),
            checkout_timeout,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn from_settings(settings: &StoreSettings) -> anyhow::Result<Self> {
        Self::with_pool(
            settings.data_dir.join(&settings.database),
            settings.pool_size,
            Duration::from_millis(settings.checkout_timeout_ms),
        )
    }

    /// Number of sessions that can be checked out right now
    pub fn available_sessions(&self) -> usize {
        self.pool.available_permits()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl CredentialStore for FlatFileStorage {
    async fn checkout(&self) -> Result<Box<dyn StoreSession>, AppError> {
        let permit = tokio::time::timeout(self.checkout_timeout, self.pool.clone().acquire_owned())
            .await
            .map_err(|_| AppError::Internal("timed out waiting for a store session".to_string()))?
            .map_err(|_| AppError::Internal("store pool is closed".to_string()))?;

        tracing::trace!(available = self.pool.available_permits(), "store session checked out");

        Ok(Box::new(FlatFileSession {
            root: self.root.clone(),
            write_lock: self.write_lock.clone(),
            _permit: permit,
        }))
    }
}

/// Session over a [`FlatFileStorage`]; releases its pool slot on drop
struct FlatFileSession {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
    _permit: OwnedSemaphorePermit,
}

impl FlatFileSession {
    fn collection_path(&self, collection: &str) -> Result<PathBuf, AppError> {
        validate_collection(collection)?;
        Ok(self.root.join(format!("{collection}.jsonl")))
    }
}

/// Cut an unterminated record left by an interrupted append so the next
/// line starts on a fresh line.
async fn truncate_torn_tail(file: &mut tokio_fs::File, path: &Path) -> Result<(), AppError> {
    if file.metadata().await?.len() == 0 {
        return Ok(());
    }
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    if last[0] == b'\n' {
        return Ok(());
    }

    let content = tokio_fs::read(path).await?;
    let keep = content
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    tracing::warn!(
        path = %path.display(),
        dropped_bytes = content.len() - keep,
        "truncating torn record at end of collection"
    );
    file.set_len(keep as u64).await?;
    Ok(())
}

impl Drop for FlatFileSession {
    fn drop(&mut self) {
        tracing::trace!("store session released");
    }
}

#[async_trait]
impl StoreSession for FlatFileSession {
    /// Append a JSON line to `<collection>.jsonl`.
    async fn insert(&self, collection: &str, doc: Document) -> Result<(), AppError> {
        let path = self.collection_path(collection)?;
        let mut line = serde_json::to_string(&doc)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await?;
        truncate_torn_tail(&mut file, &path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, AppError> {
        let path = self.collection_path(collection)?;
        let content = match tokio_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Records end in '\n'; anything after the last one is an append in
        // flight or a torn write.
        let (complete, tail) = match content.rfind('\n') {
            Some(i) => content.split_at(i + 1),
            None => ("", content.as_str()),
        };

        let mut docs = Vec::new();
        for line in complete.lines().filter(|line| !line.trim().is_empty()) {
            docs.push(serde_json::from_str::<Document>(line)?);
        }
        if !tail.trim().is_empty() {
            match serde_json::from_str::<Document>(tail) {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unterminated record"
                ),
            }
        }

        Ok(docs.into_iter().filter(|doc| matches(doc, filter)).collect())
    }
}
