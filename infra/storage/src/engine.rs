//! Core engine: root directory, atomic file replacement and per-document locks.

use crate::builder::StorageBuilder;
use crate::collection::Collection;
use crate::document::Versioned;
use crate::error::{StorageError, StorageErrorExt};
use crate::key::CollectionName;
use crate::maintenance::{self, TMP_MARKER};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct StorageInner {
    /// Canonical root directory.
    pub(crate) root: PathBuf,
    pub(crate) tmp_counter: AtomicU64,
    /// One async mutex per document path currently being written.
    locks: Mutex<FxHashMap<PathBuf, Arc<AsyncMutex<()>>>>,
}

impl StorageInner {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root, tmp_counter: AtomicU64::new(1), locks: Mutex::new(FxHashMap::default()) }
    }
}

/// Cheaply cloneable handle to a document store rooted at one directory.
///
/// Documents live at `<root>/<collection>/<key>.json`. Every write goes through
/// a unique temp file, `fsync` and `rename`, so readers observe either the old
/// or the new document and never a torn one.
///
/// # Example
///
/// ```rust
/// use sos_storage::{Revision, Storage, StorageError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().expect("tempdir");
///     let storage = Storage::builder().root(tmp.path()).connect().await?;
///     let contacts = storage.collection("contacts")?;
///
///     let rev = contacts.save_if("alice", Revision::NONE, &vec!["Bob"]).await?;
///     let doc = contacts.load::<Vec<String>>("alice").await?.expect("saved above");
///     assert_eq!(doc.revision, rev);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage engine is not initialized until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Returns a handle scoped to one collection directory.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] if the name is empty or not `[a-z0-9_]`.
    pub fn collection<N>(&self, name: N) -> Result<Collection, StorageError>
    where
        N: TryInto<CollectionName, Error = StorageError>,
    {
        Ok(Collection::new(self.clone(), name.try_into()?))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Removes temp files left behind by writes that never reached `rename`.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.inner.root).await;
    }

    pub(crate) async fn read_document<T: DeserializeOwned>(
        &self,
        path: &Path,
    ) -> Result<Option<Versioned<T>>, StorageError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).context(format!("Read failed: {}", path.display()));
            },
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .context(format!("Decoding document {}", path.display()))
    }

    /// Atomic swap: unique temp file, `fsync`, `rename`, then a best-effort directory sync.
    pub(crate) async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create collection dir for {}", target.display()))?;
        }

        let temp = self.unique_tmp_path(target);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, target).await {
            if err.kind() != std::io::ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&temp).await;
                return Err(err).context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ));
            }
            fs::remove_file(target)
                .await
                .context(format!("Failed to replace existing file: {}", target.display()))?;
            fs::rename(&temp, target).await.context(format!(
                "Atomic swap failed: {} -> {}",
                temp.display(),
                target.display()
            ))?;
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent).await;
        }

        debug!(path = %target.display(), bytes = data.len(), "Document saved atomically");
        Ok(())
    }

    /// Waits for exclusive access to `path` within this process.
    pub(crate) async fn lock(&self, path: &Path) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.inner.locks.lock();
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };
        mutex.lock_owned().await
    }

    /// Drops lock entries nobody is holding or waiting on.
    pub(crate) fn release(&self, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.inner.locks.lock().retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("document");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}
