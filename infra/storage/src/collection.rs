use crate::document::{Revision, Versioned};
use crate::engine::Storage;
use crate::error::{StorageError, StorageErrorExt};
use crate::key::{CollectionName, DocumentKey};
use chrono::Utc;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const DOCUMENT_EXT: &str = "json";

/// A view of one collection directory. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Collection {
    storage: Storage,
    name: Arc<CollectionName>,
}

impl Collection {
    pub(crate) fn new(storage: Storage, name: CollectionName) -> Self {
        Self { storage, name: Arc::new(name) }
    }

    /// Physical location of a document.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidKey`] for keys outside `[A-Za-z0-9_-]`.
    pub fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = DocumentKey::try_from(key)?;
        Ok(self
            .storage
            .root()
            .join(self.name.as_str())
            .join(format!("{key}.{DOCUMENT_EXT}")))
    }

    /// Reads a document, `Ok(None)` if it was never saved or has been removed.
    ///
    /// # Errors
    /// [`StorageError::InvalidKey`], [`StorageError::Io`] or [`StorageError::Encoding`]
    /// when the stored bytes do not decode as `T`.
    pub async fn load<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Versioned<T>>, StorageError> {
        let path = self.path(key)?;
        self.storage.read_document(&path).await
    }

    /// Saves `body` only if the stored revision still equals `expected`.
    ///
    /// Pass [`Revision::NONE`] to create a document that must not exist yet. The
    /// check and the write happen under a per-document lock, so two callers
    /// that loaded the same revision cannot both commit.
    ///
    /// # Errors
    /// [`StorageError::Conflict`] when another writer got there first; the
    /// caller should reload and retry. I/O and encoding failures otherwise.
    pub async fn save_if<T: Serialize + Sync>(
        &self,
        key: &str,
        expected: Revision,
        body: &T,
    ) -> Result<Revision, StorageError> {
        let path = self.path(key)?;
        let guard = self.storage.lock(&path).await;

        let outcome: Result<Revision, StorageError> = async {
            let actual = self
                .storage
                .read_document::<IgnoredAny>(&path)
                .await?
                .map_or(Revision::NONE, |doc| doc.revision);

            if actual != expected {
                return Err(StorageError::Conflict {
                    key: format!("{}/{key}", self.name),
                    expected: expected.get(),
                    actual: actual.get(),
                    context: None,
                });
            }

            let next = actual.next();
            let envelope = Versioned { revision: next, updated_at: Utc::now(), body };
            let bytes = serde_json::to_vec_pretty(&envelope)
                .context(format!("Encoding {}/{key}", self.name))?;
            self.storage.write_atomic(&path, &bytes).await?;
            Ok(next)
        }
        .await;

        self.storage.release(guard);
        if let Ok(revision) = &outcome {
            debug!(collection = %self.name, key, %revision, "Conditional save committed");
        }
        outcome
    }
}
