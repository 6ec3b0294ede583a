use crate::engine::{Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone)]
struct StorageConfig {
    create: bool,
    purge_on_connect: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { create: true, purge_on_connect: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct StorageBuilder<S: Sealed = NoRoot> {
    state: S,
    config: StorageConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> StorageBuilder<S> {
    #[must_use = "Sets whether the root directory is created when missing"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    #[must_use = "Sets whether stale temp files are removed on connect"]
    pub const fn purge_on_connect(mut self, enable: bool) -> Self {
        self.config.purge_on_connect = enable;
        self
    }
}

impl StorageBuilder<NoRoot> {
    #[must_use = "Creates a new storage builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory path for the storage engine"]
    pub fn root(self, path: impl Into<PathBuf>) -> StorageBuilder<WithRoot> {
        StorageBuilder { state: WithRoot(path.into()), config: self.config }
    }
}

impl StorageBuilder<WithRoot> {
    /// Resolves the root and returns a ready [`Storage`] handle.
    ///
    /// With `create(true)` (the default) the root is created if missing. Temp
    /// files older than five minutes are swept unless `purge_on_connect(false)`.
    ///
    /// # Errors
    ///
    /// [`StorageError::DirectoryNotFound`] when the root is missing and `create`
    /// is off, [`StorageError::Io`] when it cannot be created or resolved.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let root = self.state.0;

        if self.config.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("Failed to bootstrap storage root: {}", root.display()))?;
        } else if !fs::try_exists(&root).await.unwrap_or(false) {
            return Err(StorageError::DirectoryNotFound {
                message: root.display().to_string().into(),
                context: None,
            });
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("Failed to resolve storage root: {}", root.display()))?;
        info!(path = %canonical.display(), "Document store ready");

        let storage = Storage { inner: Arc::new(StorageInner::new(canonical)) };
        if self.config.purge_on_connect {
            storage.purge_tmp().await;
        }
        Ok(storage)
    }
}
