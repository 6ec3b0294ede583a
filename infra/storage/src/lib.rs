//! A small revisioned document store on the local filesystem.
//!
//! Each document is one JSON file holding a body and a monotonically
//! increasing [`Revision`]. Writers use [`Collection::save_if`], a
//! compare-and-swap keyed on the revision they loaded, so read-modify-write
//! cycles over a whole document (for example "clear every other priority flag,
//! then set this one") either commit as a unit or fail with
//! [`StorageError::Conflict`] and can be retried.
//!
//! # Core Features
//!
//! - **Atomic Writes**: unique temp file + `fsync` + `rename`; a crash never leaves a torn document.
//! - **Conditional Saves**: revision check and write happen under a per-document lock.
//! - **Strict Keys**: collection and document keys are validated identifiers, never paths.
//! - **Self-Healing**: orphaned temp files are removed on connect.
//!
//! The conditional save is exclusive within one process. Several processes
//! sharing a root must coordinate externally.
//!
//! # Examples
//!
//! ```rust
//! use sos_storage::{Revision, Storage, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().expect("tempdir");
//!     let storage = Storage::builder().root(tmp.path()).connect().await?;
//!     let settings = storage.collection("settings")?;
//!
//!     let first = settings.save_if("alice", Revision::NONE, &"quiet").await?;
//!     let stale = settings.save_if("alice", Revision::NONE, &"loud").await;
//!     assert!(matches!(stale, Err(StorageError::Conflict { .. })));
//!
//!     settings.save_if("alice", first, &"loud").await?;
//!     Ok(())
//! }
//! ```

mod builder;
mod collection;
mod document;
mod engine;
mod error;
mod key;
mod maintenance;

pub use builder::StorageBuilder;
pub use collection::Collection;
pub use document::{Revision, Versioned};
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
pub use key::{CollectionName, DocumentKey};
