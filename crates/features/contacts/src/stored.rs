use crate::error::ContactError;
use crate::repository::{ContactRepository, retain_single_priority};
use async_trait::async_trait;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use sos_domain::{Contact, ContactDraft, ContactId, UserId};
use sos_kernel::safe_nanoid;
use sos_storage::{Collection, Revision, Storage, StorageError};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

pub const CONTACTS_COLLECTION: &str = "contacts";
const MAX_ATTEMPTS: u32 = 3;

/// Stored shape: the whole list in one document per user.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ContactBook {
    contacts: Vec<Contact>,
}

/// [`ContactRepository`] over a [`sos_storage`] collection.
///
/// Mutations are read-modify-write of the user's single document. Writers in
/// this process queue on a per-user lock; the conditional save catches writers
/// elsewhere, and a lost race is retried up to three times.
#[derive(Debug, Clone)]
pub struct StoredContactRepository {
    collection: Collection,
    locks: Arc<parking_lot::Mutex<FxHashMap<UserId, Arc<Mutex<()>>>>>,
}

impl StoredContactRepository {
    /// # Errors
    /// [`ContactError::StoreUnavailable`] if the collection cannot be opened.
    pub fn new(storage: &Storage) -> Result<Self, ContactError> {
        let collection = storage
            .collection(CONTACTS_COLLECTION)
            .map_err(|e| ContactError::from_store(e, CONTACTS_COLLECTION))?;
        Ok(Self { collection, locks: Arc::default() })
    }

    async fn read(&self, user: &UserId) -> Result<(Revision, ContactBook), ContactError> {
        let loaded = self
            .collection
            .load::<ContactBook>(user.as_str())
            .await
            .map_err(|e| ContactError::from_store(e, user.as_str()))?;
        Ok(loaded.map_or_else(
            || (Revision::NONE, ContactBook::default()),
            |doc| (doc.revision, doc.body),
        ))
    }

    async fn lock_user(&self, user: &UserId) -> OwnedMutexGuard<()> {
        let mutex = Arc::clone(self.locks.lock().entry(user.clone()).or_default());
        mutex.lock_owned().await
    }

    /// Drops lock entries nobody is holding or waiting on.
    fn release(&self, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.locks.lock().retain(|_, mutex| Arc::strong_count(mutex) > 1);
    }

    /// Applies `edit` to a fresh copy of the list and commits it conditionally,
    /// holding the user's lock for the whole cycle.
    async fn mutate<R, F>(&self, user: &UserId, edit: F) -> Result<R, ContactError>
    where
        F: FnMut(&mut Vec<Contact>) -> Result<R, ContactError> + Send,
        R: Send,
    {
        let guard = self.lock_user(user).await;
        let outcome = self.commit(user, edit).await;
        self.release(guard);
        outcome
    }

    async fn commit<R, F>(&self, user: &UserId, mut edit: F) -> Result<R, ContactError>
    where
        F: FnMut(&mut Vec<Contact>) -> Result<R, ContactError> + Send,
        R: Send,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let (revision, mut book) = self.read(user).await?;
            let outcome = edit(&mut book.contacts)?;

            match self.collection.save_if(user.as_str(), revision, &book).await {
                Ok(committed) => {
                    debug!(user = %user, revision = %committed, "Contact list saved");
                    return Ok(outcome);
                },
                Err(StorageError::Conflict { .. }) => {
                    warn!(user = %user, attempt, "Contact list changed underneath, retrying");
                },
                Err(e) => return Err(ContactError::from_store(e, user.as_str())),
            }
        }

        Err(ContactError::Conflict {
            message: format!("gave up after {MAX_ATTEMPTS} attempts").into(),
            context: Some(user.to_string().into()),
        })
    }
}

fn position(contacts: &[Contact], id: &ContactId) -> Result<usize, ContactError> {
    contacts.iter().position(|c| c.id == *id).ok_or_else(|| ContactError::NotFound {
        message: id.to_string().into(),
        context: None,
    })
}

#[async_trait]
impl ContactRepository for StoredContactRepository {
    async fn list(&self, user: &UserId) -> Result<Vec<Contact>, ContactError> {
        let (_, book) = self.read(user).await?;
        debug!(user = %user, count = book.contacts.len(), "Contacts loaded");
        Ok(book.contacts)
    }

    async fn add(&self, user: &UserId, draft: ContactDraft) -> Result<Contact, ContactError> {
        let contact = draft.into_contact(ContactId::new(safe_nanoid!()))?;

        self.mutate(user, |contacts| {
            contacts.push(contact.clone());
            if contact.is_priority {
                retain_single_priority(contacts, &contact.id);
            }
            Ok(())
        })
        .await?;

        info!(user = %user, id = %contact.id, phone = %contact.phone.masked(), "Contact added");
        Ok(contact)
    }

    async fn update(
        &self,
        user: &UserId,
        id: &ContactId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactError> {
        let contact = draft.into_contact(id.clone())?;

        self.mutate(user, |contacts| {
            let idx = position(contacts, id)?;
            contacts[idx] = contact.clone();
            if contact.is_priority {
                retain_single_priority(contacts, id);
            }
            Ok(())
        })
        .await?;

        info!(user = %user, id = %id, "Contact updated");
        Ok(contact)
    }

    async fn delete(&self, user: &UserId, id: &ContactId) -> Result<(), ContactError> {
        self.mutate(user, |contacts| {
            let idx = position(contacts, id)?;
            contacts.remove(idx);
            Ok(())
        })
        .await?;

        info!(user = %user, id = %id, "Contact deleted");
        Ok(())
    }

    async fn set_priority(&self, user: &UserId, id: &ContactId) -> Result<(), ContactError> {
        self.mutate(user, |contacts| {
            position(contacts, id)?;
            retain_single_priority(contacts, id);
            Ok(())
        })
        .await?;

        info!(user = %user, id = %id, "Priority contact set");
        Ok(())
    }
}
