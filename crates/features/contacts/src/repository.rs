use crate::error::ContactError;
use async_trait::async_trait;
use sos_domain::{Contact, ContactDraft, ContactId, UserId};

/// Per-user emergency contact list.
///
/// At most one contact per user carries `is_priority`. Every operation that
/// can set the flag clears it on the other contacts in the same write.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Contacts in insertion order; empty when the user has none.
    async fn list(&self, user: &UserId) -> Result<Vec<Contact>, ContactError>;

    /// Validates `draft`, assigns an id and stores it.
    async fn add(&self, user: &UserId, draft: ContactDraft) -> Result<Contact, ContactError>;

    /// Replaces the contact `id` with `draft`, keeping the id.
    async fn update(
        &self,
        user: &UserId,
        id: &ContactId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactError>;

    async fn delete(&self, user: &UserId, id: &ContactId) -> Result<(), ContactError>;

    /// Makes `id` the only priority contact.
    async fn set_priority(&self, user: &UserId, id: &ContactId) -> Result<(), ContactError>;
}

/// Clears the flag everywhere except on `keep`.
pub(crate) fn retain_single_priority(contacts: &mut [Contact], keep: &ContactId) {
    for contact in contacts {
        contact.is_priority = contact.id == *keep;
    }
}
