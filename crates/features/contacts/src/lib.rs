//! # Contacts
//!
//! Emergency contacts per user. [`ContactRepository`] is the seam the dispatch
//! pipeline reads through; [`StoredContactRepository`] keeps each user's list
//! as one revisioned document so that priority reassignment is a single
//! conditional write instead of a loop of independent updates.

mod error;
mod repository;
mod stored;

pub use crate::error::{ContactError, ContactErrorExt};
pub use crate::repository::ContactRepository;
pub use crate::stored::{CONTACTS_COLLECTION, StoredContactRepository};
