//! Emergency contacts and the identifiers that scope them.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const PHONE_DIGITS: usize = 10;

/// Authenticated user identifier, as supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for a blank identifier.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned contact identifier. Opaque to everything but the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContactId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// Exactly ten ASCII digits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses a phone number, ignoring surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`InvalidContact::Phone`] unless the input is exactly ten ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, InvalidContact> {
        let trimmed = raw.trim();
        if trimmed.len() == PHONE_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(InvalidContact::Phone(raw.to_owned()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last four digits only, for logs.
    #[must_use]
    pub fn masked(&self) -> String {
        let tail = &self.0[PHONE_DIGITS - 4..];
        format!("******{tail}")
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvalidContact;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Masked on purpose; the full number only leaves through [`PhoneNumber::as_str`].
impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PhoneNumber").field(&self.masked()).finish()
    }
}

/// A stored emergency contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub phone: PhoneNumber,
    #[serde(default)]
    pub is_priority: bool,
}

/// Unvalidated user input for creating or replacing a contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub is_priority: bool,
}

impl ContactDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self { name: name.into(), phone: phone.into(), is_priority: false }
    }

    #[must_use]
    pub const fn priority(mut self, is_priority: bool) -> Self {
        self.is_priority = is_priority;
        self
    }

    /// Validates and binds the draft to an id.
    ///
    /// # Errors
    /// [`InvalidContact::Name`] for a blank name, [`InvalidContact::Phone`] for
    /// anything but ten digits.
    pub fn into_contact(self, id: ContactId) -> Result<Contact, InvalidContact> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InvalidContact::Name);
        }
        let phone = PhoneNumber::parse(&self.phone)?;
        Ok(Contact { id, name: name.to_owned(), phone, is_priority: self.is_priority })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidContact {
    Name,
    Phone(String),
}

impl fmt::Display for InvalidContact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("contact name must not be empty"),
            Self::Phone(_) => f.write_str("phone number must be 10 digits"),
        }
    }
}

impl std::error::Error for InvalidContact {}
