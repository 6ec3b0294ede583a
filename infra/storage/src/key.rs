use crate::error::StorageError;
use std::fmt;

const MAX_KEY_LEN: usize = 128;

/// Name of a top-level collection directory, e.g. `contacts`.
///
/// Lowercase ASCII letters, digits and `_` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl TryFrom<&str> for CollectionName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.trim().to_lowercase();
        if name.is_empty() || name.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey {
                message: value.to_owned().into(),
                context: Some("Collection name must be 1..=128 characters".into()),
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::InvalidKey {
                message: name.into(),
                context: Some("Collection name contains illegal characters".into()),
            });
        }
        Ok(Self(name))
    }
}

/// Identifier of one document inside a collection, typically a user id.
///
/// Case is preserved; ASCII letters, digits, `_` and `-` are allowed, which
/// keeps every key a plain file name with no path components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl TryFrom<&str> for DocumentKey {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        if value.is_empty() || value.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey {
                message: value.to_owned().into(),
                context: Some("Document key must be 1..=128 characters".into()),
            });
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(StorageError::InvalidKey {
                message: value.to_owned().into(),
                context: Some("Document key contains illegal characters".into()),
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl CollectionName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
