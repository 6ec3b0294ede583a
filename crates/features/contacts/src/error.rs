use sos_storage::StorageError;
use std::borrow::Cow;

#[sos_derive::sos_error]
pub enum ContactError {
    /// No signed-in user, or a user id the store cannot address.
    #[error("Not signed in{}: {message}", format_context(.context))]
    Unauthenticated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Contact store unavailable{}: {source}", format_context(.context))]
    StoreUnavailable { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Contact not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid contact{}: {source}", format_context(.context))]
    InvalidContact { source: sos_domain::InvalidContact, context: Option<Cow<'static, str>> },

    /// Concurrent writers kept winning; the caller may try again later.
    #[error("Contact list changed concurrently{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ContactError {
    /// Classifies a store failure for `user`.
    pub(crate) fn from_store(err: StorageError, user: &str) -> Self {
        match err {
            StorageError::InvalidKey { message, .. } => Self::Unauthenticated {
                message: format!("user id is not addressable: {message}").into(),
                context: None,
            },
            StorageError::Conflict { expected, actual, .. } => Self::Conflict {
                message: format!("expected revision {expected}, found {actual}").into(),
                context: Some(user.to_owned().into()),
            },
            other => Self::StoreUnavailable { source: other, context: Some(user.to_owned().into()) },
        }
    }
}
